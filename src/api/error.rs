use serde_json::Value;
use thiserror::Error;

use crate::domain::{image::ImageUploadError, result::STATUS_UNAUTHORIZED};

const GENERIC_REJECTION: &str = "the request was rejected";

/// Failure surfaced by a facade call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response reached the client (offline, refused, timed out).
    #[error("could not reach the advisory service; check the connection and try again")]
    Connectivity { timed_out: bool },
    /// 401. The session guard has already cleared the credential.
    #[error("not signed in or the session expired; run `agrolens login`")]
    Unauthorized,
    #[error("request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("the advisory service failed to handle the request ({status}); try again later")]
    Server { status: u16 },
    #[error("unexpected response from the advisory service: {reason}")]
    MalformedResponse { reason: String },
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl ApiError {
    pub fn from_failure(status: Option<u16>, error_body: Option<&[u8]>, timed_out: bool) -> Self {
        match status {
            None => Self::Connectivity { timed_out },
            Some(STATUS_UNAUTHORIZED) => Self::Unauthorized,
            Some(status @ 400..=499) => Self::Rejected {
                status,
                detail: rejection_detail(error_body),
            },
            Some(status) => Self::Server { status },
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Only connectivity failures are worth retrying by hand; nothing is
    /// retried automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Connectivity { timed_out: true } => "API_TIMEOUT",
            Self::Connectivity { timed_out: false } => "API_UNREACHABLE",
            Self::Unauthorized => "API_UNAUTHORIZED",
            Self::Rejected { .. } => "API_REJECTED",
            Self::Server { .. } => "API_SERVER_ERROR",
            Self::MalformedResponse { .. } => "API_MALFORMED_RESPONSE",
            Self::InvalidInput { .. } => "API_INVALID_INPUT",
        }
    }
}

impl From<ImageUploadError> for ApiError {
    fn from(error: ImageUploadError) -> Self {
        Self::invalid_input(error.to_string())
    }
}

fn rejection_detail(body: Option<&[u8]>) -> String {
    body.and_then(|raw| serde_json::from_slice::<Value>(raw).ok())
        .and_then(|value| detail_from_value(&value))
        .unwrap_or_else(|| GENERIC_REJECTION.to_owned())
}

fn detail_from_value(value: &Value) -> Option<String> {
    let object = value.as_object()?;

    for key in ["error", "detail", "message", "non_field_errors"] {
        if let Some(text) = object.get(key).and_then(first_text) {
            return Some(text);
        }
    }

    object
        .iter()
        .find_map(|(field, value)| first_text(value).map(|text| format!("{field}: {text}")))
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statusless_failure_is_connectivity() {
        let err = ApiError::from_failure(None, None, true);

        assert_eq!(err, ApiError::Connectivity { timed_out: true });
        assert!(err.is_retryable());
        assert_eq!(err.code(), "API_TIMEOUT");
    }

    #[test]
    fn classifies_by_status_range() {
        assert_eq!(
            ApiError::from_failure(Some(401), None, false),
            ApiError::Unauthorized
        );
        assert_eq!(
            ApiError::from_failure(Some(503), Some(b"{\"error\":\"down\"}".as_slice()), false),
            ApiError::Server { status: 503 }
        );
        assert!(!ApiError::Server { status: 500 }.is_retryable());
    }

    #[test]
    fn rejection_uses_backend_error_text() {
        let err = ApiError::from_failure(
            Some(404),
            Some(br#"{"error": "Crop \"Mango\" not found"}"#.as_slice()),
            false,
        );

        assert_eq!(
            err,
            ApiError::Rejected {
                status: 404,
                detail: "Crop \"Mango\" not found".to_owned()
            }
        );
    }

    #[test]
    fn rejection_falls_back_to_first_field_error() {
        let body = br#"{"username": ["A user with that username already exists."]}"#;
        let err = ApiError::from_failure(Some(400), Some(body.as_slice()), false);

        assert_eq!(
            err,
            ApiError::Rejected {
                status: 400,
                detail: "username: A user with that username already exists.".to_owned()
            }
        );
    }

    #[test]
    fn rejection_without_readable_body_is_generic() {
        let err = ApiError::from_failure(Some(400), Some(b"<html>bad</html>".as_slice()), false);

        assert_eq!(
            err,
            ApiError::Rejected {
                status: 400,
                detail: GENERIC_REJECTION.to_owned()
            }
        );
    }
}
