use serde::de::DeserializeOwned;

use crate::{api::error::ApiError, domain::result::InboundResult};

/// Response schemas that carry invariants beyond their field types.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Turns a guarded result into a typed body, or the matching error.
pub fn decode<T: DeserializeOwned>(result: InboundResult) -> Result<T, ApiError> {
    match result {
        InboundResult::Success { body, .. } => serde_json::from_slice(&body)
            .map_err(|error| ApiError::malformed(format!("body does not match schema: {error}"))),
        InboundResult::Failure {
            status,
            error_body,
            timed_out,
        } => Err(ApiError::from_failure(
            status,
            error_body.as_deref(),
            timed_out,
        )),
    }
}

pub fn decode_valid<T: DeserializeOwned + Validate>(result: InboundResult) -> Result<T, ApiError> {
    let value: T = decode(result)?;
    value.validate().map_err(ApiError::malformed)?;
    Ok(value)
}

pub fn ensure_probability(label: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{label} must be a probability in [0, 1], got {value}"))
    }
}

pub fn ensure_non_negative(label: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{label} must be a non-negative number, got {value}"))
    }
}
