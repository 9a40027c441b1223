use crate::domain::credential::Credential;

/// Session state derived from the credential store; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
}

impl SessionStatus {
    pub fn from_credential(credential: Option<&Credential>) -> Self {
        match credential {
            Some(_) => Self::Authenticated,
            None => Self::Anonymous,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Anonymous => "SESSION_ANONYMOUS",
            Self::Authenticated => "SESSION_AUTHENTICATED",
        }
    }
}
