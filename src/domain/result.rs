/// Outcome of one exchange with the API as seen by the session guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundResult {
    Success {
        status: u16,
        body: Vec<u8>,
    },
    /// `status` is `None` when no response reached the client at all.
    Failure {
        status: Option<u16>,
        error_body: Option<Vec<u8>>,
        timed_out: bool,
    },
}

pub const STATUS_UNAUTHORIZED: u16 = 401;

impl InboundResult {
    /// Classifies a received response by status code.
    pub fn from_response(status: u16, body: Vec<u8>) -> Self {
        if (200..300).contains(&status) {
            Self::Success { status, body }
        } else {
            Self::Failure {
                status: Some(status),
                error_body: (!body.is_empty()).then_some(body),
                timed_out: false,
            }
        }
    }

    pub fn unreachable(timed_out: bool) -> Self {
        Self::Failure {
            status: None,
            error_body: None,
            timed_out,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status, .. } => Some(*status),
            Self::Failure { status, .. } => *status,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(STATUS_UNAUTHORIZED)
    }
}
