use async_trait::async_trait;
use thiserror::Error;

use crate::domain::request::OutboundRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Reasons a request produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request could not be built: {0}")]
    Build(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Network seam below the dispatcher.
///
/// `authorization` is the complete header value, or `None` for an
/// unauthenticated request. Implementations add no other credentials.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        request: &OutboundRequest,
        authorization: Option<&str>,
    ) -> Result<TransportResponse, TransportError>;
}
