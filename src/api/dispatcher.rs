use std::{sync::Arc, time::Instant};

use crate::{
    api::{session_guard::SessionGuard, transport::HttpTransport},
    domain::{request::OutboundRequest, result::InboundResult},
    infra::contracts::{CredentialStore, SessionExpiredHandler},
};

const API_UNREACHABLE: &str = "API_UNREACHABLE";

/// Sends requests with the current bearer credential and routes every
/// result through the session guard.
pub struct RequestDispatcher {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn CredentialStore>,
    guard: SessionGuard,
}

impl RequestDispatcher {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn CredentialStore>,
        handler: Arc<dyn SessionExpiredHandler>,
    ) -> Self {
        let guard = SessionGuard::new(store.clone(), handler);
        Self {
            transport,
            store,
            guard,
        }
    }

    /// The credential is read once, before anything is awaited, so the header
    /// reflects the store at dispatch time. Dropping the future abandons the
    /// request without touching the store.
    pub async fn send(&self, request: OutboundRequest) -> InboundResult {
        let authorization = self.store.get().map(|credential| credential.bearer());
        let started = Instant::now();

        let result = match self
            .transport
            .execute(&request, authorization.as_deref())
            .await
        {
            Ok(response) => InboundResult::from_response(response.status, response.body),
            Err(error) => {
                tracing::warn!(
                    code = API_UNREACHABLE,
                    method = request.method().as_str(),
                    path = %request.path(),
                    error = %error,
                    "request did not reach the api"
                );
                InboundResult::unreachable(error.is_timeout())
            }
        };

        tracing::debug!(
            method = request.method().as_str(),
            path = %request.path(),
            encoding = ?request.encoding(),
            status = ?result.status(),
            authenticated = authorization.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "api exchange finished"
        );

        self.guard.inspect(result)
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }
}
