use serde::de::DeserializeOwned;

use crate::{
    api::{
        advisory::AdvisoryApi,
        auth::AuthApi,
        disease::DiseaseApi,
        dispatcher::RequestDispatcher,
        error::ApiError,
        market::MarketApi,
        rag::RagApi,
        response::{decode, decode_valid, Validate},
        weather::WeatherApi,
    },
    domain::{credential::Credential, request::OutboundRequest, status::SessionStatus},
    infra::error::AppError,
};

/// Typed entry point to the advisory API.
///
/// Facades borrow the client; each call is one independent request with no
/// caching or retry.
pub struct ApiClient {
    dispatcher: RequestDispatcher,
    max_image_bytes: u64,
}

impl ApiClient {
    pub fn new(dispatcher: RequestDispatcher, max_image_bytes: u64) -> Self {
        Self {
            dispatcher,
            max_image_bytes,
        }
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn disease(&self) -> DiseaseApi<'_> {
        DiseaseApi::new(self)
    }

    pub fn weather(&self) -> WeatherApi<'_> {
        WeatherApi::new(self)
    }

    pub fn market(&self) -> MarketApi<'_> {
        MarketApi::new(self)
    }

    pub fn advisory(&self) -> AdvisoryApi<'_> {
        AdvisoryApi::new(self)
    }

    pub fn rag(&self) -> RagApi<'_> {
        RagApi::new(self)
    }

    /// Installs a freshly issued credential and re-arms the session guard.
    pub fn sign_in(&self, credential: Credential) -> Result<(), AppError> {
        self.dispatcher.store().set(credential)?;
        self.dispatcher.guard().rearm();
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), AppError> {
        self.dispatcher.store().clear()
    }

    pub fn session_status(&self) -> SessionStatus {
        SessionStatus::from_credential(self.dispatcher.store().get().as_ref())
    }

    pub(crate) fn max_image_bytes(&self) -> u64 {
        self.max_image_bytes
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        request: OutboundRequest,
    ) -> Result<T, ApiError> {
        decode(self.dispatcher.send(request).await)
    }

    pub(crate) async fn fetch_valid<T: DeserializeOwned + Validate>(
        &self,
        request: OutboundRequest,
    ) -> Result<T, ApiError> {
        decode_valid(self.dispatcher.send(request).await)
    }
}

/// Rejects blank text inputs before anything is sent.
pub(crate) fn required<'a>(label: &str, value: &'a str) -> Result<&'a str, ApiError> {
    match value.trim() {
        "" => Err(ApiError::invalid_input(format!("{label} must not be empty"))),
        trimmed => Ok(trimmed),
    }
}

pub(crate) fn encode_body(error: serde_json::Error) -> ApiError {
    ApiError::invalid_input(format!("request body could not be encoded: {error}"))
}
