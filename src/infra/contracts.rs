use anyhow::Result;

use crate::{
    domain::credential::Credential,
    infra::{config::AppConfig, error::AppError},
};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// Holder of the single live credential.
///
/// Calls are synchronous and never touch the network. `clear` on an empty
/// store succeeds.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<Credential>;
    fn set(&self, credential: Credential) -> Result<(), AppError>;
    fn clear(&self) -> Result<(), AppError>;
}

/// Reaction to a rejected session, e.g. sending the user back to login.
pub trait SessionExpiredHandler: Send + Sync {
    fn on_session_expired(&self);
}
