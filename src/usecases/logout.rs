use crate::{
    api::client::ApiClient,
    domain::status::SessionStatus,
    infra::{credential_store::remove_if_exists, error::AppError, storage_layout::StorageLayout},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub credentials_removed: bool,
}

/// Deletes the persisted credential. Works without a loadable config so a
/// broken config file never traps a user in a signed-in state.
pub fn logout(layout: &StorageLayout) -> Result<LogoutOutcome, AppError> {
    let credentials_removed = remove_if_exists(&layout.credentials_file())?;

    Ok(LogoutOutcome {
        credentials_removed,
    })
}

/// Signs the client out through its credential store, which also wipes the
/// persisted copy.
pub fn sign_out(client: &ApiClient) -> Result<LogoutOutcome, AppError> {
    let credentials_removed = client.session_status() == SessionStatus::Authenticated;
    client.sign_out()?;

    Ok(LogoutOutcome {
        credentials_removed,
    })
}
