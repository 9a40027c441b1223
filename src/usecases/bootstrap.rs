use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};

use crate::{
    api::{client::ApiClient, dispatcher::RequestDispatcher, http::ReqwestTransport},
    infra::{
        self,
        config::{AppConfig, FileConfigAdapter},
        contracts::{ConfigAdapter, SessionExpiredHandler},
        credential_store::FileCredentialStore,
        error::AppError,
        storage_layout::StorageLayout,
    },
    ui::session_expired::LoginPromptRedirect,
    usecases::context::AppContext,
};

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext> {
    let config = FileConfigAdapter::new(config_path)
        .load()
        .context("configuration could not be loaded")?;
    infra::logging::init(&config.logging)?;

    let layout = StorageLayout::resolve()?;
    Ok(build_context(config, layout, Arc::new(LoginPromptRedirect))?)
}

/// Wires store, transport and session guard into a ready client.
pub fn build_context(
    config: AppConfig,
    layout: StorageLayout,
    on_expired: Arc<dyn SessionExpiredHandler>,
) -> Result<AppContext, AppError> {
    layout.ensure_dirs()?;

    let store = Arc::new(FileCredentialStore::open(layout.credentials_file()));
    let transport = Arc::new(ReqwestTransport::new(&config.api, &config.http)?);
    let dispatcher = RequestDispatcher::new(transport, store, on_expired);
    let client = ApiClient::new(dispatcher, config.upload.max_image_bytes);

    Ok(AppContext::new(config, layout, client))
}
