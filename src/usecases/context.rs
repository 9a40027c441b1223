use crate::{
    api::client::ApiClient,
    infra::{config::AppConfig, storage_layout::StorageLayout},
};

pub struct AppContext {
    pub config: AppConfig,
    pub layout: StorageLayout,
    pub client: ApiClient,
}

impl AppContext {
    pub fn new(config: AppConfig, layout: StorageLayout, client: ApiClient) -> Self {
        Self {
            config,
            layout,
            client,
        }
    }
}
