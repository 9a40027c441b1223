mod adapter;
mod app_config;
mod file_config;
mod loader;

pub use adapter::FileConfigAdapter;
pub use app_config::{ApiConfig, AppConfig, HttpConfig, LogConfig, UploadConfig};
pub use loader::load;
