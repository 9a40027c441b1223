use serde::Deserialize;

use crate::infra::config::{ApiConfig, AppConfig, HttpConfig, LogConfig, UploadConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub api: Option<FileApiConfig>,
    pub http: Option<FileHttpConfig>,
    pub upload: Option<FileUploadConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(api) = self.api {
            api.merge_into(&mut config.api);
        }

        if let Some(http) = self.http {
            http.merge_into(&mut config.http);
        }

        if let Some(upload) = self.upload {
            upload.merge_into(&mut config.upload);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileApiConfig {
    pub base_url: Option<String>,
}

impl FileApiConfig {
    fn merge_into(self, config: &mut ApiConfig) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileHttpConfig {
    pub timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
}

impl FileHttpConfig {
    fn merge_into(self, config: &mut HttpConfig) {
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }

        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileUploadConfig {
    pub max_image_bytes: Option<u64>,
}

impl FileUploadConfig {
    fn merge_into(self, config: &mut UploadConfig) {
        if let Some(max_image_bytes) = self.max_image_bytes {
            config.max_image_bytes = max_image_bytes;
        }
    }
}
