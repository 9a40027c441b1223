use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("failed to resolve storage path: {details}")]
    StoragePathResolution { details: String },
    #[error("failed to create storage directory at {path}: {source}")]
    StorageDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write credentials at {path}: {source}")]
    CredentialWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove credentials at {path}: {source}")]
    CredentialRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode credentials: {0}")]
    CredentialEncode(#[source] serde_json::Error),
    #[error("invalid api base url `{url}`: {details}")]
    InvalidBaseUrl { url: String, details: String },
    #[error("failed to build http client: {0}")]
    HttpClientBuild(#[source] reqwest::Error),
}
