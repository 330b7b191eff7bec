/// Service error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] ahoy_catalog::CatalogClientError),

    #[error("Invalid node id: {0}")]
    NodeId(#[from] ahoy_core::CatalogError),

    #[error("Playback error: {0}")]
    Playback(#[from] ahoy_playback::PlaybackError),
}

impl From<config::ConfigError> for ServiceError {
    fn from(err: config::ConfigError) -> Self {
        ServiceError::Config(err.to_string())
    }
}
