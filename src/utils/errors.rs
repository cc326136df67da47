use thiserror::Error;

use crate::api::ApiError;

/// Main error type for MediHelp
#[derive(Error, Debug)]
pub enum MediHelpError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("UI error: {0}")]
    UIError(String),
}

impl MediHelpError {
    /// Whether this failure means the stored session is no longer valid
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(ApiError::Unauthorized { .. }))
    }
}

impl From<toml::de::Error> for MediHelpError {
    fn from(err: toml::de::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<toml::ser::Error> for MediHelpError {
    fn from(err: toml::ser::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}
