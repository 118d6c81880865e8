use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Library error: {0}")]
    Library(#[from] core_library::LibraryError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] core_metadata::MetadataError),
}

/// Failure classes reported to callers of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The addressed song does not exist
    NotFound,
    /// The request itself is malformed
    InvalidInput,
    /// The catalog database failed
    StorageFailure,
    /// The song information service failed or is unreachable
    EnrichmentFailure,
    /// The catalog could not be set up
    Initialization,
}

impl CoreError {
    pub(crate) fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Classify this error for the caller.
    pub fn kind(&self) -> ErrorKind {
        use core_library::LibraryError;

        match self {
            CoreError::InitializationFailed(_) | CoreError::Config(_) => ErrorKind::Initialization,
            CoreError::InvalidInput { .. } => ErrorKind::InvalidInput,
            CoreError::Library(LibraryError::NotFound { .. }) => ErrorKind::NotFound,
            CoreError::Library(LibraryError::Database(_) | LibraryError::Migration(_)) => {
                ErrorKind::StorageFailure
            }
            CoreError::Metadata(_) => ErrorKind::EnrichmentFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
