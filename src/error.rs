use std::path::PathBuf;
use thiserror::Error;

/// Error type for store and export I/O.
///
/// Aggregation itself is total over well-formed input and returns values,
/// never errors; only the repository edge (file I/O, record lookup) fails.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse store file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize store: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Contact not found: {0}")]
    ContactNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    /// True when the error means the record simply isn't there, as opposed
    /// to the store being unreadable.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::ContactNotFound(_) | StoreError::CardNotFound(_)
        )
    }
}
