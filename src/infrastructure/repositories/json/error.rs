// src/infrastructure/repositories/json/error.rs

use crate::domain::error::DomainError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsonStoreError {
    #[error("Cannot access bookmark file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed bookmark file {}: {source}", path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize bookmarks: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type JsonStoreResult<T> = Result<T, JsonStoreError>;

impl From<JsonStoreError> for DomainError {
    fn from(err: JsonStoreError) -> Self {
        DomainError::StorageError(err.to_string())
    }
}
