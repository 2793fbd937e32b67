// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Delete requested a title no stored bookmark carries
    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Cannot fetch title: {0}")]
    CannotFetchTitle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl DomainError {
    /// Prefix the message with caller context, keeping the variant
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        let context = context.into();
        match self {
            DomainError::StorageError(msg) => {
                DomainError::StorageError(format!("{}: {}", context, msg))
            }
            DomainError::CannotFetchTitle(msg) => {
                DomainError::CannotFetchTitle(format!("{}: {}", context, msg))
            }
            DomainError::Other(msg) => DomainError::Other(format!("{}: {}", context, msg)),
            // the title is the payload callers match on
            err @ DomainError::BookmarkNotFound(_) => err,
            err => DomainError::Other(format!("{}: {}", context, err)),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
