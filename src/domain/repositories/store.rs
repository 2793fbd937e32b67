// src/domain/repositories/store.rs

use crate::domain::bookmark::Bookmark;
use crate::domain::error::DomainResult;

/// Durable, ordered collection of bookmarks.
///
/// Implementations serialize every call so that the load-modify-save span of
/// one operation never interleaves with another's within the same process.
/// Nothing is promised across processes.
pub trait BookmarkStore: std::fmt::Debug + Send + Sync {
    /// Append a bookmark to the tail of the collection
    fn add(&self, bookmark: &Bookmark) -> DomainResult<()>;

    /// All bookmarks in insertion order; an absent collection is empty
    fn list(&self) -> DomainResult<Vec<Bookmark>>;

    /// Remove every bookmark whose title equals `title` exactly.
    ///
    /// Returns the number of removed bookmarks. Fails with
    /// `DomainError::BookmarkNotFound` and leaves the collection untouched
    /// when nothing matches.
    fn delete(&self, title: &str) -> DomainResult<usize>;
}
