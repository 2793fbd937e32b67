// src/infrastructure/repositories/memory.rs

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument};

use crate::domain::bookmark::Bookmark;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::repositories::store::BookmarkStore;

/// Volatile store with the same semantics as the file store
#[derive(Debug, Default)]
pub struct InMemoryBookmarkStore {
    bookmarks: Mutex<Vec<Bookmark>>,
}

impl InMemoryBookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bookmarks(bookmarks: Vec<Bookmark>) -> Self {
        Self {
            bookmarks: Mutex::new(bookmarks),
        }
    }

    fn bookmarks(&self) -> MutexGuard<'_, Vec<Bookmark>> {
        // every mutation below completes before it can panic
        self.bookmarks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BookmarkStore for InMemoryBookmarkStore {
    #[instrument(skip(self, bookmark), level = "debug", fields(title = %bookmark.title))]
    fn add(&self, bookmark: &Bookmark) -> DomainResult<()> {
        self.bookmarks().push(bookmark.clone());
        Ok(())
    }

    fn list(&self) -> DomainResult<Vec<Bookmark>> {
        Ok(self.bookmarks().clone())
    }

    #[instrument(skip(self), level = "debug")]
    fn delete(&self, title: &str) -> DomainResult<usize> {
        let mut bookmarks = self.bookmarks();
        let before = bookmarks.len();
        bookmarks.retain(|b| b.title != title);

        let removed = before - bookmarks.len();
        if removed == 0 {
            return Err(DomainError::BookmarkNotFound(title.to_string()));
        }
        debug!("Removed {} bookmarks", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::bookmark_at;

    #[test]
    fn given_adds_when_listing_then_insertion_order() -> DomainResult<()> {
        let store = InMemoryBookmarkStore::new();
        let a = bookmark_at("A", "a", 0);
        let b = bookmark_at("B", "b", 1);

        store.add(&a)?;
        store.add(&b)?;

        assert_eq!(store.list()?, vec![a, b]);
        Ok(())
    }

    #[test]
    fn given_duplicates_when_deleting_then_all_removed() -> DomainResult<()> {
        let store = InMemoryBookmarkStore::with_bookmarks(vec![
            bookmark_at("dup", "1", 0),
            bookmark_at("other", "2", 1),
            bookmark_at("dup", "3", 2),
        ]);

        assert_eq!(store.delete("dup")?, 2);
        assert_eq!(store.list()?, vec![bookmark_at("other", "2", 1)]);
        Ok(())
    }

    #[test]
    fn given_no_match_when_deleting_then_not_found_and_unchanged() -> DomainResult<()> {
        let store = InMemoryBookmarkStore::with_bookmarks(vec![bookmark_at("a", "a", 0)]);

        let err = store.delete("b").unwrap_err();

        assert!(matches!(err, DomainError::BookmarkNotFound(ref t) if t == "b"));
        assert_eq!(store.list()?.len(), 1);
        Ok(())
    }
}
