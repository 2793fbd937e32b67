// src/application/services/library.rs
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::application::error::ApplicationResult;
use crate::domain::bookmark::Bookmark;
use crate::domain::error::DomainError;
use crate::domain::repositories::store::BookmarkStore;
use crate::infrastructure::http::TitleFetcher;

/// Public bookmark operations composed from a store and the title fetcher.
///
/// Holds no state of its own beyond its collaborators.
#[derive(Debug)]
pub struct Library<S: BookmarkStore> {
    store: Arc<S>,
    fetcher: TitleFetcher,
}

impl<S: BookmarkStore> Library<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_fetcher(store, TitleFetcher::new())
    }

    pub fn with_fetcher(store: Arc<S>, fetcher: TitleFetcher) -> Self {
        Self { store, fetcher }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Store a bookmark, deriving its title from the page when none is given.
    ///
    /// The page is fetched before the store is touched; if the fetch fails
    /// nothing is stored. Returns the bookmark as stored.
    ///
    /// # Note
    /// The returned future is not `Send`: the HTML scanner keeps
    /// single-threaded state across awaits. Drive it with `block_on`, a
    /// `LocalSet` or a current-thread runtime rather than `tokio::spawn`.
    #[instrument(skip(self, cancel, bookmark), level = "debug",
               fields(title = %bookmark.title, content = %bookmark.content))]
    pub async fn add(
        &self,
        cancel: &CancellationToken,
        mut bookmark: Bookmark,
    ) -> ApplicationResult<Bookmark> {
        if bookmark.needs_title() {
            debug!("No title given, fetching from {}", bookmark.content);
            let title = self
                .fetcher
                .fetch_title(cancel, &bookmark.content)
                .await
                .map_err(|e| DomainError::from(e).context(bookmark.content.clone()))?;
            bookmark.title = title;
        }

        self.store.add(&bookmark)?;
        info!("Added bookmark '{}'", bookmark.title);
        Ok(bookmark)
    }

    #[instrument(skip(self), level = "debug")]
    pub fn list(&self) -> ApplicationResult<Vec<Bookmark>> {
        Ok(self.store.list()?)
    }

    /// Bookmarks whose title or content contains `query`, case-sensitive
    #[instrument(skip(self), level = "debug")]
    pub fn search(&self, query: &str) -> ApplicationResult<Vec<Bookmark>> {
        let results: Vec<Bookmark> = self
            .store
            .list()?
            .into_iter()
            .filter(|b| b.matches(query))
            .collect();
        debug!("{} bookmarks match '{}'", results.len(), query);
        Ok(results)
    }

    /// Remove every bookmark titled `title`; returns how many were removed
    #[instrument(skip(self), level = "debug")]
    pub fn delete(&self, title: &str) -> ApplicationResult<usize> {
        let removed = self.store.delete(title)?;
        info!("Deleted {} bookmarks titled '{}'", removed, title);
        Ok(removed)
    }
}
