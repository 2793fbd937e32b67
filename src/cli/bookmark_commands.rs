// src/cli/bookmark_commands.rs
use std::io::Write;
use std::time::Duration;

use chrono::Local;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::application::services::library::Library;
use crate::cli::display::write_table;
use crate::cli::error::{CliError, CliResult};
use crate::domain::bookmark::Bookmark;
use crate::domain::repositories::store::BookmarkStore;

/// Add a bookmark stamped with the current time.
///
/// Without `name` a web URL gets its title from the page. The fetch is
/// cancelled after `timeout` or on Ctrl-C; either way nothing is stored.
#[instrument(skip(library), level = "debug")]
pub fn add<S: BookmarkStore>(
    library: &Library<S>,
    content: String,
    name: Option<String>,
    timeout: Duration,
) -> CliResult<Bookmark> {
    if content.is_empty() {
        return Err(CliError::InvalidInput("no content provided".to_string()));
    }
    let bookmark = Bookmark::new(name.unwrap_or_default(), content);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let cancel = CancellationToken::new();
    let mut timed_out = false;
    let mut interrupted = false;
    let mut watch_signals = true;

    let result = runtime.block_on(async {
        let add = library.add(&cancel, bookmark);
        tokio::pin!(add);
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        // after cancelling keep polling `add` so it can observe the token
        loop {
            tokio::select! {
                result = &mut add => break result,
                _ = &mut deadline, if !cancel.is_cancelled() => {
                    warn!("Title fetch timed out after {:?}", timeout);
                    timed_out = true;
                    cancel.cancel();
                }
                signal = tokio::signal::ctrl_c(), if watch_signals && !cancel.is_cancelled() => {
                    match signal {
                        Ok(()) => {
                            interrupted = true;
                            cancel.cancel();
                        }
                        Err(e) => {
                            debug!("Cannot listen for Ctrl-C: {}", e);
                            watch_signals = false;
                        }
                    }
                }
            }
        }
    });

    match result {
        Ok(bookmark) => {
            eprintln!("Added bookmark: {}", bookmark.title);
            Ok(bookmark)
        }
        Err(_) if interrupted => Err(CliError::OperationAborted),
        Err(e) if timed_out => Err(CliError::from(e).context(format!(
            "title fetch timed out after {}s",
            timeout.as_secs_f32()
        ))),
        Err(e) => Err(CliError::from(e).context("Failed to add bookmark")),
    }
}

#[instrument(skip(library, out), level = "debug")]
pub fn list<S: BookmarkStore, W: Write>(library: &Library<S>, out: &mut W) -> CliResult<()> {
    let bookmarks = library
        .list()
        .map_err(|e| CliError::from(e).context("Failed to list bookmarks"))?;
    write_table(out, &bookmarks, &Local)?;
    Ok(())
}

#[instrument(skip(library, out), level = "debug")]
pub fn search<S: BookmarkStore, W: Write>(
    library: &Library<S>,
    query: &str,
    out: &mut W,
) -> CliResult<()> {
    let bookmarks = library
        .search(query)
        .map_err(|e| CliError::from(e).context("Failed to search bookmarks"))?;
    write_table(out, &bookmarks, &Local)?;
    Ok(())
}

#[instrument(skip(library), level = "debug")]
pub fn delete<S: BookmarkStore>(library: &Library<S>, title: &str) -> CliResult<usize> {
    let removed = library.delete(title).map_err(CliError::from)?;
    eprintln!("Deleted {} bookmark(s) titled '{}'", removed, title);
    Ok(removed)
}
