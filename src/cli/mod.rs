// src/cli/mod.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::CommandFactory;
use tracing::debug;

use crate::application::services::library::Library;
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::config::{generate_default_config, Settings};
use crate::infrastructure::repositories::json::JsonBookmarkStore;
use crate::util::path::expand_path;

pub mod args;
pub mod bookmark_commands;
pub mod display;
pub mod error;

pub fn execute_command(cli: Cli, settings: &Settings) -> CliResult<()> {
    if cli.generate_config {
        println!("{}", generate_default_config());
        return Ok(());
    }

    let command = match (cli.command, cli.search) {
        (Some(command), _) => command,
        (None, Some(query)) => Commands::Search { query },
        (None, None) => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    let library = open_library(cli.file.as_deref(), settings)?;
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Add { content, name } => bookmark_commands::add(
            &library,
            content,
            name,
            Duration::from_secs(settings.fetch_timeout_secs),
        )
        .map(|_| ()),
        Commands::List => bookmark_commands::list(&library, &mut stdout),
        Commands::Search { query } => bookmark_commands::search(&library, &query, &mut stdout),
        Commands::Delete { title } => bookmark_commands::delete(&library, &title).map(|_| ()),
    }
}

/// The `--file` argument wins over the configured path, which may use `~` and `$VARS`.
pub fn resolve_store_path(file: Option<&Path>, settings: &Settings) -> CliResult<PathBuf> {
    match file {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(expand_path(&settings.store_path)?),
    }
}

fn open_library(file: Option<&Path>, settings: &Settings) -> CliResult<Library<JsonBookmarkStore>> {
    let path = resolve_store_path(file, settings)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::from(e).context(format!("Cannot create directory {}", parent.display()))
        })?;
    }
    debug!("Using bookmark file {}", path.display());
    Ok(Library::new(Arc::new(JsonBookmarkStore::new(path))))
}
