// src/util/path.rs
use std::path::PathBuf;

use crate::domain::error::{DomainError, DomainResult};

/// Expands `~` and environment variables (`$HOME`, `${XDG_DATA_HOME}`) in a
/// configured path. Unset variables are an error rather than silently empty.
pub fn expand_path(p: &str) -> DomainResult<PathBuf> {
    let expanded = shellexpand::full(p)
        .map_err(|e| DomainError::Other(format!("Cannot expand path '{}': {}", p, e)))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
