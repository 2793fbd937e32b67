// src/config.rs
use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};

pub const APP_NAME: &str = "bookmarks";
pub const CONFIG_FILE: &str = "config.toml";
pub const STORE_FILE: &str = "bookmarks.json";

pub const ENV_STORE_FILE: &str = "BOOKMARKS_FILE";
pub const ENV_FETCH_TIMEOUT: &str = "BOOKMARKS_FETCH_TIMEOUT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Path to the JSON file holding all bookmarks
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Seconds before a title fetch is abandoned
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_store_path() -> String {
    config_dir(env::consts::OS, APP_NAME)
        .join(STORE_FILE)
        .to_string_lossy()
        .into_owned()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn home() -> PathBuf {
    non_empty_var("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_default()
}

/// Per-user configuration directory for `app_name` on the OS named by `os`
/// (as in `std::env::consts::OS`). Empty variables count as unset.
pub fn config_dir(os: &str, app_name: &str) -> PathBuf {
    let base = match os {
        "windows" => non_empty_var("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                PathBuf::from(non_empty_var("USERPROFILE").unwrap_or_default())
                    .join("AppData")
                    .join("Roaming")
            }),
        "macos" | "linux" => non_empty_var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home().join(".config")),
        _ => home(),
    };
    base.join(app_name)
}

/// Location of the settings file when none is given explicitly
pub fn default_config_path() -> PathBuf {
    config_dir(env::consts::OS, APP_NAME).join(CONFIG_FILE)
}

/// Load settings: defaults, then the config file, then environment overrides.
///
/// An explicit `config_file` must exist; the default location is optional.
#[instrument(level = "debug")]
pub fn load_settings(config_file: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    let mut settings = match config_file {
        Some(path) if !path.exists() => {
            return Err(DomainError::Other(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Some(path) => read_config_file(path)?,
        None => {
            let path = default_config_path();
            if path.exists() {
                read_config_file(&path)?
            } else {
                debug!("No config file at {:?}, using defaults", path);
                Settings::default()
            }
        }
    };

    if let Some(store_path) = non_empty_var(ENV_STORE_FILE) {
        trace!("Using {} from environment: {}", ENV_STORE_FILE, store_path);
        settings.store_path = store_path;
    }

    if let Some(timeout) = non_empty_var(ENV_FETCH_TIMEOUT) {
        trace!("Using {} from environment: {}", ENV_FETCH_TIMEOUT, timeout);
        settings.fetch_timeout_secs = timeout.parse().map_err(|_| {
            DomainError::Other(format!(
                "{} must be a whole number of seconds, got '{}'",
                ENV_FETCH_TIMEOUT, timeout
            ))
        })?;
    }

    trace!("Settings loaded: {:?}", settings);
    Ok(settings)
}

fn read_config_file(path: &Path) -> DomainResult<Settings> {
    trace!("Loading config from: {:?}", path);
    let text = std::fs::read_to_string(path)
        .map_err(|e| DomainError::from(e).context(format!("reading {}", path.display())))?;
    toml::from_str(&text).map_err(|e| {
        DomainError::Other(format!("Invalid config file {}: {}", path.display(), e))
    })
}

pub fn generate_default_config() -> String {
    toml::to_string_pretty(&Settings::default())
        .unwrap_or_else(|_| "# Error generating default configuration".to_string())
}
