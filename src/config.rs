//! Settings file handling. The config lives at `<config dir>/settings.json`
//! and is seeded from a bundled template on first run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SETTINGS_FILE: &str = "settings.json";
pub const COOKIE_FILE: &str = "cookies.json";

const DEFAULT_SETTINGS: &str = include_str!("../assets/default_settings.json");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is not a valid settings file: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("whitelist pattern {pattern:?} does not compile: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Where cookies live between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookiePersistence {
    /// The web view keeps its own cookie database in its profile directory.
    #[default]
    Engine,
    /// A `cookies.json` in the config dir, loaded at startup and written
    /// back at window close.
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "default url")]
    pub default_url: String,
    #[serde(rename = "whitelist regexes")]
    pub whitelist_regexes: Vec<String>,
    #[serde(rename = "cookie persistence", default)]
    pub cookie_persistence: CookiePersistence,
}

pub fn config_dir() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("focusbrowser")
}

/// Profile directory handed to the web view when cookie persistence is
/// delegated to the engine.
pub fn webview_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    let dir = base.join("focusbrowser").join("webview-data");
    fs::create_dir_all(&dir).ok();
    dir
}

/// Load `settings.json` from `dir`, writing the bundled template there
/// first if the file does not exist yet. A file that exists but does not
/// parse is a fatal error, there is no migration.
pub fn load_settings(dir: &Path) -> Result<Settings, ConfigError> {
    let path = dir.join(SETTINGS_FILE);
    if !path.exists() {
        fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        fs::write(&path, DEFAULT_SETTINGS).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "wrote default settings");
    }
    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
}
