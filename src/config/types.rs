//! Configuration data model.
//!
//! `FileConfig` mirrors the TOML layout with raw strings; `Config` is the
//! resolved form with `~` expanded and env overrides applied.

use serde::Deserialize;
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_DATA_FILE, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SETTINGS_PATH,
};

/// Top-level runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Profile collection file.
    pub data_file: PathBuf,
    /// Claude Code settings file the active profile is projected into.
    pub settings_path: PathBuf,
    pub server: ServerConfig,
    pub display: DisplayConfig,
}

/// Bind address for `ccman serve`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Raw `ccman.toml` contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileConfig {
    pub(super) store: StoreSection,
    pub(super) claude: ClaudeSection,
    pub(super) server: ServerConfig,
    pub(super) display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(super) struct StoreSection {
    pub(super) data_file: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            data_file: DEFAULT_DATA_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(super) struct ClaudeSection {
    pub(super) settings_path: String,
}

impl Default for ClaudeSection {
    fn default() -> Self {
        Self {
            settings_path: DEFAULT_SETTINGS_PATH.to_string(),
        }
    }
}

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config <path>`.
    Explicit(PathBuf),
    /// `./ccman.toml`.
    Local,
    /// `$XDG_CONFIG_HOME/ccman/ccman.toml`.
    Global(PathBuf),
    /// No file found.
    BuiltInDefaults,
}

impl ConfigSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Explicit(path) | Self::Global(path) => path.display().to_string(),
            Self::Local => "./ccman.toml".to_string(),
            Self::BuiltInDefaults => "built-in defaults".to_string(),
        }
    }
}

/// Configuration payload plus where it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

/// Result of `ccman init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigInitResult {
    Created {
        path: PathBuf,
    },
    AlreadyInitialized {
        path: PathBuf,
    },
    Overwritten {
        path: PathBuf,
        backup_path: PathBuf,
    },
}
