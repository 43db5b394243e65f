//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. CLI flags (`--data-file`, `--settings`, `--host`, `--port`), applied by
//!    the binary after loading.
//! 2. Environment variables (`CCMAN_DATA_FILE`, `CCMAN_SETTINGS_PATH`,
//!    `CCMAN_HOST`, `CCMAN_PORT`, `NO_COLOR`).
//! 3. TOML file specified via `--config`.
//! 4. `./ccman.toml` in the current directory.
//! 5. `$XDG_CONFIG_HOME/ccman/ccman.toml` (or `~/.config/ccman/ccman.toml`).
//! 6. Built-in defaults.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

mod defaults;
mod env;
mod init;
mod sources;
mod types;

pub use init::{
    config_root_dir, default_global_config_path, initialize_config_at_path,
    initialize_default_global_config,
};
pub use types::{
    Config, ConfigInitResult, ConfigSource, DisplayConfig, LoadedConfig, ServerConfig,
};
use types::FileConfig;

impl Default for Config {
    fn default() -> Self {
        resolve_file_config(FileConfig::default(), dirs::home_dir().as_ref())
    }
}

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from `--config`).
pub fn load_config(path_override: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
        dirs::home_dir(),
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&Path>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
    home: Option<PathBuf>,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) =
        sources::read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let parsed: FileConfig = toml::from_str(&text)?;
    let mut config = resolve_file_config(parsed, home.as_ref());
    env::apply_env_overrides(&mut config, &env_lookup, home.as_ref())?;
    validate_config(&config)?;
    tracing::debug!(source = %source.describe(), "loaded configuration");
    Ok(LoadedConfig { config, source })
}

fn resolve_file_config(parsed: FileConfig, home: Option<&PathBuf>) -> Config {
    Config {
        data_file: expand_home(&parsed.store.data_file, home),
        settings_path: expand_home(&parsed.claude.settings_path, home),
        server: parsed.server,
        display: parsed.display,
    }
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.data_file.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("store.data_file must not be empty".into()));
    }
    if config.settings_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid(
            "claude.settings_path must not be empty".into(),
        ));
    }
    if config.server.host.trim().is_empty() {
        return Err(ConfigError::Invalid("server.host must not be empty".into()));
    }
    Ok(())
}

/// Expand a leading `~` or `~/` against `home`. Other paths pass through.
pub(crate) fn expand_home(raw: &str, home: Option<&PathBuf>) -> PathBuf {
    let trimmed = raw.trim();
    match (trimmed, home) {
        ("~", Some(home)) => home.clone(),
        (path, Some(home)) if path.starts_with("~/") => home.join(&path[2..]),
        (path, _) => PathBuf::from(path),
    }
}
