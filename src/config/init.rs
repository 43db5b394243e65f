//! Config-path helpers and `ccman init`.
//!
//! Creation uses `create_new` so two concurrent inits never clobber each other.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::fsutil::timestamped_backup_path;

use super::defaults::DEFAULT_CCMAN_CONFIG_TEMPLATE;
use super::sources::global_config_path;
use super::ConfigInitResult;

/// Default per-user config path (`~/.config/ccman/ccman.toml`).
pub fn default_global_config_path() -> Option<PathBuf> {
    config_root_dir().map(|root| global_config_path(&root))
}

/// Write the config template to `path`.
///
/// - Without `force`, an existing file is left alone.
/// - With `force`, the existing file is copied to `<stem>.bak.<unix-seconds>`
///   first, then replaced.
pub fn initialize_config_at_path(path: &Path, force: bool) -> Result<ConfigInitResult, ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    if path.exists() {
        if !force {
            return Ok(ConfigInitResult::AlreadyInitialized {
                path: path.to_path_buf(),
            });
        }
        let backup_path = timestamped_backup_path(path);
        std::fs::copy(path, &backup_path)?;
        std::fs::write(path, DEFAULT_CCMAN_CONFIG_TEMPLATE)?;
        return Ok(ConfigInitResult::Overwritten {
            path: path.to_path_buf(),
            backup_path,
        });
    }

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(DEFAULT_CCMAN_CONFIG_TEMPLATE.as_bytes())?;
            Ok(ConfigInitResult::Created {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Ok(ConfigInitResult::AlreadyInitialized {
                path: path.to_path_buf(),
            })
        }
        Err(e) => Err(ConfigError::Io(e)),
    }
}

/// Initialize the default global config file.
pub fn initialize_default_global_config(force: bool) -> Result<ConfigInitResult, ConfigError> {
    let path = default_global_config_path().ok_or_else(|| {
        ConfigError::Invalid(
            "unable to resolve default config path for ~/.config/ccman/ccman.toml".to_string(),
        )
    })?;
    initialize_config_at_path(&path, force)
}

/// Resolve the base config directory from env/home conventions.
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}
