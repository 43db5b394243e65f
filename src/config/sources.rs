//! Config-file source discovery.
//!
//! Precedence: explicit path > `./ccman.toml` > global file > built-in defaults.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::ConfigSource;

pub(super) const LOCAL_CONFIG_FILE: &str = "ccman.toml";

/// Global config location under a config root (`<root>/ccman/ccman.toml`).
pub(super) fn global_config_path(root: &Path) -> PathBuf {
    root.join("ccman").join("ccman.toml")
}

/// Read config text from the highest-precedence available source.
pub(super) fn read_config_text_with_sources<FRead, FRoot>(
    path_override: Option<&Path>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    // An explicit path must exist; a typo should not silently fall back.
    if let Some(path) = path_override {
        let text = read_file(path)?;
        return Ok((text, ConfigSource::Explicit(path.to_path_buf())));
    }

    if let Ok(text) = read_file(Path::new(LOCAL_CONFIG_FILE)) {
        return Ok((text, ConfigSource::Local));
    }

    if let Some(root) = config_root() {
        let global = global_config_path(&root);
        if let Ok(text) = read_file(&global) {
            return Ok((text, ConfigSource::Global(global)));
        }
    }

    Ok((String::new(), ConfigSource::BuiltInDefaults))
}
