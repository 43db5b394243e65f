//! Environment variable overrides (`CCMAN_*`).
//!
//! Applied after the config file and before CLI flags.

use std::path::PathBuf;

use crate::error::ConfigError;

use super::{expand_home, Config};

pub(super) const ENV_DATA_FILE: &str = "CCMAN_DATA_FILE";
pub(super) const ENV_SETTINGS_PATH: &str = "CCMAN_SETTINGS_PATH";
pub(super) const ENV_HOST: &str = "CCMAN_HOST";
pub(super) const ENV_PORT: &str = "CCMAN_PORT";
pub(super) const ENV_NO_COLOR: &str = "NO_COLOR";

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
    home: Option<&PathBuf>,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(path) = non_empty(env_lookup, ENV_DATA_FILE) {
        config.data_file = expand_home(&path, home);
    }
    if let Some(path) = non_empty(env_lookup, ENV_SETTINGS_PATH) {
        config.settings_path = expand_home(&path, home);
    }
    if let Some(host) = non_empty(env_lookup, ENV_HOST) {
        config.server.host = host;
    }
    if let Some(port) = non_empty(env_lookup, ENV_PORT) {
        config.server.port = port.parse::<u16>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid {ENV_PORT} value `{port}`: expected a port number (0-65535)"
            ))
        })?;
    }
    // https://no-color.org: any non-empty value disables color.
    if non_empty(env_lookup, ENV_NO_COLOR).is_some() {
        config.display.color = false;
    }
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
