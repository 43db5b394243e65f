//! Default configuration constants.

/// Embedded `ccman.toml` template written by `ccman init`.
pub(super) const DEFAULT_CCMAN_CONFIG_TEMPLATE: &str = include_str!("../templates/ccman.toml");
/// Profile collection file, relative to the working directory.
pub(super) const DEFAULT_DATA_FILE: &str = crate::store::DEFAULT_DATA_FILE;
/// Claude Code user settings file.
pub(super) const DEFAULT_SETTINGS_PATH: &str = "~/.claude/settings.json";
/// HTTP bind host for `ccman serve`. Loopback only unless configured.
pub(super) const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
/// HTTP bind port for `ccman serve`.
pub(super) const DEFAULT_SERVER_PORT: u16 = 50000;
