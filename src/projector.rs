//! Mirrors the active profile into Claude Code's `settings.json`.
//!
//! Only `env.ANTHROPIC_API_KEY`, `env.ANTHROPIC_BASE_URL` and the top-level
//! `apiKeyHelper` are ever written. Everything else in the document is carried
//! through unchanged, in its original key order.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::error::ProjectionError;
use crate::fsutil::{json_to_bytes, read_optional, write_atomic_if_changed};
use crate::profile::Profile;

pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_BASE_URL: &str = "ANTHROPIC_BASE_URL";
pub const KEY_API_KEY_HELPER: &str = "apiKeyHelper";

/// `source` marker when the values were read from the settings file.
pub const SOURCE_SETTINGS: &str = "Claude Code settings.json";
/// `source` marker when the settings file does not exist.
pub const SOURCE_MISSING: &str = "settings.json not found";
/// `source` when the settings document is valid JSON but not an object.
pub const SOURCE_NOT_OBJECT: &str = "settings.json invalid: root is not an object";

/// Credentials as currently written in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentSettings {
    pub api_key: String,
    pub base_url: String,
    pub source: String,
}

impl CurrentSettings {
    fn empty(source: impl Into<String>) -> Self {
        Self {
            api_key: String::new(),
            base_url: String::new(),
            source: source.into(),
        }
    }
}

/// Reads and patches one settings file.
#[derive(Debug, Clone)]
pub struct SettingsProjector {
    settings_path: PathBuf,
}

impl SettingsProjector {
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn settings_exists(&self) -> bool {
        self.settings_path.exists()
    }

    /// Write `profile`'s credentials into the settings file.
    pub fn project(&self, profile: &Profile) -> Result<(), ProjectionError> {
        let target = self.write_target()?;
        let mut root = read_document(&target)?;
        patch_credentials(&mut root, profile, &target)?;
        let bytes = json_to_bytes(&root).map_err(ProjectionError::Encode)?;
        let written =
            write_atomic_if_changed(&target, &bytes).map_err(|source| ProjectionError::Write {
                path: target.clone(),
                source,
            })?;
        if written {
            info!(profile = %profile.name, path = %target.display(), "projected profile into settings");
        } else {
            debug!(profile = %profile.name, "settings already up to date");
        }
        Ok(())
    }

    /// Best-effort read of the two projected env values.
    ///
    /// Never fails; problems are reported through `source`.
    pub fn read_current(&self) -> CurrentSettings {
        let bytes = match read_optional(&self.settings_path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return CurrentSettings::empty(SOURCE_MISSING),
            Err(err) => return CurrentSettings::empty(format!("settings.json unreadable: {err}")),
        };
        let root: Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(err) => return CurrentSettings::empty(format!("settings.json invalid: {err}")),
        };
        if !root.is_object() {
            return CurrentSettings::empty(SOURCE_NOT_OBJECT);
        }
        let env = root.get("env");
        let field = |key: &str| {
            env.and_then(|env| env.get(key))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        CurrentSettings {
            api_key: field(ENV_API_KEY),
            base_url: field(ENV_BASE_URL),
            source: SOURCE_SETTINGS.to_string(),
        }
    }

    /// Resolve a symlinked settings path to its target so the link survives.
    fn write_target(&self) -> Result<PathBuf, ProjectionError> {
        let path = &self.settings_path;
        match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let link = std::fs::read_link(path).map_err(|source| ProjectionError::Read {
                    path: path.clone(),
                    source,
                })?;
                if link.is_absolute() {
                    return Ok(link);
                }
                let parent = path.parent().unwrap_or_else(|| Path::new(""));
                Ok(parent.join(link))
            }
            _ => Ok(path.clone()),
        }
    }
}

/// Document used when the settings file does not exist yet.
fn default_document() -> Value {
    json!({
        "env": {},
        "permissions": {
            "allow": [],
            "deny": []
        }
    })
}

fn read_document(path: &Path) -> Result<Value, ProjectionError> {
    let bytes = read_optional(path).map_err(|source| ProjectionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    match bytes {
        Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => {
            serde_json::from_slice(&bytes).map_err(|source| ProjectionError::Parse {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Ok(default_document()),
    }
}

fn patch_credentials(root: &mut Value, profile: &Profile, path: &Path) -> Result<(), ProjectionError> {
    let not_object = |key| ProjectionError::NotAnObject {
        path: path.to_path_buf(),
        key,
    };
    let root = root.as_object_mut().ok_or_else(|| not_object("<root>"))?;
    let env = root
        .entry("env")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| not_object("env"))?;
    env.insert(ENV_API_KEY.to_string(), Value::String(profile.api_key.clone()));
    env.insert(ENV_BASE_URL.to_string(), Value::String(profile.base_url.clone()));
    root.insert(
        KEY_API_KEY_HELPER.to_string(),
        Value::String(api_key_helper_command(&profile.api_key)),
    );
    Ok(())
}

/// Shell command that prints `api_key`, single-quoted for POSIX shells.
pub fn api_key_helper_command(api_key: &str) -> String {
    format!("echo '{}'", api_key.replace('\'', r"'\''"))
}
