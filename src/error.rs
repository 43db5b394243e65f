//! Error types for the profile store, the settings projector and configuration.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A profile field failed validation before any state was touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must be between 1 and {max} characters (got {len})")]
    NameLength { len: usize, max: usize },
    #[error("api_key must be at least {min} characters (got {len})")]
    ApiKeyTooShort { len: usize, min: usize },
    #[error("base_url must start with http:// or https:// (got `{0}`)")]
    BaseUrlScheme(String),
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameLength { .. } => "name",
            Self::ApiKeyTooShort { .. } => "api_key",
            Self::BaseUrlScheme(_) => "base_url",
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectionError
// ---------------------------------------------------------------------------

/// Writing credentials into the external settings file failed.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("failed to read settings {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("settings {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("settings {}: `{key}` must be a JSON object", path.display())]
    NotAnObject { path: PathBuf, key: &'static str },
    #[error("failed to encode settings: {0}")]
    Encode(serde_json::Error),
    #[error("failed to write settings {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Failures surfaced by [`crate::store::ProfileStore`] operations.
///
/// A missing profile is never an error; operations report it as `Ok(false)`
/// or `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a profile named `{0}` already exists")]
    DuplicateName(String),
    #[error("failed to {action} {}: {source}", path.display())]
    Persistence {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode profile collection: {0}")]
    Encode(serde_json::Error),
    #[error("profile collection {} is not valid JSON; refusing to overwrite it: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to apply profile to settings: {0}")]
    Projection(#[from] ProjectionError),
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing `ccman.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
