//! Credential profile data model and field validation.
//!
//! A [`Profile`] is only ever constructed from validated input: new profiles
//! come from a [`ProfileDraft`], and profiles read back from disk pass through
//! the same checks via `#[serde(try_from)]`. Entries on disk that fail those
//! checks never become `Profile` values.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Maximum profile name length, in characters.
pub const NAME_MAX_CHARS: usize = 50;
/// Minimum API key length, in characters.
pub const API_KEY_MIN_CHARS: usize = 10;

/// One named set of API credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProfileRecord")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub api_key: String,
    pub base_url: String,
    #[serde(serialize_with = "timestamp::serialize")]
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Profile {
    /// Build an inactive profile with a fresh id and creation time.
    pub fn from_draft(draft: ProfileDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            api_key: draft.api_key,
            base_url: draft.base_url,
            created_at: Utc::now().trunc_subsecs(6),
            is_active: false,
        }
    }
}

/// Raw on-disk shape, validated into a [`Profile`].
#[derive(Deserialize)]
struct ProfileRecord {
    id: String,
    name: String,
    api_key: String,
    base_url: String,
    #[serde(with = "timestamp")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    is_active: bool,
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = ValidationError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        validate_name(&record.name)?;
        validate_api_key(&record.api_key)?;
        validate_base_url(&record.base_url)?;
        Ok(Self {
            id: record.id,
            name: record.name,
            api_key: record.api_key,
            base_url: record.base_url,
            created_at: record.created_at,
            is_active: record.is_active,
        })
    }
}

/// Fields required to create a profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub api_key: String,
    pub base_url: String,
}

impl ProfileDraft {
    pub fn new(
        name: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_api_key(&self.api_key)?;
        validate_base_url(&self.base_url)
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl ProfilePatch {
    /// Validate only the fields that are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(api_key) = &self.api_key {
            validate_api_key(api_key)?;
        }
        if let Some(base_url) = &self.base_url {
            validate_base_url(base_url)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.api_key.is_none() && self.base_url.is_none()
    }

    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(name) = &self.name {
            profile.name.clone_from(name);
        }
        if let Some(api_key) = &self.api_key {
            profile.api_key.clone_from(api_key);
        }
        if let Some(base_url) = &self.base_url {
            profile.base_url.clone_from(base_url);
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len == 0 || len > NAME_MAX_CHARS {
        return Err(ValidationError::NameLength {
            len,
            max: NAME_MAX_CHARS,
        });
    }
    Ok(())
}

fn validate_api_key(api_key: &str) -> Result<(), ValidationError> {
    let len = api_key.chars().count();
    if len < API_KEY_MIN_CHARS {
        return Err(ValidationError::ApiKeyTooShort {
            len,
            min: API_KEY_MIN_CHARS,
        });
    }
    Ok(())
}

fn validate_base_url(base_url: &str) -> Result<(), ValidationError> {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        return Ok(());
    }
    Err(ValidationError::BaseUrlScheme(base_url.to_string()))
}

/// Mask an API key for display, keeping a short prefix and suffix.
pub fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len().max(4));
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// RFC 3339 timestamps, also accepting naive ISO-8601 values as UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`")))
    }

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
