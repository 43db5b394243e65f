//! On-disk collection shape: `{"api_profiles": [...], "metadata": {...}}`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::profile::{timestamp, Profile};

pub const SCHEMA_VERSION: &str = "1.0";

/// One slot in `api_profiles`.
///
/// Entries that fail to parse or validate are kept verbatim so an unrelated
/// write never destroys them, but they are invisible to every query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum Entry {
    Profile(Profile),
    Unreadable(Value),
}

impl Entry {
    fn name(&self) -> Option<&str> {
        match self {
            Self::Profile(profile) => Some(&profile.name),
            Self::Unreadable(raw) => raw.get("name").and_then(Value::as_str),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Metadata {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default = "schema_version")]
    pub version: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            last_updated: timestamp::format(&Utc::now()),
            version: schema_version(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Collection {
    #[serde(default)]
    api_profiles: Vec<Entry>,
    #[serde(default)]
    metadata: Metadata,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Collection {
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.api_profiles.iter().filter_map(|entry| match entry {
            Entry::Profile(profile) => Some(profile),
            Entry::Unreadable(_) => None,
        })
    }

    pub fn profiles_mut(&mut self) -> impl Iterator<Item = &mut Profile> {
        self.api_profiles.iter_mut().filter_map(|entry| match entry {
            Entry::Profile(profile) => Some(profile),
            Entry::Unreadable(_) => None,
        })
    }

    pub fn unreadable_count(&self) -> usize {
        self.api_profiles
            .iter()
            .filter(|entry| matches!(entry, Entry::Unreadable(_)))
            .count()
    }

    pub fn find(&self, id: &str) -> Option<&Profile> {
        self.profiles().find(|profile| profile.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Profile> {
        self.profiles_mut().find(|profile| profile.id == id)
    }

    pub fn active(&self) -> Option<&Profile> {
        self.profiles().find(|profile| profile.is_active)
    }

    /// Exact, case-sensitive match against every stored name.
    pub fn name_taken(&self, name: &str) -> bool {
        self.api_profiles
            .iter()
            .any(|entry| entry.name() == Some(name))
    }

    pub fn push(&mut self, profile: Profile) {
        self.api_profiles.push(Entry::Profile(profile));
    }

    /// Remove a profile by id, preserving the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<Profile> {
        let index = self
            .api_profiles
            .iter()
            .position(|entry| matches!(entry, Entry::Profile(p) if p.id == id))?;
        match self.api_profiles.remove(index) {
            Entry::Profile(profile) => Some(profile),
            Entry::Unreadable(_) => None,
        }
    }

    /// Mark `id` active and every other profile inactive.
    pub fn set_active(&mut self, id: &str) -> Option<&Profile> {
        for profile in self.profiles_mut() {
            profile.is_active = profile.id == id;
        }
        self.find(id)
    }

    pub fn touch(&mut self) {
        self.metadata.last_updated = timestamp::format(&Utc::now());
        self.metadata.version = schema_version();
    }

    pub fn last_updated(&self) -> &str {
        &self.metadata.last_updated
    }
}
