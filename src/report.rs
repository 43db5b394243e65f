//! Read-only views handed to the CLI and HTTP layers.

use std::path::PathBuf;

use serde::Serialize;

use crate::profile::Profile;
use crate::projector::CurrentSettings;

/// `list` output: profiles plus the active id and counts.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileListing {
    pub profiles: Vec<Profile>,
    pub active_profile_id: Option<String>,
    pub total_count: usize,
    /// Entries in the backing file that could not be read.
    pub skipped_entries: usize,
}

impl ProfileListing {
    pub fn from_parts(profiles: Vec<Profile>, skipped_entries: usize) -> Self {
        let active_profile_id = profiles
            .iter()
            .find(|profile| profile.is_active)
            .map(|profile| profile.id.clone());
        let total_count = profiles.len();
        Self {
            profiles,
            active_profile_id,
            total_count,
            skipped_entries,
        }
    }
}

/// Active profile from the store next to what settings.json really holds.
///
/// The two can disagree when another tool edited the settings file.
#[derive(Debug, Clone)]
pub struct CurrentConfig {
    pub active: Option<Profile>,
    pub settings: CurrentSettings,
}

impl CurrentConfig {
    /// True when settings.json carries the active profile's credentials.
    pub fn in_sync(&self) -> bool {
        match &self.active {
            Some(profile) => {
                profile.api_key == self.settings.api_key
                    && profile.base_url == self.settings.base_url
            }
            None => false,
        }
    }
}

/// Flattened `current` view used by `--json` and the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentView {
    pub api_key: String,
    pub base_url: String,
    pub profile_name: Option<String>,
    pub profile_id: Option<String>,
    pub source: String,
}

impl From<CurrentConfig> for CurrentView {
    fn from(current: CurrentConfig) -> Self {
        let (profile_name, profile_id) = match current.active {
            Some(profile) => (Some(profile.name), Some(profile.id)),
            None => (None, None),
        };
        Self {
            api_key: current.settings.api_key,
            base_url: current.settings.base_url,
            profile_name,
            profile_id,
            source: current.settings.source,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub api_config_count: usize,
    pub active_profile_id: Option<String>,
    pub claude_settings_exists: bool,
    pub skipped_entries: usize,
    pub data_file: PathBuf,
    pub settings_path: PathBuf,
}
