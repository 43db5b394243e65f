//! JSON-backed profile store with a single active profile.
//!
//! Every public operation runs one full read-modify-write cycle under the
//! store's lock. Operations that change which profile is active project it
//! into the settings file *before* the collection is persisted; a failed
//! projection aborts the operation and nothing is written.

mod collection;

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::fsutil::{json_to_bytes, read_optional, timestamped_backup_path, write_atomic};
use crate::profile::{Profile, ProfileDraft, ProfilePatch};
use crate::projector::SettingsProjector;
use crate::report::{CurrentConfig, ProfileListing, StatusReport};

use collection::Collection;
pub use collection::SCHEMA_VERSION;

/// Default backing file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "./data/api_configs.json";

/// Profile collection owner. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct ProfileStore {
    data_file: PathBuf,
    projector: SettingsProjector,
    lock: Mutex<()>,
}

/// Outcome of reading the backing file.
enum Loaded {
    Ready(Collection),
    Corrupt(serde_json::Error),
}

impl ProfileStore {
    /// Build a store over `data_file`. The file is created on first access.
    pub fn open(data_file: impl Into<PathBuf>, projector: SettingsProjector) -> Self {
        Self {
            data_file: data_file.into(),
            projector,
            lock: Mutex::new(()),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn projector(&self) -> &SettingsProjector {
        &self.projector
    }

    /// All readable profiles in insertion order.
    pub fn list(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.list_report()?.profiles)
    }

    /// Profiles plus active id, total and the number of skipped entries.
    pub fn list_report(&self) -> Result<ProfileListing, StoreError> {
        let _guard = self.lock.lock();
        let collection = self.load_for_read()?;
        Ok(ProfileListing::from_parts(
            collection.profiles().cloned().collect(),
            collection.unreadable_count(),
        ))
    }

    pub fn get(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load_for_read()?.find(id).cloned())
    }

    pub fn get_active(&self) -> Result<Option<Profile>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load_for_read()?.active().cloned())
    }

    /// Create a profile. It becomes active when no other profile is.
    pub fn create(&self, draft: ProfileDraft) -> Result<Profile, StoreError> {
        draft.validate()?;
        let _guard = self.lock.lock();
        let mut collection = self.load_for_update()?;
        if collection.name_taken(&draft.name) {
            return Err(StoreError::DuplicateName(draft.name));
        }

        let mut profile = Profile::from_draft(draft);
        if collection.active().is_none() {
            profile.is_active = true;
            self.projector.project(&profile)?;
        }
        collection.push(profile.clone());
        self.persist(&mut collection)?;
        info!(id = %profile.id, name = %profile.name, active = profile.is_active, "created profile");
        Ok(profile)
    }

    /// Apply `patch` to profile `id`. Returns `false` when it does not exist.
    pub fn update(&self, id: &str, patch: &ProfilePatch) -> Result<bool, StoreError> {
        patch.validate()?;
        let _guard = self.lock.lock();
        let mut collection = self.load_for_update()?;
        let Some(profile) = collection.find_mut(id) else {
            debug!(id, "update: profile not found");
            return Ok(false);
        };
        patch.apply_to(profile);
        if profile.is_active {
            self.projector.project(profile)?;
        }
        self.persist(&mut collection)?;
        info!(id, "updated profile");
        Ok(true)
    }

    /// Remove profile `id`. Deleting the active profile promotes the first
    /// remaining one.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock();
        let mut collection = self.load_for_update()?;
        let Some(removed) = collection.remove(id) else {
            debug!(id, "delete: profile not found");
            return Ok(false);
        };
        if removed.is_active {
            if let Some(first) = collection.profiles_mut().next() {
                first.is_active = true;
                self.projector.project(first)?;
                info!(id = %first.id, name = %first.name, "promoted profile after deleting the active one");
            }
        }
        self.persist(&mut collection)?;
        info!(id, name = %removed.name, "deleted profile");
        Ok(true)
    }

    /// Make `id` the only active profile and project it.
    ///
    /// Returns the activated profile, or `None` for an unknown id; nothing is
    /// touched in that case.
    pub fn activate(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let _guard = self.lock.lock();
        let mut collection = self.load_for_update()?;
        let Some(profile) = collection.set_active(id).cloned() else {
            debug!(id, "activate: profile not found");
            return Ok(None);
        };
        self.projector.project(&profile)?;
        self.persist(&mut collection)?;
        info!(id, name = %profile.name, "activated profile");
        Ok(Some(profile))
    }

    /// Copy the backing file to `<stem>.bak.<unix-seconds>`.
    pub fn backup(&self) -> Result<PathBuf, StoreError> {
        let _guard = self.lock.lock();
        self.ensure_exists()?;
        let backup_path = timestamped_backup_path(&self.data_file);
        std::fs::copy(&self.data_file, &backup_path).map_err(|source| {
            StoreError::Persistence {
                action: "back up",
                path: backup_path.clone(),
                source,
            }
        })?;
        info!(path = %backup_path.display(), "backed up profile collection");
        Ok(backup_path)
    }

    /// Active profile alongside what the settings file actually contains.
    pub fn current(&self) -> Result<CurrentConfig, StoreError> {
        let active = self.get_active()?;
        Ok(CurrentConfig {
            active,
            settings: self.projector.read_current(),
        })
    }

    pub fn status(&self) -> Result<StatusReport, StoreError> {
        let listing = self.list_report()?;
        Ok(StatusReport {
            api_config_count: listing.total_count,
            active_profile_id: listing.active_profile_id,
            claude_settings_exists: self.projector.settings_exists(),
            skipped_entries: listing.skipped_entries,
            data_file: self.data_file.clone(),
            settings_path: self.projector.settings_path().to_path_buf(),
        })
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn load(&self) -> Result<Loaded, StoreError> {
        let bytes = read_optional(&self.data_file).map_err(|source| StoreError::Persistence {
            action: "read",
            path: self.data_file.clone(),
            source,
        })?;
        let Some(bytes) = bytes else {
            let mut collection = Collection::default();
            self.persist(&mut collection)?;
            debug!(path = %self.data_file.display(), "initialized empty profile collection");
            return Ok(Loaded::Ready(collection));
        };
        match serde_json::from_slice::<Collection>(&bytes) {
            Ok(collection) => {
                let skipped = collection.unreadable_count();
                if skipped > 0 {
                    warn!(skipped, path = %self.data_file.display(), "skipping unreadable profile entries");
                }
                Ok(Loaded::Ready(collection))
            }
            Err(err) => Ok(Loaded::Corrupt(err)),
        }
    }

    /// Queries degrade a corrupt file to an empty collection.
    fn load_for_read(&self) -> Result<Collection, StoreError> {
        match self.load()? {
            Loaded::Ready(collection) => Ok(collection),
            Loaded::Corrupt(err) => {
                warn!(path = %self.data_file.display(), error = %err, "profile collection is not valid JSON; treating as empty");
                Ok(Collection::default())
            }
        }
    }

    /// Mutations refuse to overwrite a corrupt file.
    fn load_for_update(&self) -> Result<Collection, StoreError> {
        match self.load()? {
            Loaded::Ready(collection) => Ok(collection),
            Loaded::Corrupt(source) => Err(StoreError::Corrupt {
                path: self.data_file.clone(),
                source,
            }),
        }
    }

    fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.data_file.exists() {
            return Ok(());
        }
        self.persist(&mut Collection::default())
    }

    fn persist(&self, collection: &mut Collection) -> Result<(), StoreError> {
        collection.touch();
        let bytes = json_to_bytes(collection).map_err(StoreError::Encode)?;
        write_atomic(&self.data_file, &bytes).map_err(|source| StoreError::Persistence {
            action: "write",
            path: self.data_file.clone(),
            source,
        })?;
        debug!(path = %self.data_file.display(), last_updated = collection.last_updated(), "persisted profile collection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::{ENV_API_KEY, ENV_BASE_URL};
    use crate::testsupport::{TestTempDir, FIXTURE_DATA_FILE, FIXTURE_SETTINGS_FILE};
    use serde_json::Value;

    fn draft(name: &str, key: &str) -> ProfileDraft {
        ProfileDraft::new(name, key, format!("https://{name}.example.com"))
    }

    fn settings_env(tmp: &TestTempDir, key: &str) -> Value {
        tmp.read_json(FIXTURE_SETTINGS_FILE)["env"][key].clone()
    }

    fn active_count(store: &ProfileStore) -> usize {
        store.list().unwrap().iter().filter(|p| p.is_active).count()
    }

    #[test]
    fn first_access_creates_empty_collection_file() {
        let tmp = TestTempDir::new("store-init");
        let store = tmp.profile_store();
        assert!(store.list().unwrap().is_empty());

        let raw = tmp.read_json(FIXTURE_DATA_FILE);
        assert_eq!(raw["api_profiles"], serde_json::json!([]));
        assert_eq!(raw["metadata"]["version"], SCHEMA_VERSION);
        assert!(raw["metadata"]["last_updated"].is_string());
    }

    #[test]
    fn first_created_profile_becomes_active_and_projected() {
        let tmp = TestTempDir::new("store-first");
        let store = tmp.profile_store();
        let created = store
            .create(ProfileDraft::new("prod", "sk-aaaaaaaaaa", "https://api.example.com"))
            .unwrap();
        assert!(created.is_active);
        assert_eq!(store.get_active().unwrap(), Some(created));
        assert_eq!(settings_env(&tmp, ENV_API_KEY), "sk-aaaaaaaaaa");
        assert_eq!(settings_env(&tmp, ENV_BASE_URL), "https://api.example.com");
    }

    #[test]
    fn second_profile_is_created_inactive() {
        let tmp = TestTempDir::new("store-second");
        let store = tmp.profile_store();
        store.create(draft("a", "sk-aaaaaaaaaa")).unwrap();
        let b = store.create(draft("b", "sk-bbbbbbbbbb")).unwrap();
        assert!(!b.is_active);
        assert_eq!(settings_env(&tmp, ENV_API_KEY), "sk-aaaaaaaaaa");
        assert_eq!(active_count(&store), 1);
    }

    #[test]
    fn duplicate_name_is_rejected_and_not_persisted() {
        let tmp = TestTempDir::new("store-dup");
        let store = tmp.profile_store();
        store.create(draft("dup", "sk-aaaaaaaaaa")).unwrap();
        let err = store.create(draft("dup", "sk-bbbbbbbbbb")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(ref name) if name == "dup"));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn invalid_draft_leaves_collection_untouched() {
        let tmp = TestTempDir::new("store-invalid");
        let store = tmp.profile_store();
        let err = store
            .create(ProfileDraft::new("x", "short", "https://ok.com"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.list().unwrap().is_empty());
        assert!(!tmp.child(FIXTURE_SETTINGS_FILE).exists());
    }

    #[test]
    fn update_of_active_profile_reprojects() {
        let tmp = TestTempDir::new("store-update-active");
        let store = tmp.profile_store();
        let a = store.create(draft("a", "sk-aaaaaaaaaa")).unwrap();
        let patch = ProfilePatch {
            api_key: Some("sk-rotated-key".into()),
            ..ProfilePatch::default()
        };
        assert!(store.update(&a.id, &patch).unwrap());
        assert_eq!(settings_env(&tmp, ENV_API_KEY), "sk-rotated-key");
        assert_eq!(store.get(&a.id).unwrap().unwrap().api_key, "sk-rotated-key");
    }

    #[test]
    fn update_of_inactive_profile_does_not_touch_settings() {
        let tmp = TestTempDir::new("store-update-inactive");
        let store = tmp.profile_store();
        store.create(draft("a", "sk-aaaaaaaaaa")).unwrap();
        let b = store.create(draft("b", "sk-bbbbbbbbbb")).unwrap();
        let patch = ProfilePatch {
            base_url: Some("http://localhost:9000".into()),
            ..ProfilePatch::default()
        };
        assert!(store.update(&b.id, &patch).unwrap());
        assert_eq!(settings_env(&tmp, ENV_BASE_URL), "https://a.example.com");
        assert_eq!(
            store.get(&b.id).unwrap().unwrap().base_url,
            "http://localhost:9000"
        );
    }

    #[test]
    fn update_and_delete_report_unknown_ids() {
        let tmp = TestTempDir::new("store-unknown");
        let store = tmp.profile_store();
        assert!(!store.update("nope", &ProfilePatch::default()).unwrap());
        assert!(!store.delete("nope").unwrap());
        assert!(store.activate("nope").unwrap().is_none());
    }

    #[test]
    fn deleting_active_promotes_first_remaining() {
        let tmp = TestTempDir::new("store-promote");
        let store = tmp.profile_store();
        let a = store.create(draft("a", "sk-aaaaaaaaaa")).unwrap();
        let b = store.create(draft("b", "sk-bbbbbbbbbb")).unwrap();
        store.create(draft("c", "sk-cccccccccc")).unwrap();

        assert!(store.delete(&a.id).unwrap());
        let active = store.get_active().unwrap().unwrap();
        assert_eq!(active.id, b.id);
        assert_eq!(settings_env(&tmp, ENV_API_KEY), "sk-bbbbbbbbbb");
        assert_eq!(active_count(&store), 1);
    }

    #[test]
    fn deleting_last_profile_leaves_settings_alone() {
        let tmp = TestTempDir::new("store-delete-last");
        let store = tmp.profile_store();
        let a = store.create(draft("a", "sk-aaaaaaaaaa")).unwrap();
        assert!(store.delete(&a.id).unwrap());
        assert!(store.get_active().unwrap().is_none());
        assert_eq!(settings_env(&tmp, ENV_API_KEY), "sk-aaaaaaaaaa");
    }

    #[test]
    fn activate_switches_single_active_profile() {
        let tmp = TestTempDir::new("store-activate");
        let store = tmp.profile_store();
        store.create(draft("a", "sk-aaaaaaaaaa")).unwrap();
        let b = store.create(draft("b", "sk-bbbbbbbbbb")).unwrap();
        let activated = store.activate(&b.id).unwrap().unwrap();
        assert_eq!(activated.id, b.id);
        assert!(activated.is_active);
        assert_eq!(store.get_active().unwrap().unwrap().id, b.id);
        assert_eq!(settings_env(&tmp, ENV_API_KEY), "sk-bbbbbbbbbb");
        assert_eq!(active_count(&store), 1);
    }

    #[test]
    fn failed_projection_aborts_activation() {
        // A settings file whose `env` is not an object cannot be patched.
        let tmp = TestTempDir::new("store-activate-fail");
        let store = tmp.profile_store();
        let a = store.create(draft("a", "sk-aaaaaaaaaa")).unwrap();
        let b = store.create(draft("b", "sk-bbbbbbbbbb")).unwrap();
        let before = std::fs::read(store.data_file()).unwrap();
        tmp.write_text(FIXTURE_SETTINGS_FILE, r#"{"env": "broken"}"#);

        let err = store.activate(&b.id).unwrap_err();
        assert!(matches!(err, StoreError::Projection(_)));
        assert_eq!(std::fs::read(store.data_file()).unwrap(), before);
        assert_eq!(store.get_active().unwrap().unwrap().id, a.id);
    }

    #[test]
    fn failed_projection_aborts_update_of_active() {
        let tmp = TestTempDir::new("store-update-fail");
        let store = tmp.profile_store();
        let a = store.create(draft("a", "sk-aaaaaaaaaa")).unwrap();
        tmp.write_text(FIXTURE_SETTINGS_FILE, "[]");
        let patch = ProfilePatch {
            name: Some("renamed".into()),
            ..ProfilePatch::default()
        };
        assert!(matches!(
            store.update(&a.id, &patch).unwrap_err(),
            StoreError::Projection(_)
        ));
        assert_eq!(store.get(&a.id).unwrap().unwrap().name, "a");
    }

    #[test]
    fn corrupt_collection_reads_empty_but_refuses_writes() {
        let tmp = TestTempDir::new("store-corrupt");
        let store = tmp.profile_store();
        tmp.write_text(FIXTURE_DATA_FILE, "{ truncated");
        assert!(store.list().unwrap().is_empty());

        let err = store.create(draft("a", "sk-aaaaaaaaaa")).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert_eq!(
            std::fs::read_to_string(store.data_file()).unwrap(),
            "{ truncated"
        );
    }

    #[test]
    fn backup_copies_live_file_without_mutating_it() {
        let tmp = TestTempDir::new("store-backup");
        let store = tmp.profile_store();
        store.create(draft("a", "sk-aaaaaaaaaa")).unwrap();
        let live = std::fs::read(store.data_file()).unwrap();

        let backup = store.backup().unwrap();
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("api_configs.bak."), "{name}");
        assert_eq!(std::fs::read(&backup).unwrap(), live);
        assert_eq!(std::fs::read(store.data_file()).unwrap(), live);
    }

    #[test]
    fn status_reports_counts_and_settings_presence() {
        let tmp = TestTempDir::new("store-status");
        let store = tmp.profile_store();
        let empty = store.status().unwrap();
        assert_eq!(empty.api_config_count, 0);
        assert!(!empty.claude_settings_exists);

        let a = store.create(draft("a", "sk-aaaaaaaaaa")).unwrap();
        let status = store.status().unwrap();
        assert_eq!(status.api_config_count, 1);
        assert_eq!(status.active_profile_id.as_deref(), Some(a.id.as_str()));
        assert!(status.claude_settings_exists);
    }

    #[test]
    fn current_pairs_active_profile_with_settings_view() {
        let tmp = TestTempDir::new("store-current");
        let store = tmp.profile_store();
        let a = store.create(draft("a", "sk-aaaaaaaaaa")).unwrap();
        let current = store.current().unwrap();
        assert_eq!(current.active.map(|p| p.id), Some(a.id));
        assert_eq!(current.settings.api_key, "sk-aaaaaaaaaa");
    }

    #[test]
    fn concurrent_creates_keep_single_active_profile() {
        let tmp = TestTempDir::new("store-concurrent");
        let store = std::sync::Arc::new(tmp.profile_store());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .create(draft(&format!("p{i}"), "sk-aaaaaaaaaa"))
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.list().unwrap().len(), 8);
        assert_eq!(active_count(&store), 1);
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Create(u8),
            Update(u8),
            Delete(u8),
            Activate(u8),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u8..6).prop_map(Op::Create),
                (0u8..6).prop_map(Op::Update),
                (0u8..6).prop_map(Op::Delete),
                (0u8..6).prop_map(Op::Activate),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(48))]

            #[test]
            fn at_most_one_profile_is_ever_active(ops in proptest::collection::vec(op_strategy(), 1..24)) {
                let tmp = TestTempDir::new("store-prop");
                let store = tmp.profile_store();
                for op in ops {
                    let ids: Vec<String> = store.list().unwrap().into_iter().map(|p| p.id).collect();
                    let pick = |n: u8| ids.get(n as usize % ids.len().max(1)).cloned().unwrap_or_default();
                    match op {
                        Op::Create(n) => {
                            let _ = store.create(ProfileDraft::new(
                                format!("p{n}"),
                                "sk-aaaaaaaaaa",
                                "https://a.example.com",
                            ));
                        }
                        Op::Update(n) => {
                            let patch = ProfilePatch {
                                api_key: Some(format!("sk-updated-{n}")),
                                ..ProfilePatch::default()
                            };
                            store.update(&pick(n), &patch).unwrap();
                        }
                        Op::Delete(n) => {
                            store.delete(&pick(n)).unwrap();
                        }
                        Op::Activate(n) => {
                            store.activate(&pick(n)).unwrap();
                        }
                    }
                    let profiles = store.list().unwrap();
                    let active = profiles.iter().filter(|p| p.is_active).count();
                    prop_assert!(active <= 1);
                    prop_assert_eq!(active == 0, profiles.is_empty());
                }
            }
        }
    }
}
