//! Scratch-directory fixture shared by the unit test modules.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::projector::SettingsProjector;
use crate::store::ProfileStore;

/// Collection file inside a fixture, relative to its root.
pub const FIXTURE_DATA_FILE: &str = "data/api_configs.json";
/// Settings file inside a fixture, relative to its root.
pub const FIXTURE_SETTINGS_FILE: &str = ".claude/settings.json";

static NEXT_FIXTURE: AtomicU64 = AtomicU64::new(0);

/// Per-test directory under the system temp dir, removed on drop.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    pub fn new(label: &str) -> Self {
        let n = NEXT_FIXTURE.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "ccman-{label}-{}-{n}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_micros()
        ));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write `content` at `relative`, creating parents.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Parse the JSON file at `relative`.
    pub fn read_json(&self, relative: &str) -> Value {
        serde_json::from_slice(&fs::read(self.child(relative)).unwrap()).unwrap()
    }

    /// Store over [`FIXTURE_DATA_FILE`] projecting into [`FIXTURE_SETTINGS_FILE`].
    pub fn profile_store(&self) -> ProfileStore {
        ProfileStore::open(
            self.child(FIXTURE_DATA_FILE),
            SettingsProjector::new(self.child(FIXTURE_SETTINGS_FILE)),
        )
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_paths_stay_under_the_root() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.json", r#"{"a": 1}"#);
        assert!(file.starts_with(fixture.path()));
        assert_eq!(fixture.read_json("nested/file.json")["a"], 1);
    }

    #[test]
    fn fixture_is_removed_on_drop() {
        let path = {
            let fixture = TestTempDir::new("drop");
            fixture.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn profile_store_uses_fixture_files() {
        let fixture = TestTempDir::new("fixture-store");
        let store = fixture.profile_store();
        assert_eq!(store.data_file(), fixture.child(FIXTURE_DATA_FILE));
        assert_eq!(
            store.projector().settings_path(),
            fixture.child(FIXTURE_SETTINGS_FILE)
        );
    }
}
