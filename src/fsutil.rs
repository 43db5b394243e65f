//! Small filesystem helpers shared by the store, the projector and config init.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

/// Staging path used while atomically replacing `path` (`<stem>.tmp`).
///
/// A target that already ends in `.tmp` stages to `<file_name>.tmp` so the
/// staging file never aliases the live one.
pub fn staging_path(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "tmp") {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        return path.with_file_name(name);
    }
    path.with_extension("tmp")
}

/// Write `bytes` to a sibling temp file, fsync it, then rename it over `path`.
///
/// Readers observe either the old or the new content, never a partial write,
/// and the rename is flushed to the parent directory before returning.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };
    let tmp_path = staging_path(path);
    // A staging file left by an interrupted write is stale.
    match std::fs::remove_file(&tmp_path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err),
        _ => {}
    }

    let staged = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&tmp_path)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        });
    if let Err(err) = staged {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err);
    }

    if let Err(err) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err);
    }
    sync_directory(parent)
}

#[cfg(unix)]
fn sync_directory(path: &Path) -> io::Result<()> {
    std::fs::File::open(path)?.sync_all()
}

#[cfg(not(unix))]
fn sync_directory(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Like [`write_atomic`], but skips the write when content is unchanged.
///
/// Returns `true` when the file was written.
pub fn write_atomic_if_changed(path: &Path, bytes: &[u8]) -> io::Result<bool> {
    if let Ok(existing) = std::fs::read(path) {
        if existing == bytes {
            return Ok(false);
        }
    }
    write_atomic(path, bytes)?;
    Ok(true)
}

/// Read a file, mapping "not found" to `None`.
pub fn read_optional(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Build a non-colliding `<stem>.bak.<unix-seconds>` path next to `path`.
pub fn timestamped_backup_path(path: &Path) -> PathBuf {
    let timestamp = Utc::now().timestamp();
    for suffix in 0..1000usize {
        let extension = if suffix == 0 {
            format!("bak.{timestamp}")
        } else {
            format!("bak.{timestamp}.{suffix}")
        };
        let candidate = path.with_extension(extension);
        if !candidate.exists() {
            return candidate;
        }
    }
    path.with_extension(format!("bak.{timestamp}.{}", std::process::id()))
}

/// Pretty JSON (two-space indent) with a trailing newline.
pub fn json_to_bytes<T: serde::Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = serde_json::to_vec_pretty(value)?;
    out.push(b'\n');
    Ok(out)
}
