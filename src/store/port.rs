/// Key-value persistence port.
///
/// The game only ever needs "load a blob by key" and "save a blob by key".
/// `FileStore` keeps one file per key in a data directory; `MemoryStore`
/// backs the tests.

use std::path::{Path, PathBuf};

use super::error::StoreError;

pub trait KvStore {
    /// Missing or unreadable entries are `None`.
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;
}

// ══════════════════════════════════════════════════════════════
// File-backed store
// ══════════════════════════════════════════════════════════════

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.dat")))
    }
}

impl KvStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        let path = self.path_for(key).ok()?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("could not read {}: {e}", path.display());
                None
            }
        }
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let io_err = |source| StoreError::Io { key: key.to_string(), source };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        // Write-then-rename so a crash never leaves a half-written log.
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, blob).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)
    }
}

/// Pick a writable data directory.
///
///   1. Executable directory (portable installs)
///   2. `$HOME/.local/share/neon-snake`
///   3. Current directory
pub fn default_data_dir() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            let probe = parent.join(".write_test_neon_snake");
            if std::fs::write(&probe, "").is_ok() {
                let _ = std::fs::remove_file(&probe);
                return parent.to_path_buf();
            }
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/neon-snake");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// ══════════════════════════════════════════════════════════════
// In-memory store
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
    /// When set, every save fails (simulates a full disk / quota).
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

#[cfg(test)]
impl KvStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::other("quota exceeded"),
            });
        }
        self.entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("neon-snake-test-{}-{tag}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn file_store_round_trips_and_reports_missing() {
        let dir = scratch_dir("roundtrip");
        let mut store = FileStore::new(&dir);
        assert_eq!(store.load("snake-high-score"), None);
        store.save("snake-high-score", "120").unwrap();
        assert_eq!(store.load("snake-high-score").as_deref(), Some("120"));
        store.save("snake-high-score", "130").unwrap();
        assert_eq!(store.load("snake-high-score").as_deref(), Some("130"));
        assert!(dir.join("snake-high-score.dat").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let mut store = FileStore::new(scratch_dir("keys"));
        assert!(matches!(store.save("../escape", "x"), Err(StoreError::InvalidKey(_))));
        assert_eq!(store.load("a/b"), None);
    }

    #[test]
    fn memory_store_can_fail_writes() {
        let mut store = MemoryStore::new();
        store.save("k", "v").unwrap();
        store.fail_writes = true;
        assert!(store.save("k", "w").is_err());
        assert_eq!(store.load("k").as_deref(), Some("v"));
    }
}
