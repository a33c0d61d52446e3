use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// Origin-scoped string key-value store, the persistence seam under the
/// favorites collection.
///
/// All operations are synchronous: a store mutation is a read-modify-write
/// sequence that must run to completion without suspending, so the trait
/// deliberately offers no async surface.
pub trait KeyValueStore: Send {
    /// Read the value for a key. Absent keys are `None`, never an error.
    fn get(&self, key: &str) -> Option<String>;

    /// Write the value for a key, replacing any previous value in a single
    /// write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Remove a key. Removing an absent key is a no-op.
    fn remove(&mut self, key: &str) -> Result<(), CoreError>;
}

/// In-memory store. Nothing persists across sessions.
///
/// Used in tests and for ephemeral sessions where durability isn't wanted.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one JSON object (key → value) per file.
///
/// Writes go to a temporary file first and are renamed into place, so the
/// file on disk is always a complete JSON document. A missing or corrupt
/// file loads as an empty map.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Create or load a file store. Creates parent directories if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = Self::load(&path);
        Ok(Self { path, entries })
    }

    fn load(path: &Path) -> HashMap<String, String> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "store file is corrupt, starting empty"
                );
                HashMap::new()
            }
        }
    }

    /// Write the whole map atomically (write-then-rename).
    fn flush(&self) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;

        let mut tmp = self.path.clone();
        tmp.set_extension("tmp");
        fs::write(&tmp, json.as_bytes())?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
