//! Local persisted key space: a single JSON file of key → value.
//!
//! Holds the settings record and the per-interview AI provenance sets. Every
//! mutation is written through to disk before the call returns.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct LocalStore {
    path: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl LocalStore {
    /// Opens the store at `path`, starting empty when the file does not exist.
    /// A corrupt file is logged and replaced on the next write.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let entries: BTreeMap<String, Value> = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Local store {} is corrupt, starting empty: {e}", path.display());
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };
        info!("Local store opened at {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path: Some(path.to_path_buf()),
            entries: Mutex::new(entries),
        })
    }

    /// A store that never touches disk.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.update(key, |_| Some(value))
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(key, |_| None)
    }

    /// Read-modify-write of one key under the store lock. Returning `None`
    /// deletes the key. The in-memory map only changes once the write lands.
    pub fn update<F>(&self, key: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(Option<&Value>) -> Option<Value>,
    {
        let mut entries = self.lock();
        let mut next = entries.clone();
        match f(entries.get(key)) {
            Some(value) => {
                next.insert(key.to_string(), value);
            }
            None => {
                next.remove(key);
            }
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}
