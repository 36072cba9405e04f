//! File-backed store with atomic reload.
//!
//! The file is a single JSON object. String values are stored as-is; any
//! other value (typically a node list array) is stored as its JSON text, so
//! `get_json` decodes it the same way it would from a managed KV store.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use serde_json::{Map, Value};
use crate::store::{KvStore, StoreError};

/// A key-value store loaded from a JSON file.
///
/// Readers never block: the map is swapped as a whole on reload.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: ArcSwap<HashMap<String, String>>,
}

impl FileStore {
    /// Load the store from `path`. Fails if the file is missing or malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = read_entries(&path)?;
        tracing::info!(path = %path.display(), entries = entries.len(), "Loaded store file");

        Ok(Self {
            path,
            entries: ArcSwap::from_pointee(entries),
        })
    }

    /// Re-read the file and swap in its contents.
    ///
    /// On failure the current contents stay in place.
    pub fn reload(&self) -> Result<usize, StoreError> {
        let entries = read_entries(&self.path)?;
        let count = entries.len();
        self.entries.store(Arc::new(entries));
        Ok(count)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.load().get(key).cloned())
    }
}

fn read_entries(path: &Path) -> Result<HashMap<String, String>, StoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let object: Map<String, Value> =
        serde_json::from_str(&content).map_err(|source| StoreError::Format {
            path: path.display().to_string(),
            source,
        })?;

    Ok(object
        .into_iter()
        .map(|(key, value)| {
            let raw = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, raw)
        })
        .collect())
}
