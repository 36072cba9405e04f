//! Read-only key-value stores.
//!
//! # Data Flow
//! ```text
//! Host header → hostname
//!     → Host Record store   (hostname → hApp ID)
//!     → Node List store     (hApp ID → JSON list of node hostnames)
//! ```
//!
//! # Design Decisions
//! - Values are strings, as in a managed KV store; typed reads go through `get_json`
//! - The resolver only reads; writes (`MemoryStore::put`, file reloads) belong
//!   to whoever hosts the stores
//! - Stores are injected into the resolver, never looked up globally

pub mod file;
pub mod memory;
pub mod watcher;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use watcher::StoreWatcher;

/// Errors raised while reading a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A stored value could not be decoded into the requested type.
    #[error("Value for key '{key}' is not valid JSON: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backing file could not be read.
    #[error("Failed to read store file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON object.
    #[error("Store file '{path}' is not a JSON object: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A read-only key-value lookup.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Fetch a value and decode it from JSON.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}
