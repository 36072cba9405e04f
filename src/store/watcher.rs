//! Store file watcher for hot reload.

use std::sync::Arc;
use std::time::Duration;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use crate::store::FileStore;

/// Watches a `FileStore`'s backing file and reloads it on change.
pub struct StoreWatcher {
    store: Arc<FileStore>,
}

impl StoreWatcher {
    pub fn new(store: Arc<FileStore>) -> Self {
        Self { store }
    }

    /// Start watching the file in a background thread.
    ///
    /// Watching stops when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let store = self.store.clone();

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        match store.reload() {
                            Ok(entries) => {
                                tracing::info!(path = %store.path().display(), entries, "Store file reloaded");
                            }
                            Err(e) => {
                                tracing::error!("Failed to reload store: {}. Keeping current contents.", e);
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }, Config::default().with_poll_interval(Duration::from_secs(2)))?;

        watcher.watch(self.store.path(), RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.store.path().display(), "Store watcher started");
        Ok(watcher)
    }
}
