pub mod config;
pub mod history;
pub mod kv;

use std::sync::Arc;

use crate::fs_paths;
use kv::{JsonFileStore, KeyValueStore, MemoryStore};

pub const STORE_FILE: &str = "store.json";

/// File-backed store in the app data dir, or an in-memory one when no data
/// dir can be resolved.
pub fn open_default_store() -> Arc<dyn KeyValueStore> {
    match fs_paths::app_data_dir() {
        Some(dir) => Arc::new(JsonFileStore::new(dir.join(STORE_FILE))),
        None => {
            tracing::warn!("no data directory available, history and settings will not persist");
            Arc::new(MemoryStore::default())
        }
    }
}
