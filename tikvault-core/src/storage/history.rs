use std::sync::Arc;

use crate::models::history::HistoryEntry;
use crate::models::video::VideoRecord;
use crate::storage::kv::KeyValueStore;

pub const HISTORY_KEY: &str = "tikvault-history";
pub const HISTORY_LIMIT: usize = 5;

/// Most-recent-first list of the last few lookups. Every operation is
/// best-effort: storage problems are logged and never returned.
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn record(&self, url: &str, record: &VideoRecord) {
        let mut entries = self.list();
        entries.retain(|e| e.url != url);
        entries.insert(0, HistoryEntry::new(url, record.clone()));
        entries.truncate(HISTORY_LIMIT);

        let serialized = match serde_json::to_string(&entries) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("history: could not serialize entries: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(HISTORY_KEY, &serialized) {
            tracing::warn!("history: could not save {}: {}", url, e);
        }
    }

    pub fn list(&self) -> Vec<HistoryEntry> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("history: could not load: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(HISTORY_LIMIT);
                entries
            }
            Err(e) => {
                tracing::warn!("history: stored data is corrupt, ignoring: {}", e);
                Vec::new()
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            tracing::warn!("history: could not clear: {}", e);
        }
    }
}
