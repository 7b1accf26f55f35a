use anyhow::anyhow;

use crate::AppState;

/// Looks up `url` and prints its preview. The session has already shown the
/// reason on failure, so the returned error only names the step.
pub async fn check(state: &AppState, url: &str) -> anyhow::Result<()> {
    let mut session = state.session(None);
    session
        .check_url(url)
        .await
        .map(|_| ())
        .map_err(|_| anyhow!("lookup failed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tikvault_core::storage::history::HISTORY_KEY;
    use tikvault_core::storage::kv::{KeyValueStore, MemoryStore};

    #[tokio::test]
    async fn failed_check_does_not_repeat_the_reason() {
        let state = AppState::with_store(Arc::new(MemoryStore::default()));
        let err = check(&state, "https://example.com/video/1").await.unwrap_err();

        assert_eq!(err.to_string(), "lookup failed");
        assert!(state.store.get(HISTORY_KEY).unwrap().is_none());
    }
}
