use crate::error::{Error, Result};
use crate::models::settings::AppSettings;
use crate::storage::kv::KeyValueStore;

const STORE_KEY: &str = "app_settings";

pub fn load_settings(store: &dyn KeyValueStore) -> AppSettings {
    match store.get(STORE_KEY) {
        Ok(Some(raw)) => serde_json::from_str::<AppSettings>(&raw).unwrap_or_else(|e| {
            tracing::warn!("settings: stored value unreadable, using defaults: {}", e);
            AppSettings::default()
        }),
        Ok(None) => AppSettings::default(),
        Err(e) => {
            tracing::warn!("settings: could not load, using defaults: {}", e);
            AppSettings::default()
        }
    }
}

pub fn save_settings(store: &dyn KeyValueStore, settings: &AppSettings) -> Result<()> {
    let val = serde_json::to_string(settings)?;
    store.set(STORE_KEY, &val)
}

/// Deep-merges a JSON patch into the current settings and persists the result.
pub fn update_settings(store: &dyn KeyValueStore, partial: &str) -> Result<AppSettings> {
    let current = load_settings(store);

    let patch: serde_json::Value = serde_json::from_str(partial)
        .map_err(|e| Error::InvalidSettings(format!("Invalid JSON: {}", e)))?;
    if !patch.is_object() {
        return Err(Error::InvalidSettings("patch must be a JSON object".into()));
    }

    let mut current_val = serde_json::to_value(&current)?;
    merge_json(&mut current_val, &patch);
    let updated: AppSettings = serde_json::from_value(current_val)
        .map_err(|e| Error::InvalidSettings(e.to_string()))?;

    save_settings(store, &updated)?;
    Ok(updated)
}

pub fn reset_settings(store: &dyn KeyValueStore) -> Result<AppSettings> {
    let defaults = AppSettings::default();
    save_settings(store, &defaults)?;
    Ok(defaults)
}

fn merge_json(base: &mut serde_json::Value, patch: &serde_json::Value) {
    if let (Some(base_obj), Some(patch_obj)) = (base.as_object_mut(), patch.as_object()) {
        for (key, value) in patch_obj {
            if value.is_object() && base_obj.get(key).is_some_and(|v| v.is_object()) {
                if let Some(existing) = base_obj.get_mut(key) {
                    merge_json(existing, value);
                }
            } else {
                base_obj.insert(key.clone(), value.clone());
            }
        }
    }
}
