use anyhow::Context;
use tikvault_core::models::settings::AppSettings;
use tikvault_core::storage::config;

use crate::AppState;

pub fn get_settings(state: &AppState) -> anyhow::Result<()> {
    print_settings(&config::load_settings(state.store.as_ref()))
}

pub fn update_settings(state: &AppState, partial: &str) -> anyhow::Result<()> {
    let updated = config::update_settings(state.store.as_ref(), partial)
        .context("could not update settings")?;
    print_settings(&updated)
}

pub fn reset_settings(state: &AppState) -> anyhow::Result<()> {
    let defaults = config::reset_settings(state.store.as_ref())
        .context("could not reset settings")?;
    print_settings(&defaults)
}

fn print_settings(settings: &AppSettings) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}
