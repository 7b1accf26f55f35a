use crate::core::events::render_history;
use crate::AppState;

pub fn list(state: &AppState) -> anyhow::Result<()> {
    let session = state.session(None);
    println!("{}", render_history(&session.history()));
    Ok(())
}

pub fn clear(state: &AppState) -> anyhow::Result<()> {
    state.session(None).clear_history();
    Ok(())
}
