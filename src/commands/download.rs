use std::path::PathBuf;

use anyhow::anyhow;
use tikvault_core::models::video::MediaFormat;

use super::interrupt::{self, Interrupts};
use crate::AppState;

pub async fn download_from_url(
    state: &AppState,
    url: &str,
    format: MediaFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut session = state.session(output);
    let interrupts = Interrupts::default();
    let listener = interrupt::listen_for_ctrl_c(interrupts.clone());

    let cancel = interrupts.begin();
    let checked = tokio::select! {
        result = session.check_url(url) => result.is_ok(),
        _ = cancel.cancelled() => false,
    };
    interrupts.finish();
    if !checked {
        listener.abort();
        return Err(anyhow!("lookup failed"));
    }

    let cancel = interrupts.begin();
    let result = session.download(format, Some(&cancel)).await;
    interrupts.finish();
    listener.abort();

    // The session has already reported the reason.
    let saved = result.map_err(|_| anyhow!("download failed"))?;
    println!(
        "Saved {} ({} bytes)",
        saved.file_path.display(),
        saved.file_size_bytes
    );
    Ok(())
}
