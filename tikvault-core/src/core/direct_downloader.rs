use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::file_sink::FileSink;
use crate::core::filename;
use crate::core::http_client::HttpTransport;
use crate::error::{Error, Result, TransferFailure};
use crate::models::progress::{DownloadProgress, DownloadResult};
use crate::models::video::{MediaFormat, VideoRecord};

const CHUNK_TIMEOUT: Duration = Duration::from_secs(45);

/// Bytes that count as "50%" when the server sends no length.
const ESTIMATE_REFERENCE_BYTES: f64 = 1_000_000.0;
/// Estimated progress never passes this until the body is exhausted.
const ESTIMATE_CAP: f64 = 90.0;

pub const COMPLETE_STATUS: &str = "Download Complete!";

pub fn downloading_status(label: &str) -> String {
    format!("Downloading {}...", label)
}

/// Percent for `loaded` bytes. A known length gives a real ratio capped at
/// 100; an unknown (or zero) length gives an estimate capped at 90.
pub fn progress_percent(loaded: u64, total: Option<u64>) -> f64 {
    match total {
        Some(total) if total > 0 => (loaded as f64 * 100.0 / total as f64).min(100.0),
        _ => (loaded as f64 * 50.0 / ESTIMATE_REFERENCE_BYTES).min(ESTIMATE_CAP),
    }
}

/// Streams one media resource into memory and hands it to a [`FileSink`]
/// once the body is complete. Nothing is written if the transfer fails.
pub struct StreamingDownloader {
    transport: Arc<dyn HttpTransport>,
    sink: Arc<dyn FileSink>,
}

impl StreamingDownloader {
    pub fn new(transport: Arc<dyn HttpTransport>, sink: Arc<dyn FileSink>) -> Self {
        Self { transport, sink }
    }

    pub async fn download_media(
        &self,
        record: &VideoRecord,
        format: MediaFormat,
        progress_tx: mpsc::Sender<DownloadProgress>,
        cancel: Option<&CancellationToken>,
    ) -> Result<DownloadResult> {
        let filename = filename::media_filename(&record.title, format);
        self.download(
            record.source_for(format),
            &filename,
            format.label(),
            progress_tx,
            cancel,
        )
        .await
        .map_err(|e| match e {
            Error::ResourceUnavailable(None) => Error::ResourceUnavailable(Some(format)),
            other => other,
        })
    }

    pub async fn download(
        &self,
        resource_url: Option<&str>,
        filename: &str,
        label: &str,
        progress_tx: mpsc::Sender<DownloadProgress>,
        cancel: Option<&CancellationToken>,
    ) -> Result<DownloadResult> {
        let url = resource_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(Error::ResourceUnavailable(None))?;

        if cancel.is_some_and(|t| t.is_cancelled()) {
            return Err(Error::TransferFailed(TransferFailure::Cancelled));
        }

        tracing::debug!("[download] GET {} -> {}", url, filename);

        let response = self
            .transport
            .get_stream(url)
            .await
            .map_err(|e| Error::interrupted(e.to_string()))?;

        if !response.is_success() {
            tracing::warn!("[download] HTTP {} for {}", response.status, url);
            return Err(Error::TransferFailed(TransferFailure::Status(response.status)));
        }

        if response
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("text/html"))
        {
            return Err(Error::interrupted(
                "Server returned HTML instead of media, the link may have expired",
            ));
        }

        let total = response.content_length.filter(|t| *t > 0);
        let status = downloading_status(label);
        let mut chunks: Vec<Bytes> = Vec::new();
        let mut loaded: u64 = 0;
        let mut stream = response.body;

        loop {
            let next = match cancel {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!("[download] cancelled after {} bytes", loaded);
                        return Err(Error::TransferFailed(TransferFailure::Cancelled));
                    }
                    next = tokio::time::timeout(CHUNK_TIMEOUT, stream.next()) => next,
                },
                None => tokio::time::timeout(CHUNK_TIMEOUT, stream.next()).await,
            };

            match next {
                Ok(Some(Ok(chunk))) => {
                    loaded += chunk.len() as u64;
                    chunks.push(chunk);

                    let _ = progress_tx
                        .send(DownloadProgress {
                            bytes_loaded: loaded,
                            total_bytes: total,
                            percent: progress_percent(loaded, total),
                            status: status.clone(),
                        })
                        .await;
                }
                Ok(Some(Err(e))) => {
                    return Err(Error::interrupted(format!("Download stream error: {}", e)));
                }
                Ok(None) => break,
                Err(_) => {
                    return Err(Error::interrupted(format!(
                        "Download timeout: no data received for {} seconds",
                        CHUNK_TIMEOUT.as_secs()
                    )));
                }
            }
        }

        let mut payload = Vec::with_capacity(loaded as usize);
        for chunk in &chunks {
            payload.extend_from_slice(chunk);
        }
        drop(chunks);

        let file_path = self
            .sink
            .save(filename, payload)
            .await
            .map_err(|e| Error::SaveFailed(e.to_string()))?;

        let _ = progress_tx
            .send(DownloadProgress {
                bytes_loaded: loaded,
                total_bytes: total,
                percent: 100.0,
                status: COMPLETE_STATUS.to_string(),
            })
            .await;

        tracing::info!("[download] saved {} ({} bytes)", file_path.display(), loaded);

        Ok(DownloadResult {
            file_path,
            file_size_bytes: loaded,
        })
    }
}
