use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::direct_downloader::{downloading_status, StreamingDownloader};
use crate::core::events::{Notice, ViewEvents};
use crate::core::file_sink::FileSink;
use crate::core::http_client::HttpTransport;
use crate::core::lookup::MetadataFetcher;
use crate::core::url_parser;
use crate::error::{Error, Result};
use crate::models::history::HistoryEntry;
use crate::models::progress::{DownloadProgress, DownloadResult};
use crate::models::settings::LookupSettings;
use crate::models::video::{MediaFormat, VideoRecord};
use crate::storage::history::HistoryStore;
use crate::storage::kv::KeyValueStore;

const PROGRESS_BUFFER: usize = 32;

/// What the main view is showing. Preview and error are separate variants,
/// so they can never be on screen together.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading { url: String },
    Preview { url: String, record: VideoRecord },
    Error { message: String },
}

impl ViewState {
    pub fn current_record(&self) -> Option<&VideoRecord> {
        match self {
            ViewState::Preview { record, .. } => Some(record),
            _ => None,
        }
    }
}

pub struct Session<E: ViewEvents> {
    fetcher: MetadataFetcher,
    downloader: StreamingDownloader,
    history: HistoryStore,
    events: E,
    state: ViewState,
}

impl<E: ViewEvents> Session<E> {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn FileSink>,
        lookup: &LookupSettings,
        events: E,
    ) -> Self {
        Self {
            fetcher: MetadataFetcher::new(transport.clone(), lookup),
            downloader: StreamingDownloader::new(transport, sink),
            history: HistoryStore::new(store),
            events,
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    fn transition(&mut self, state: ViewState) {
        self.state = state;
        self.events.render(&self.state);
    }

    pub async fn check_url(&mut self, input: &str) -> Result<VideoRecord> {
        let url = input.trim();
        if url.is_empty() {
            self.events.notify(&Notice::error("Please enter a TikTok URL"));
            return Err(Error::InvalidUrl);
        }
        if let Err(e) = url_parser::validate_url(url) {
            self.events.notify(&Notice::error(e.to_string()));
            return Err(e);
        }

        self.transition(ViewState::Loading {
            url: url.to_string(),
        });

        match self.fetcher.fetch(url).await {
            Ok(record) => {
                self.history.record(url, &record);
                self.transition(ViewState::Preview {
                    url: url.to_string(),
                    record: record.clone(),
                });
                self.events.notify(&Notice::success("Video loaded successfully!"));
                Ok(record)
            }
            Err(e) => {
                tracing::warn!("lookup failed for {}: {}", url, e);
                self.transition(ViewState::Error {
                    message: e.to_string(),
                });
                self.events
                    .notify(&Notice::error(format!("Failed to load video: {}", e)));
                Err(e)
            }
        }
    }

    /// Downloads the previewed video in `format`. Progress is forwarded to
    /// [`ViewEvents::progress`] while the transfer runs.
    pub async fn download(
        &self,
        format: MediaFormat,
        cancel: Option<&CancellationToken>,
    ) -> Result<DownloadResult> {
        let Some(record) = self.state.current_record() else {
            let err = Error::NoCurrentVideo;
            self.events.notify(&Notice::error(err.to_string()));
            return Err(err);
        };

        self.events
            .progress(&DownloadProgress::started(downloading_status(format.label())));

        let (tx, mut rx) = mpsc::channel(PROGRESS_BUFFER);
        let forward = async {
            while let Some(p) = rx.recv().await {
                self.events.progress(&p);
            }
        };
        let (result, ()) = tokio::join!(
            self.downloader.download_media(record, format, tx, cancel),
            forward
        );

        match &result {
            Ok(_) => self.events.notify(&Notice::success(format!(
                "{} Downloaded Successfully!",
                format.label()
            ))),
            Err(e) => {
                tracing::warn!("download failed: {}", e);
                self.events
                    .notify(&Notice::error(format!("Download Failed: {}", e)));
            }
        }

        result
    }

    pub fn new_video(&mut self) {
        self.transition(ViewState::Idle);
        self.events.notify(&Notice::success("Ready for new video URL!"));
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.list()
    }

    pub fn clear_history(&self) {
        self.history.clear();
        self.events
            .notify(&Notice::success("History cleared successfully"));
    }
}
