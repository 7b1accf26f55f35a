use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadProgress {
    pub bytes_loaded: u64,
    pub total_bytes: Option<u64>,
    pub percent: f64,
    pub status: String,
}

impl DownloadProgress {
    pub fn started(status: impl Into<String>) -> Self {
        Self {
            bytes_loaded: 0,
            total_bytes: None,
            percent: 0.0,
            status: status.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.percent >= 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadResult {
    pub file_path: PathBuf,
    pub file_size_bytes: u64,
}
