use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::video::VideoRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    #[serde(rename = "data")]
    pub record: VideoRecord,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub fetched_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(url: impl Into<String>, record: VideoRecord) -> Self {
        Self {
            url: url.into(),
            record,
            fetched_at: Utc::now(),
        }
    }

    /// `Oct 19, 02:45 PM` style, as shown next to history items.
    pub fn fetched_at_label(&self) -> String {
        self.fetched_at
            .with_timezone(&chrono::Local)
            .format("%b %-d, %I:%M %p")
            .to_string()
    }
}
