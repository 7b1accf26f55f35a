use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Normalized result of a successful lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoRecord {
    pub title: String,
    pub author: String,
    pub description: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub video_url: Option<String>,
    #[serde(rename = "music_url")]
    pub audio_url: Option<String>,
    #[serde(rename = "likes")]
    pub like_count: u64,
    #[serde(rename = "shares")]
    pub share_count: u64,
    #[serde(rename = "comments")]
    pub comment_count: u64,
    #[serde(rename = "views")]
    pub view_count: u64,
}

impl VideoRecord {
    pub fn source_for(&self, format: MediaFormat) -> Option<&str> {
        let url = match format {
            MediaFormat::Mp4 => self.video_url.as_deref(),
            MediaFormat::Mp3 => self.audio_url.as_deref(),
        };
        url.filter(|u| !u.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Mp4,
    Mp3,
}

impl MediaFormat {
    pub fn extension(self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "mp4",
            MediaFormat::Mp3 => "mp3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "MP4",
            MediaFormat::Mp3 => "MP3",
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MediaFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" | "video" => Ok(MediaFormat::Mp4),
            "mp3" | "audio" | "music" => Ok(MediaFormat::Mp3),
            other => Err(format!("unknown format '{}'", other)),
        }
    }
}

/// Compact engagement count: `1500000` -> `1.5M`, `2300` -> `2.3K`.
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
