use thiserror::Error;

use crate::models::video::MediaFormat;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Please enter a valid TikTok URL")]
    InvalidUrl,

    #[error("{0}")]
    LookupFailed(String),

    #[error("{} download URL not available", .0.map(|f| f.label()).unwrap_or("Media"))]
    ResourceUnavailable(Option<MediaFormat>),

    #[error("{0}")]
    TransferFailed(TransferFailure),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Could not save file: {0}")]
    SaveFailed(String),

    #[error("Please check a TikTok URL first")]
    NoCurrentVideo,

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferFailure {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("{0}")]
    Interrupted(String),

    #[error("Download cancelled")]
    Cancelled,
}

impl Error {
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Error::TransferFailed(TransferFailure::Interrupted(reason.into()))
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        Error::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::storage(err)
    }
}
