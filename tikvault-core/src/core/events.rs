use crate::models::progress::DownloadProgress;
use crate::session::ViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Short-lived message shown alongside the main view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Presentation side of a [`crate::session::Session`].
pub trait ViewEvents: Send + Sync {
    fn render(&self, state: &ViewState);
    fn notify(&self, notice: &Notice);
    fn progress(&self, progress: &DownloadProgress);
}
