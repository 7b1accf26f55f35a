use std::io::Write;
use std::sync::Mutex;

use tikvault_core::core::events::{Notice, NoticeLevel, ViewEvents};
use tikvault_core::models::history::HistoryEntry;
use tikvault_core::models::progress::DownloadProgress;
use tikvault_core::models::video::{format_count, VideoRecord};
use tikvault_core::session::ViewState;

const BAR_WIDTH: usize = 30;

/// Renders session events to the terminal: the preview on stdout, status
/// and progress on stderr.
pub struct TerminalEmitter {
    console: Mutex<Console>,
}

struct Console {
    out: Box<dyn Write + Send>,
    // Percent shown by a bar that has not been ended with a newline yet.
    open_bar: Option<u32>,
}

impl Console {
    fn close_bar(&mut self) {
        if self.open_bar.take().is_some() {
            let _ = writeln!(self.out);
        }
    }

    fn line(&mut self, text: &str) {
        self.close_bar();
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }
}

impl Default for TerminalEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalEmitter {
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            console: Mutex::new(Console {
                out,
                open_bar: None,
            }),
        }
    }

    fn with_console(&self, f: impl FnOnce(&mut Console)) {
        if let Ok(mut console) = self.console.lock() {
            f(&mut console);
        }
    }
}

impl ViewEvents for TerminalEmitter {
    fn render(&self, state: &ViewState) {
        match state {
            ViewState::Idle => self.with_console(Console::close_bar),
            ViewState::Loading { url } => {
                self.with_console(|c| c.line(&format!("Checking {} ...", url)))
            }
            ViewState::Preview { record, .. } => {
                self.with_console(Console::close_bar);
                println!("{}", render_preview(record));
            }
            // The error notice that follows carries the message.
            ViewState::Error { .. } => self.with_console(Console::close_bar),
        }
    }

    fn notify(&self, notice: &Notice) {
        let text = match notice.level {
            NoticeLevel::Success => format!("[ok] {}", notice.message),
            NoticeLevel::Error => format!("[error] {}", notice.message),
        };
        self.with_console(|c| c.line(&text));
    }

    fn progress(&self, progress: &DownloadProgress) {
        let rounded = progress.percent.round() as u32;
        self.with_console(|c| {
            if progress.percent > 0.0 && c.open_bar == Some(rounded) && !progress.is_complete() {
                return;
            }
            let _ = write!(c.out, "\r{}", render_progress_line(progress));
            if progress.is_complete() {
                let _ = writeln!(c.out);
                c.open_bar = None;
            } else {
                c.open_bar = Some(rounded);
            }
            let _ = c.out.flush();
        });
    }
}

pub fn render_progress_line(progress: &DownloadProgress) -> String {
    let percent = progress.percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "{:<20} [{}{}] {:>3}%",
        progress.status,
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent.round() as u32
    )
}

pub fn render_preview(record: &VideoRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", record.title));
    out.push_str(&format!("@{}\n", record.author));
    if !record.description.is_empty() && record.description != record.title {
        out.push_str(&format!("{}\n", record.description));
    }
    out.push_str(&format!(
        "likes {}  shares {}  comments {}  views {}\n",
        format_count(record.like_count),
        format_count(record.share_count),
        format_count(record.comment_count),
        format_count(record.view_count)
    ));
    if !record.thumbnail_url.is_empty() {
        out.push_str(&format!("thumbnail: {}\n", record.thumbnail_url));
    }
    let available = |url: &Option<String>| {
        if url.as_deref().is_some_and(|u| !u.trim().is_empty()) {
            "available"
        } else {
            "not available"
        }
    };
    out.push_str(&format!("video (mp4): {}\n", available(&record.video_url)));
    out.push_str(&format!("audio (mp3): {}", available(&record.audio_url)));
    out
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No History Yet\nURLs you check will appear here for quick access.".to_string();
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "#{} {}\n   @{} | {}\n   {}",
                i + 1,
                entry.record.title,
                entry.record.author,
                entry.fetched_at_label(),
                entry.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
