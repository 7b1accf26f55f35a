use std::io::Write;
use std::path::PathBuf;

use tikvault_core::core::events::ViewEvents;
use tikvault_core::models::video::MediaFormat;
use tikvault_core::session::Session;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use super::interrupt::{self, Interrupts};
use crate::core::events::render_history;
use crate::AppState;

const HELP: &str = "\
  <url>           look up a TikTok URL (same as `check <url>`)
  mp4 | mp3       download the current video or its audio
  new             forget the current video
  history         show the last lookups
  clear           clear the history
  help            show this help
  quit            leave (also Ctrl-D, or Ctrl-C at an idle prompt)
  Ctrl-C          cancel a running lookup or download";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Check(String),
    Download(MediaFormat),
    NewVideo,
    History,
    ClearHistory,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_line(line: &str) -> Action {
    let line = line.trim();
    if line.is_empty() {
        return Action::Empty;
    }

    let mut parts = line.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default().to_ascii_lowercase();
    let rest = parts.next().map(str::trim).unwrap_or("");

    match command.as_str() {
        "quit" | "exit" | "q" => Action::Quit,
        "help" | "?" => Action::Help,
        "new" => Action::NewVideo,
        "history" => Action::History,
        "clear" => Action::ClearHistory,
        "check" => Action::Check(rest.to_string()),
        "mp4" => Action::Download(MediaFormat::Mp4),
        "mp3" => Action::Download(MediaFormat::Mp3),
        "download" | "dl" if rest.is_empty() => Action::Download(MediaFormat::Mp4),
        "download" | "dl" => match rest.parse::<MediaFormat>() {
            Ok(format) => Action::Download(format),
            Err(_) => Action::Unknown(line.to_string()),
        },
        _ if line.contains("://") => Action::Check(line.to_string()),
        _ => Action::Unknown(line.to_string()),
    }
}

fn prompt() {
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "> ");
    let _ = out.flush();
}

pub async fn run(state: &AppState, output: Option<PathBuf>) -> anyhow::Result<()> {
    eprintln!(
        "Paste a TikTok URL, or type `help`. Files are saved to {}",
        state.output_dir(output.clone()).display()
    );

    let interrupts = Interrupts::default();
    let listener = interrupt::listen_for_ctrl_c(interrupts.clone());
    let lines = BufReader::new(tokio::io::stdin()).lines();

    let result = prompt_loop(state.session(output), lines, &interrupts).await;
    listener.abort();
    result
}

/// Reads commands until `quit`, end of input, or Ctrl-C at an idle prompt.
pub async fn prompt_loop<E, R>(
    mut session: Session<E>,
    mut lines: Lines<R>,
    interrupts: &Interrupts,
) -> anyhow::Result<()>
where
    E: ViewEvents,
    R: AsyncBufRead + Unpin,
{
    loop {
        prompt();
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = interrupts.idle_interrupted() => {
                eprintln!();
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        match parse_line(&line) {
            Action::Check(url) => {
                let cancel = interrupts.begin();
                tokio::select! {
                    _ = session.check_url(&url) => {}
                    _ = cancel.cancelled() => eprintln!("Lookup cancelled."),
                }
                interrupts.finish();
            }
            Action::Download(format) => {
                let cancel = interrupts.begin();
                if let Ok(saved) = session.download(format, Some(&cancel)).await {
                    println!("Saved {}", saved.file_path.display());
                }
                interrupts.finish();
            }
            Action::NewVideo => session.new_video(),
            Action::History => println!("{}", render_history(&session.history())),
            Action::ClearHistory => session.clear_history(),
            Action::Help => println!("{}", HELP),
            Action::Quit => break,
            Action::Empty => {}
            Action::Unknown(input) => eprintln!("Unknown command '{}'. Type `help`.", input),
        }
    }

    Ok(())
}
