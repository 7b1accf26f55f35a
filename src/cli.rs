use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tikvault_core::models::video::MediaFormat;

#[derive(Parser, Debug)]
#[command(name = "tikvault", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up a TikTok URL and show its details
    Check { url: String },

    /// Look up a TikTok URL and save its video or audio
    Download {
        url: String,
        /// mp4 (video) or mp3 (audio)
        #[arg(short, long, default_value = "mp4")]
        format: MediaFormat,
        /// Directory to save into (defaults to the configured download dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the most recent lookups
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Read or change persisted settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Prompt for URLs and downloads until `quit`
    Interactive {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// Remove every history entry
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    Get,
    /// Deep-merge a JSON object into the settings, e.g. '{"lookup":{"hd":false}}'
    Set { patch: String },
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["tikvault"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn download_defaults_to_mp4() {
        let cli =
            Cli::try_parse_from(["tikvault", "download", "https://vm.tiktok.com/ZMabc/"]).unwrap();
        match cli.command {
            Some(Command::Download { url, format, output }) => {
                assert_eq!(url, "https://vm.tiktok.com/ZMabc/");
                assert_eq!(format, MediaFormat::Mp4);
                assert!(output.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn download_accepts_audio_and_output() {
        let cli = Cli::try_parse_from([
            "tikvault", "download", "https://vm.tiktok.com/ZMabc/", "-f", "mp3", "-o", "/tmp/out",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Download {
                format: MediaFormat::Mp3,
                output: Some(ref o),
                ..
            }) if o == &PathBuf::from("/tmp/out")
        ));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["tikvault", "download", "u", "--format", "gif"]).is_err());
    }

    #[test]
    fn history_clear_parses() {
        let cli = Cli::try_parse_from(["tikvault", "history", "clear"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::History { action: Some(HistoryAction::Clear) })
        ));
    }

    #[test]
    fn settings_set_takes_patch() {
        let patch = r#"{"lookup":{"hd":false}}"#;
        let cli = Cli::try_parse_from(["tikvault", "settings", "set", patch]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Settings {
                action: SettingsAction::Set { ref patch }
            }) if patch.contains("hd")
        ));
    }
}
