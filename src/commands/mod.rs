pub mod download;
pub mod history;
pub mod interactive;
pub mod interrupt;
pub mod lookup;
pub mod settings;

use crate::cli::{Cli, Command, HistoryAction, SettingsAction};
use crate::AppState;

pub async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::load();

    match cli.command {
        Some(Command::Check { url }) => lookup::check(&state, &url).await,
        Some(Command::Download {
            url,
            format,
            output,
        }) => download::download_from_url(&state, &url, format, output).await,
        Some(Command::History { action: None }) => history::list(&state),
        Some(Command::History {
            action: Some(HistoryAction::Clear),
        }) => history::clear(&state),
        Some(Command::Settings { action }) => match action {
            SettingsAction::Get => settings::get_settings(&state),
            SettingsAction::Set { patch } => settings::update_settings(&state, &patch),
            SettingsAction::Reset => settings::reset_settings(&state),
        },
        Some(Command::Interactive { output }) => interactive::run(&state, output).await,
        None => interactive::run(&state, None).await,
    }
}
