use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tikvault_core::core::file_sink::DirectorySink;
use tikvault_core::core::http_client::{HttpTransport, ReqwestTransport};
use tikvault_core::models::settings::AppSettings;
use tikvault_core::session::Session;
use tikvault_core::storage::{self, config, kv::KeyValueStore};
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod commands;
pub mod core;

use crate::core::events::TerminalEmitter;

pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub settings: AppSettings,
    pub transport: Arc<dyn HttpTransport>,
}

impl AppState {
    pub fn load() -> Self {
        Self::with_store(storage::open_default_store())
    }

    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        let settings = config::load_settings(store.as_ref());
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&settings));

        Self {
            store,
            settings,
            transport,
        }
    }

    pub fn output_dir(&self, output: Option<PathBuf>) -> PathBuf {
        output.unwrap_or_else(|| self.settings.download.default_output_dir.clone())
    }

    pub fn session(&self, output: Option<PathBuf>) -> Session<TerminalEmitter> {
        Session::new(
            self.transport.clone(),
            self.store.clone(),
            Arc::new(DirectorySink::new(self.output_dir(output))),
            &self.settings.lookup,
            TerminalEmitter::new(),
        )
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run() -> ExitCode {
    init_tracing();
    let cli = cli::Cli::parse();

    // One cooperative thread: every fetch and download runs as a task on it.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: could not start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(commands::dispatch(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("command failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
