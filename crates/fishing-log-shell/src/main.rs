// SPDX-License-Identifier: AGPL-3.0
// Fishing Log Shell - Interactive text frontend

mod command;
mod shell;
mod view;

use clap::Parser;
use fishing_log_core::{AppError, JsonFileStore, SettingsStore, StorageManager};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "fishing-log", version, about = "Track catches, storages and sales")]
struct Args {
    /// Directory holding saved_data.json and fish_data.json
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Initialize logging; stderr keeps logs out of the views
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fishing_log_shell=info".parse().unwrap())
                .add_directive("fishing_log_core=info".parse().unwrap()),
        )
        .init();

    tracing::info!("Starting Fishing Log v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            eprintln!("fishing-log: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let settings = SettingsStore::new()?;
    let data_dir = settings.get().resolve_data_dir(args.data_dir)?;
    tracing::info!("Data directory: {:?}", data_dir);

    let manager = StorageManager::open(JsonFileStore::new(data_dir), &settings.get())?;
    let mut shell = shell::Shell::new(manager, settings);

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout().lock();
    shell.run(&mut input, &mut out)?;
    Ok(())
}
