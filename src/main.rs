#![cfg_attr(not(windows), forbid(unsafe_code))]

mod config;
mod constants;
mod display;
mod errors;
mod hotkeys;
mod profiles;
mod store;
mod topology;
#[cfg(windows)]
mod win32;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use config::Config;

#[derive(Parser)]
#[command(
    name = "monitor-switcher",
    version,
    about = "Save and restore multi-monitor display profiles"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save the current display topology to a file
    Save { file: PathBuf },
    /// Load a display topology from a file, reconcile and apply it
    Load { file: PathBuf },
    /// Capture the current display topology as a named profile
    Capture { name: String },
    /// Restore a named profile
    Restore { name: String },
    /// List saved profiles
    List,
    /// Register the configured hotkeys and restore profiles on key press
    Listen,
}

#[cfg(windows)]
fn platform_api() -> Result<win32::Win32DisplayApi> {
    Ok(win32::Win32DisplayApi)
}

#[cfg(not(windows))]
mod unsupported {
    use crate::display::{DisplayConfigApi, QueryScope};
    use crate::errors::OsStatus;
    use crate::topology::Topology;

    /// ERROR_NOT_SUPPORTED, should a command ever reach the stub.
    const NOT_SUPPORTED: OsStatus = 50;

    pub struct NoDisplayApi;

    impl DisplayConfigApi for NoDisplayApi {
        fn buffer_sizes(&self, _scope: QueryScope) -> Result<(u32, u32), OsStatus> {
            Err(NOT_SUPPORTED)
        }

        fn query(
            &self,
            _scope: QueryScope,
            _path_slots: u32,
            _mode_slots: u32,
        ) -> Result<Topology, OsStatus> {
            Err(NOT_SUPPORTED)
        }

        fn set(&self, _topology: &Topology) -> Result<(), OsStatus> {
            Err(NOT_SUPPORTED)
        }
    }
}

#[cfg(not(windows))]
fn platform_api() -> Result<unsupported::NoDisplayApi> {
    Err(errors::EngineError::Unsupported.into())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();

    // LOG_LEVEL env var overrides the config file value
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| config.log_level.clone())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let profile_dir = config.profile_dir();

    match cli.command {
        Command::Save { file } => {
            profiles::capture_to(&platform_api()?, &file)?;
            println!("Saved current display topology to {}", file.display());
        }
        Command::Load { file } => {
            profiles::restore_from(&platform_api()?, &file)?;
            println!("Applied display topology from {}", file.display());
        }
        Command::Capture { name } => {
            profiles::capture_profile(&platform_api()?, &profile_dir, &name)?;
            println!("Captured profile '{name}'");
        }
        Command::Restore { name } => {
            profiles::restore_profile(&platform_api()?, &profile_dir, &name)?;
            println!("Restored profile '{name}'");
        }
        Command::List => {
            let names = profiles::list_profiles(&profile_dir)?;
            if names.is_empty() {
                println!("No profiles saved in {}", profile_dir.display());
            }
            for name in names {
                println!("{name}");
            }
        }
        Command::Listen => {
            info!(bindings = config.hotkeys.len(), "Starting hotkey dispatcher");
            hotkeys::run_dispatcher(&platform_api()?, &profile_dir, &config.hotkeys)?;
        }
    }

    Ok(())
}
