//! pixdex - background indexer service manager
//!
//! Command-line front-end for registering the pixdex indexer with launchd.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pixdex_config::{ConfigLoader, ConfigValidator, LoggingConfig};

mod cli;
mod cmd_service;

use cli::{Cli, Commands};
use cmd_service::handle_service_command;

/// Get the ~/.pixdex directory path.
fn pixdex_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".pixdex"))
        .unwrap_or_else(|| PathBuf::from(".pixdex"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.pixdex/logs/ (or `logging.dir`) with daily rotation.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = match &logging.dir {
        Some(dir) => PathBuf::from(ConfigLoader::expand_path(&dir.to_string_lossy())),
        None => pixdex_dir().join("logs"),
    };
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pixdex")
        .filename_suffix("log")
        .max_log_files(logging.max_files)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes on drop; keep it for the life of the process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console on stderr so stdout stays machine-readable
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Ok(())
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| pixdex_dir().join("config.toml"));
    let config = ConfigLoader::load_or_default(&config_path)?;

    init_tracing(&config.logging)?;

    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!(path = %warning.path, "{}", warning.message);
    }

    let ok = match cli.command {
        Commands::Service { action } => handle_service_command(action, config.service, cli.json)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
