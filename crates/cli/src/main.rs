//! gcb — The Garden of Forking Paths ChatGPT bot.
//!
//! Commands:
//! - `play`: ask the completion service to choose a path for the current
//!   stage of a session and submit it on behalf of a token

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gofp_config::AppConfig;
use tracing::error;

mod commands;

#[derive(Parser)]
#[command(
    name = "gcb",
    about = "The Garden of Forking Paths ChatGPT bot CLI",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.gcb/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the current stage of a session
    Play(commands::play::PlayArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    // The credential is checked once, before any command runs
    if let Err(e) = config.require_api_key() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Commands::Play(args) => commands::play::run(&config, args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
