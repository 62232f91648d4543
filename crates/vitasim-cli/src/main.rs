//! VitaSim CLI — entry point.
//!
//! # Commands
//!
//! - `vitasim chat [-m MESSAGE] [--dataset FILE]` — simulator (single-shot or REPL)
//! - `vitasim status` — show configuration and credential status
//! - `vitasim init` — write a default config and an example dataset

mod helpers;
mod init;
mod repl;
mod status;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use vitasim_core::config::{load_config, Config};
use vitasim_core::error::ConfigError;
use vitasim_engine::{build_configuration, load_pairs, SessionManager};
use vitasim_providers::GeminiProvider;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🩺 VitaSim — interactive clinical reasoning simulator
#[derive(Parser)]
#[command(name = "vitasim", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.vitasim/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulator (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// JSON file of training pairs to load before the first message
        #[arg(short, long)]
        dataset: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and credential status
    Status,

    /// Write a default config and an example dataset
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            message,
            dataset,
            logs,
        } => {
            init_logging(logs);
            run_chat(cli.config, message, dataset).await
        }
        Commands::Status => status::run(cli.config.as_deref()),
        Commands::Init => init::run(cli.config.as_deref()),
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(
    config_path: Option<PathBuf>,
    message: Option<String>,
    dataset: Option<String>,
) -> Result<()> {
    let config = load_config(config_path.as_deref());
    let mut manager = build_manager(&config).context("failed to start the simulator")?;
    let deadline = response_deadline(&config);

    if let Some(dataset) = dataset {
        let path = helpers::expand_tilde(&dataset);
        let pairs = load_pairs(&path)?;
        let report = manager.load_dataset(pairs);
        helpers::print_dataset_report(&report);
    }

    match message {
        Some(msg) => {
            // Single-shot mode
            info!("processing single message");
            helpers::print_thinking();
            let outcome = repl::exchange(&mut manager, &msg, deadline).await;
            helpers::clear_thinking();
            helpers::print_outcome(&outcome, deadline);
        }
        None => {
            repl::run(manager, deadline).await?;
        }
    }

    Ok(())
}

/// Build the session manager. Any error here is fatal.
pub fn build_manager(config: &Config) -> Result<SessionManager, ConfigError> {
    let configuration = build_configuration(&config.simulator)?;
    let provider = GeminiProvider::new(&config.provider)?;
    Ok(SessionManager::new(Arc::new(provider), configuration))
}

/// Per-message deadline, `None` when disabled.
fn response_deadline(config: &Config) -> Option<Duration> {
    match config.simulator.response_timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("vitasim=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
