use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bookreel_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "bookreel")]
#[command(author, version, about = "An auto-scrolling carousel of book covers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the carousel TUI
    Run {
        /// Search for these terms on startup
        #[arg(short = 'q', long)]
        query: Option<String>,
    },
    /// Search once and print the results
    Search {
        /// Search terms
        #[arg(required = true)]
        terms: Vec<String>,
        /// Treat the terms as a speech transcript
        #[arg(long)]
        spoken: bool,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    let interactive = matches!(cli.command, None | Some(Commands::Run { .. }));
    init_logging(&config, interactive)?;

    match cli.command {
        None => commands::run::run(config, None).await,
        Some(Commands::Run { query }) => commands::run::run(config, query).await,
        Some(Commands::Search {
            terms,
            spoken,
            json,
        }) => commands::search::run(&config, &terms, spoken, json).await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Init { force } => commands::config::init(force),
        },
    }
}

/// Install the tracing subscriber
///
/// The TUI owns the terminal, so interactive sessions log to a file in the
/// data directory. One-shot commands log to stderr.
fn init_logging(config: &AppConfig, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if interactive {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}
