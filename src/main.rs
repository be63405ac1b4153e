use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snap_pm::config::Config;
use snap_pm::transport::cli;

#[derive(Parser)]
#[command(name = "snap-pm")]
#[command(author, version, about = "Snap personal menu: cached widget refresh from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Site root URL
    #[arg(long, global = true)]
    wwwroot: Option<String>,

    /// Session key; scopes the widget cache
    #[arg(long, global = true)]
    sesskey: Option<String>,

    /// Context id sent with widget requests
    #[arg(long, global = true)]
    context_id: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the personal menu once and print every widget
    Refresh,

    /// Interactive personal menu in the terminal
    Tui,

    /// Manage the widget cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove every cached widget for the configured site
    Clear,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };
    if let Some(wwwroot) = &cli.wwwroot {
        config.site.wwwroot = wwwroot.clone();
    }
    if let Some(sesskey) = &cli.sesskey {
        config.site.sesskey = sesskey.clone();
    }
    if let Some(context_id) = cli.context_id {
        config.site.context_id = context_id;
    }
    Ok(config)
}

fn init_logging(verbose: bool, log_file: Option<PathBuf>) -> Result<()> {
    let filter = if verbose { "snap_pm=debug" } else { "snap_pm=info" };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    match log_file {
        // The TUI owns the terminal, so logs go to a file
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let log_file = matches!(cli.command, Commands::Tui).then(|| config.cache_dir().join("tui.log"));
    init_logging(cli.verbose, log_file)?;

    match cli.command {
        Commands::Refresh => {
            cli::run_refresh(&config).await?;
        }
        Commands::Tui => {
            cli::run_tui(&config).await?;
        }
        Commands::Cache { action } => match action {
            CacheAction::Clear => {
                cli::run_cache_clear(&config)?;
            }
        },
    }

    Ok(())
}
