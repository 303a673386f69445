//! Strangelove - a live clock and nearby bike-share stations in your terminal
//!
//! Shows civil and mean solar time for a location next to a column of tabs,
//! one per nearby station, refreshed from a GBFS feed. Arrow keys move the
//! tab selection; `q`, `Esc` or `Ctrl+C` quit.

mod config;
mod core;
mod integrations;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::core::app::{self, App};
use crate::integrations::clock::SolarClock;
use crate::integrations::feed;

#[derive(Parser)]
#[command(name = "strangelove")]
#[command(author = "Strangelove Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A live clock and nearby bike-share stations in your terminal", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Latitude override in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude override in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Print a single frame as plain text and exit
    Snapshot {
        /// Seconds to wait for the first feed batch
        #[arg(short, long, default_value = "5")]
        wait_secs: u64,
    },
}

fn setup_logging(verbosity: u8) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // The dashboard owns the terminal, so logs go to a file
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("strangelove")
        .join("logs");

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "strangelove.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config_path = cli.config.clone().or_else(|| {
        let default_config = Config::default_path()?;
        if default_config.exists() {
            Some(default_config)
        } else {
            None
        }
    });

    let mut config = if let Some(path) = config_path {
        Config::load(&path).with_context(|| format!("loading {}", path.display()))?
    } else {
        Config::default()
    };

    if let Some(lat) = cli.lat {
        config.location.latitude = lat;
    }
    if let Some(lon) = cli.lon {
        config.location.longitude = lon;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep the guard alive for the duration of the program
    let _logging_guard = setup_logging(cli.verbose)?;

    match cli.command.take() {
        Some(Commands::Init { force }) => {
            let path = match cli.config {
                Some(path) => path,
                None => Config::default_path()
                    .context("no configuration directory on this system")?,
            };
            config::init_config(&path, force)?;
        }
        Some(Commands::Snapshot { wait_secs }) => {
            let config = load_config(&cli)?;
            let labels = feed::spawn(&config.feed, config.location.coordinates());
            let text = app::snapshot(
                &config,
                &SolarClock,
                Box::new(labels),
                Duration::from_secs(wait_secs),
            )
            .await;
            println!("{text}");
        }
        None => {
            let config = load_config(&cli)?;
            tracing::info!(
                latitude = config.location.latitude,
                longitude = config.location.longitude,
                feed = ?config.feed.kind,
                "starting dashboard"
            );
            let labels = feed::spawn(&config.feed, config.location.coordinates());
            let app = App::new(&config, Arc::new(SolarClock), Box::new(labels));
            app.run().await?;
        }
    }

    Ok(())
}
