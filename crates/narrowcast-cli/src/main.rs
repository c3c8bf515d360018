use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use narrowcast_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "narrowcast")]
#[command(author, version, about = "Unattended poster playback for signage screens")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the poster list until interrupted
    Run,
    /// Fetch and list the current posters
    Posters,
    /// Resolve a photo from one or more albums
    Photo {
        /// Album id (repeatable)
        #[arg(short = 'a', long = "album", required = true)]
        albums: Vec<u64>,
    },
    /// Show the config file location and effective settings
    Config {
        /// Write the effective settings to the config file
        #[arg(long)]
        init: bool,
    },
    /// Compute the auto-scroll for a viewport and content height
    Scroll {
        /// Viewport height in pixels
        #[arg(long)]
        viewport: f64,
        /// Content height in pixels
        #[arg(long)]
        content: f64,
        /// Minimum scroll duration in seconds
        #[arg(long)]
        min_secs: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Posters) => commands::posters::run(&config).await,
        Some(Commands::Photo { albums }) => commands::photo::run(&config, albums).await,
        Some(Commands::Config { init }) => commands::config::run(&config, init),
        Some(Commands::Scroll {
            viewport,
            content,
            min_secs,
        }) => commands::scroll::run(viewport, content, min_secs),
    }
}
