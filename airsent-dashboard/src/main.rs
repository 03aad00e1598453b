//! airsent-dashboard: airline sentiment dashboard
//!
//! Serves the interactive dashboard, or prints tallies and random tweets in
//! the terminal.

use airsent_common::{load_config, ConfigSource, DashboardConfig};
use airsent_dashboard::{router, summary, AppState};
use airsent_query::Dataset;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "airsent-dashboard")]
#[command(about = "Sentiment dashboard for tweets about US airlines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (TOML)
    #[arg(short, long, env = "AIRSENT_CONFIG")]
    config: Option<PathBuf>,

    /// Tweets CSV file, overrides the configured path
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Enable development mode (more verbose logging)
    #[arg(long)]
    dev: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard server
    Serve {
        /// Server bind address, overrides the configured address
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Print sentiment and airline tallies
    Summary,
    /// Print one random tweet with the given sentiment
    Sample {
        #[arg(short, long, default_value = "positive")]
        sentiment: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.dev { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let source = match &cli.config {
        Some(path) => ConfigSource::File(path.clone()),
        None => ConfigSource::Default,
    };
    let mut config = load_config(source).context("Failed to load configuration")?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    let dataset = Dataset::load(&config.data_path)
        .with_context(|| format!("Failed to load dataset from {}", config.data_path.display()))?;

    match cli.command {
        Some(Commands::Serve { bind }) => serve(dataset, config, bind.map(|b| b.to_string())).await,
        None => serve(dataset, config, None).await,
        Some(Commands::Summary) => {
            print!("{}", summary::render_summary(&dataset));
            Ok(())
        }
        Some(Commands::Sample { sentiment }) => {
            let mut rng = rand::thread_rng();
            match dataset.random_post(&sentiment, &mut rng) {
                Ok(post) => {
                    println!("{}", format!("Random {} tweet", sentiment).bold());
                    println!("{}", post.text);
                    if let Some(publisher) = &post.publisher {
                        println!("  {}", publisher.dimmed());
                    }
                }
                Err(e) => println!("{}", e.to_string().yellow()),
            }
            Ok(())
        }
    }
}

async fn serve(dataset: Dataset, mut config: DashboardConfig, bind: Option<String>) -> Result<()> {
    if let Some(bind) = bind {
        config.bind_address = bind;
    }
    let bind_address = config.bind_address.clone();

    let app = router(AppState::new(dataset, config));

    info!("Starting dashboard server on {}", bind_address);
    let listener = TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind server")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
