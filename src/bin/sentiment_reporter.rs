//! airsent Static Report Generator
//!
//! Loads the tweets dataset once and writes a self-contained HTML report with
//! every dashboard section rendered for the given control values.

use airsent::report::generate_report;
use airsent_common::{load_config, ConfigSource};
use airsent_query::{ChartKind, DashboardParams, Dataset, RenderOptions};
use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sentiment_reporter")]
#[command(about = "Generates a static HTML report from the airline tweets dataset")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tweets CSV file, overrides the configured path
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Output directory for the HTML report
    #[arg(short, long, default_value = "sentiment_report")]
    output: PathBuf,

    /// Report title, overrides the configured title
    #[arg(short, long)]
    title: Option<String>,

    /// Sentiment of the random tweet
    #[arg(long, default_value = "positive")]
    sample_sentiment: String,

    /// Chart for sentiment counts (bar, pie)
    #[arg(long, default_value = "bar")]
    sentiment_chart: ChartKind,

    /// Chart for airline counts (bar, pie)
    #[arg(long, default_value = "bar")]
    publisher_chart: ChartKind,

    /// Hour of day for the tweet map
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..24))]
    hour: u32,

    /// Airline for the sentiment breakdown, repeat for several
    #[arg(long = "publisher")]
    publishers: Vec<String>,

    /// Sentiment for the word cloud (defaults to the first one in the data)
    #[arg(long)]
    word_sentiment: Option<String>,

    /// Seed for the random tweet, for reproducible reports
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let source = match &cli.config {
        Some(path) => ConfigSource::File(path.clone()),
        None => ConfigSource::Default,
    };
    let mut config = load_config(source).context("Failed to load configuration")?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(title) = cli.title {
        config.title = title;
    }

    let dataset = Dataset::load(&config.data_path)
        .with_context(|| format!("Failed to load dataset from {}", config.data_path.display()))?;

    let params = DashboardParams {
        sample_sentiment: cli.sample_sentiment,
        sentiment_chart: cli.sentiment_chart,
        hour: cli.hour,
        publisher_chart: cli.publisher_chart,
        publishers: cli.publishers,
        word_sentiment: cli.word_sentiment,
        ..Default::default()
    };
    let options = RenderOptions {
        title: config.title.clone(),
        background_color: config.background_color.clone(),
        interactive: false,
    };

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let path = generate_report(&dataset, params, &options, &config.word_cloud, &cli.output, &mut rng)
        .context("Failed to generate report")?;

    info!("Open {} in your browser to view the report", path.display());
    println!("{}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_kinds_and_repeated_publishers() {
        let cli = Cli::try_parse_from([
            "sentiment_reporter",
            "--sentiment-chart",
            "Pie Chart",
            "--publisher",
            "Acme, Inc",
            "--publisher",
            "Delta",
        ])
        .unwrap();
        assert_eq!(cli.sentiment_chart, ChartKind::Pie);
        assert_eq!(cli.publisher_chart, ChartKind::Bar);
        assert_eq!(cli.publishers, vec!["Acme, Inc", "Delta"]);
    }

    #[test]
    fn test_unknown_chart_kind_rejected() {
        assert!(Cli::try_parse_from(["sentiment_reporter", "--publisher-chart", "donut"]).is_err());
    }
}
