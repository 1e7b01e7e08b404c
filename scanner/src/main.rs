//! Scanner
//!
//! Loads market and congressional-disclosure snapshots, runs the signal
//! ensemble over every market and prints ranked trade recommendations.
//!
//! Usage:
//!   scanner --markets markets.json [--trades trades.json] [OPTIONS]
//!   scanner --init-config engine.toml

mod input;
mod report;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use common::{CongressionalTrade, Market};
use signal_generation::{
    create_config_template, load_config, EngineConfig, Recommendation, RecommendationPipeline,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI arguments for the scanner.
#[derive(Parser, Debug)]
#[command(name = "scanner")]
#[command(about = "Informed-money signal scanner for prediction markets")]
#[command(version)]
struct Args {
    /// Market snapshot (JSON array)
    #[arg(short, long, required_unless_present = "init_config")]
    markets: Option<PathBuf>,

    /// Congressional trade disclosures (JSON array)
    #[arg(short, long)]
    trades: Option<PathBuf>,

    /// Engine configuration (TOML); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a commented configuration template and exit
    #[arg(long)]
    init_config: Option<PathBuf>,

    /// Minimum confidence in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    min_confidence: f64,

    /// Maximum number of recommendations
    #[arg(long, default_value_t = 10)]
    max_results: usize,

    /// Reference instant (RFC 3339); defaults to now
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,

    /// Bankroll in USD, used to print dollar stakes
    #[arg(long)]
    bankroll: Option<f64>,

    /// Print one detailed block per recommendation
    #[arg(long)]
    detailed: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Abort the scan after this many seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

/// Per-call scan parameters
#[derive(Debug, Clone, Copy)]
struct ScanRequest {
    min_confidence: f64,
    max_results: usize,
    as_of: DateTime<Utc>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scanner=info,signal_generation=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if let Some(path) = &args.init_config {
        create_config_template(&path.to_string_lossy())
            .with_context(|| format!("failed to write template to {}", path.display()))?;
        info!("Wrote configuration template to {}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => load_config(&path.to_string_lossy())
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let markets_path = args
        .markets
        .as_deref()
        .context("--markets is required")?;
    let markets = input::load_markets(markets_path)?;
    let trades = match &args.trades {
        Some(path) => input::load_trades(path)?,
        None => {
            warn!("No disclosure file given; congressional signal will read zero");
            Vec::new()
        }
    };

    let pipeline = RecommendationPipeline::new(config).context("invalid engine configuration")?;
    let request = ScanRequest {
        min_confidence: args.min_confidence,
        max_results: args.max_results,
        as_of: args.as_of.unwrap_or_else(Utc::now),
    };

    info!(
        markets = markets.len(),
        trades = trades.len(),
        as_of = %request.as_of,
        "Starting scan"
    );

    let recommendations = run_scan(
        pipeline,
        markets,
        trades,
        request,
        Duration::from_secs(args.timeout_secs),
    )
    .await?;

    if args.json {
        let report = report::ScanReport::new(&recommendations, Utc::now());
        println!("{}", report.to_json()?);
    } else if args.detailed {
        for rec in &recommendations {
            println!("{}", report::format_recommendation(rec, args.bankroll));
        }
        if recommendations.is_empty() {
            print!("{}", report::format_summary(&recommendations, args.bankroll));
        }
    } else {
        print!("{}", report::format_summary(&recommendations, args.bankroll));
    }

    Ok(())
}

/// Run the CPU-bound pipeline off the async runtime, bounded by `limit`.
async fn run_scan(
    pipeline: RecommendationPipeline,
    markets: Vec<Market>,
    trades: Vec<CongressionalTrade>,
    request: ScanRequest,
    limit: Duration,
) -> Result<Vec<Recommendation>> {
    let task = tokio::task::spawn_blocking(move || {
        pipeline.build_recommendations(
            &markets,
            &trades,
            request.min_confidence,
            request.max_results,
            request.as_of,
        )
    });

    let recommendations = tokio::time::timeout(limit, task)
        .await
        .with_context(|| format!("scan did not finish within {}s", limit.as_secs()))?
        .context("scan task failed")??;

    Ok(recommendations)
}
