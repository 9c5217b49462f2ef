//! mediacast probe - single discovery round
//!
//! Loads the discovery configuration, derives the capability requirement of
//! the described job, asks every configured orchestrator for its info over
//! HTTP and prints the orchestrators a broadcaster would select.
//!
//! # Usage
//!
//! ```bash
//! # Orchestrators from a config file, MP4 output to S3
//! mediacast-probe --config ./discovery.toml --format mp4 --storage s3
//!
//! # Orchestrators on the command line, pick two
//! mediacast-probe -o https://o1:8935 -o https://o2:8935 -n 2 --format mpegts
//!
//! # With logging
//! RUST_LOG=debug mediacast-probe --config ./discovery.toml
//! ```

mod job;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mediacast_core::{Capabilities, CapabilityComparator, OrchestratorInfo};
use mediacast_discovery::{
    DiscoveryConfig, DiscoveryMetricsSnapshot, HttpInfoFetcher, NoSuspension, OrchestratorPool,
};

use crate::job::JobArgs;

/// mediacast probe - see which orchestrators would take a job
#[derive(Parser)]
#[command(name = "mediacast-probe")]
#[command(author, version)]
#[command(about = "Run one orchestrator discovery round and print the selection")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Discovery configuration file (TOML); environment is used if absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Orchestrator base URL, replaces the configured list (repeatable)
    #[arg(short = 'o', long = "orchestrator")]
    orchestrators: Vec<String>,

    /// Number of orchestrators to select
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Round deadline in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[command(flatten)]
    job: JobArgs,
}

#[derive(Serialize)]
struct Report<'a> {
    required: Vec<u64>,
    legacy_only: bool,
    selected: &'a [OrchestratorInfo],
    metrics: DiscoveryMetricsSnapshot,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    let mut config = DiscoveryConfig::load(cli.config.as_ref())
        .context("Failed to load discovery configuration")?;
    if !cli.orchestrators.is_empty() {
        config.orchestrators.addresses = cli.orchestrators.clone();
    }
    if let Some(count) = cli.count {
        config.discovery.max_orchestrators = count;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.discovery.timeout_ms = timeout_ms;
    }

    let caps = Capabilities::from_job(&cli.job.stream_parameters())
        .context("Job cannot be described as capabilities")?;

    let fetcher = Arc::new(HttpInfoFetcher::new()?);
    let pool = OrchestratorPool::from_config(&config, fetcher)?;

    tracing::info!(
        orchestrators = pool.size(),
        count = config.discovery.max_orchestrators,
        timeout = ?Duration::from_millis(config.discovery.timeout_ms),
        "Starting discovery round"
    );

    let selected = pool
        .get_orchestrators(config.discovery.max_orchestrators, &NoSuspension, &caps)
        .await;

    let report = Report {
        required: caps.bitstring().as_words().to_vec(),
        legacy_only: caps.legacy_only(),
        selected: &selected,
        metrics: pool.metrics().snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if selected.is_empty() {
        anyhow::bail!("No compatible orchestrators found");
    }
    Ok(())
}
