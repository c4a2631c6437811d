//! Zone checker - classifies tracked vehicles against image-space zones
//!
//! Consumes a per-frame stream of tracked bounding boxes, records which
//! zones each track's footprint entered and whether it stayed put, and
//! writes a single JSON report once the stream is exhausted.
//!
//! Module structure:
//! - `domain/` - Core types (boxes, zones, geometry, report)
//! - `io/` - Zone file, detection stream, report output
//! - `services/` - Track aggregation, classification, pipeline
//! - `infra/` - Config, Metrics

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use zone_checker::infra::{Config, Metrics};
use zone_checker::io::{load_zones, read_detection_file, ReportWriter};
use zone_checker::services::Pipeline;

const DEFAULT_CONFIG_PATH: &str = "config/dev.toml";

/// Zone checker - zone membership and stationary classification for tracked objects
#[derive(Parser, Debug)]
#[command(
    name = "zone-checker",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"),
    about
)]
struct Args {
    /// Path to TOML configuration file
    ///
    /// When omitted, config/dev.toml is used if present, otherwise defaults.
    #[arg(short, long)]
    config: Option<String>,

    /// Zone JSON file, overrides zones.file from the config
    #[arg(short, long)]
    zones: Option<String>,

    /// JSONL detection stream, one frame per line
    detections: String,

    /// Path the JSON report is written to
    results: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default: INFO, use RUST_LOG=debug for per-frame visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        "zone_checker_starting"
    );

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_from_path(DEFAULT_CONFIG_PATH),
    };
    if let Some(zones_file) = &args.zones {
        config = config.with_zones_file(zones_file.as_str());
    }

    info!(
        config_file = %config.config_file(),
        zones_file = %config.zones_file(),
        trail_length = %config.trail_length(),
        classes = ?config.classes(),
        detections = %args.detections,
        results = %args.results,
        "config_loaded"
    );

    // Zone problems are fatal before any frame is read
    let zones = load_zones(config.zones_file())?;

    let metrics = Arc::new(Metrics::new());
    let (frame_tx, frame_rx) = mpsc::channel(config.channel_capacity());

    let reader_metrics = metrics.clone();
    let detections_path = args.detections.clone();
    let reader = tokio::spawn(async move {
        read_detection_file(detections_path, frame_tx, reader_metrics).await
    });

    let pipeline = Pipeline::new(config, zones, metrics);
    let report = pipeline.run(frame_rx).await;

    // A malformed stream invalidates the whole run
    let frames = reader.await.context("detection reader task failed")??;
    info!(frames = %frames, "detection_done");

    ReportWriter::new(&args.results).write_report(&report)?;

    info!("zone_checker_done");
    Ok(())
}
