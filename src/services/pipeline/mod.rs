//! Frame-by-frame pipeline: Streaming, then Finalizing
//!
//! The pipeline owns the track aggregator and is its only writer.
//! - Streaming: each frame's detections are appended to their track
//!   histories. No zone or stationary work happens here.
//! - Finalizing: once the frame source is exhausted, `finalize` consumes
//!   the pipeline and builds the report exactly once. There is no way back
//!   to Streaming.

#[cfg(test)]
mod tests;

use crate::domain::report::Report;
use crate::domain::types::FrameDetections;
use crate::domain::zones::ZoneRegistry;
use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use crate::services::aggregator::TrackAggregator;
use crate::services::report_builder::build_report;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Aggregates a detection stream and produces the end-of-stream report
pub struct Pipeline {
    /// Per-track histories, in first-sighting order
    pub(crate) aggregator: TrackAggregator,
    /// Zones loaded at startup
    pub(crate) zones: ZoneRegistry,
    /// Application configuration
    pub(crate) config: Config,
    /// Run counters
    pub(crate) metrics: Arc<Metrics>,
    /// Frames consumed so far
    frames_seen: u64,
}

impl Pipeline {
    pub fn new(config: Config, zones: ZoneRegistry, metrics: Arc<Metrics>) -> Self {
        let aggregator = TrackAggregator::with_trail_length(config.trail_length());
        Self { aggregator, zones, config, metrics, frames_seen: 0 }
    }

    /// Consume frames until the channel closes, then finalize
    pub async fn run(mut self, mut frame_rx: mpsc::Receiver<FrameDetections>) -> Report {
        info!(zones = %self.zones.len(), "pipeline_streaming");

        while let Some(frame) = frame_rx.recv().await {
            self.process_frame(&frame);
        }

        self.finalize()
    }

    /// Synchronous counterpart of `run` for in-memory frame sources
    pub fn run_frames<I>(mut self, frames: I) -> Report
    where
        I: IntoIterator<Item = FrameDetections>,
    {
        for frame in frames {
            self.process_frame(&frame);
        }
        self.finalize()
    }

    /// Append one frame's detections to their track histories
    ///
    /// A frame with no detections is a no-op tick.
    pub fn process_frame(&mut self, frame: &FrameDetections) {
        let process_start = Instant::now();
        let mut observed = 0u64;
        let mut filtered = 0u64;

        for detection in &frame.detections {
            if !self.config.accepts_class(detection.class_id) {
                filtered += 1;
                continue;
            }
            self.aggregator.observe(detection.track_id, detection.bbox());
            observed += 1;
        }

        self.frames_seen += 1;
        debug!(
            frame = ?frame.frame,
            observed = %observed,
            filtered = %filtered,
            tracks = %self.aggregator.track_count(),
            "frame_observed"
        );

        let latency_us = process_start.elapsed().as_micros() as u64;
        self.metrics.record_frame(observed, filtered, latency_us);

        let every = self.config.progress_every_frames();
        if every > 0 && self.frames_seen % every == 0 {
            self.metrics.summary(self.aggregator.track_count()).log();
        }
    }

    /// Build the report from everything observed so far
    pub fn finalize(self) -> Report {
        let tracks = self.aggregator.track_count();
        info!(frames = %self.frames_seen, tracks = %tracks, "pipeline_finalizing");

        let report = build_report(self.aggregator.histories(), &self.zones);
        self.metrics.summary(tracks).log();
        report
    }

    pub fn aggregator(&self) -> &TrackAggregator {
        &self.aggregator
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}
