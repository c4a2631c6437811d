//! Lock-free run metrics
//!
//! Counters are `AtomicU64` so the detection reader and the pipeline can
//! record without locking. All atomics use Relaxed ordering: these are
//! statistics only and never drive control flow.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Exponential bucket boundaries (microseconds)
/// Buckets: ≤100, ≤200, ≤400, ≤800, ≤1600, ≤3200, ≤6400, ≤12800, ≤25600, ≤51200, >51200
const BUCKET_BOUNDS: [u64; 10] = [100, 200, 400, 800, 1600, 3200, 6400, 12800, 25600, 51200];
const NUM_BUCKETS: usize = 11;

/// Upper bound reported for each bucket (last bucket uses 2x the previous bound)
const BUCKET_UPPER_BOUNDS: [u64; NUM_BUCKETS] =
    [100, 200, 400, 800, 1600, 3200, 6400, 12800, 25600, 51200, 102400];

#[inline]
fn bucket_index(latency_us: u64) -> usize {
    BUCKET_BOUNDS.partition_point(|&bound| bound < latency_us)
}

#[inline]
fn update_atomic_max(atomic_max: &AtomicU64, new_value: u64) {
    let mut current_max = atomic_max.load(Ordering::Relaxed);
    while new_value > current_max {
        match atomic_max.compare_exchange_weak(
            current_max,
            new_value,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(actual) => current_max = actual,
        }
    }
}

/// Upper bound of the bucket holding the given percentile
fn percentile_from_buckets(buckets: &[u64; NUM_BUCKETS], percentile: f64) -> u64 {
    let total: u64 = buckets.iter().sum();
    if total == 0 {
        return 0;
    }

    let target = ((total as f64 * percentile).ceil() as u64).max(1);
    let mut cumulative = 0u64;
    for (i, &count) in buckets.iter().enumerate() {
        cumulative += count;
        if cumulative >= target {
            return BUCKET_UPPER_BOUNDS[i];
        }
    }
    BUCKET_UPPER_BOUNDS[NUM_BUCKETS - 1]
}

/// Counters for a single run
pub struct Metrics {
    /// Frames consumed by the pipeline
    frames_total: AtomicU64,
    /// Frames with no detections after filtering
    empty_frames_total: AtomicU64,
    /// Detections appended to a track history
    detections_observed: AtomicU64,
    /// Detections dropped by the class filter
    detections_filtered: AtomicU64,
    /// Lines read by the detection reader
    lines_read: AtomicU64,
    /// Per-frame processing latency histogram
    frame_latency_buckets: [AtomicU64; NUM_BUCKETS],
    frame_latency_sum_us: AtomicU64,
    frame_latency_max_us: AtomicU64,
    started_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            frames_total: AtomicU64::new(0),
            empty_frames_total: AtomicU64::new(0),
            detections_observed: AtomicU64::new(0),
            detections_filtered: AtomicU64::new(0),
            lines_read: AtomicU64::new(0),
            frame_latency_buckets: std::array::from_fn(|_| AtomicU64::new(0)),
            frame_latency_sum_us: AtomicU64::new(0),
            frame_latency_max_us: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Record one processed frame
    #[inline]
    pub fn record_frame(&self, observed: u64, filtered: u64, latency_us: u64) {
        self.frames_total.fetch_add(1, Ordering::Relaxed);
        if observed == 0 {
            self.empty_frames_total.fetch_add(1, Ordering::Relaxed);
        }
        self.detections_observed.fetch_add(observed, Ordering::Relaxed);
        self.detections_filtered.fetch_add(filtered, Ordering::Relaxed);

        self.frame_latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
        update_atomic_max(&self.frame_latency_max_us, latency_us);
        self.frame_latency_buckets[bucket_index(latency_us)].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_line_read(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frames_total(&self) -> u64 {
        self.frames_total.load(Ordering::Relaxed)
    }

    pub fn detections_observed(&self) -> u64 {
        self.detections_observed.load(Ordering::Relaxed)
    }

    pub fn detections_filtered(&self) -> u64 {
        self.detections_filtered.load(Ordering::Relaxed)
    }

    /// Snapshot the counters without resetting them
    pub fn summary(&self, tracks: usize) -> MetricsSummary {
        let frames_total = self.frames_total();
        let mut buckets = [0u64; NUM_BUCKETS];
        for (i, bucket) in self.frame_latency_buckets.iter().enumerate() {
            buckets[i] = bucket.load(Ordering::Relaxed);
        }

        let elapsed_secs = self.started_at.elapsed().as_secs_f64();
        let frames_per_sec =
            if elapsed_secs > 0.0 { frames_total as f64 / elapsed_secs } else { 0.0 };
        let avg_frame_latency_us = if frames_total > 0 {
            self.frame_latency_sum_us.load(Ordering::Relaxed) / frames_total
        } else {
            0
        };

        MetricsSummary {
            frames_total,
            empty_frames_total: self.empty_frames_total.load(Ordering::Relaxed),
            detections_observed: self.detections_observed(),
            detections_filtered: self.detections_filtered(),
            lines_read: self.lines_read.load(Ordering::Relaxed),
            tracks,
            frames_per_sec,
            avg_frame_latency_us,
            max_frame_latency_us: self.frame_latency_max_us.load(Ordering::Relaxed),
            lat_p50_us: percentile_from_buckets(&buckets, 0.50),
            lat_p95_us: percentile_from_buckets(&buckets, 0.95),
            lat_p99_us: percentile_from_buckets(&buckets, 0.99),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the run counters
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub frames_total: u64,
    pub empty_frames_total: u64,
    pub detections_observed: u64,
    pub detections_filtered: u64,
    pub lines_read: u64,
    pub tracks: usize,
    pub frames_per_sec: f64,
    pub avg_frame_latency_us: u64,
    pub max_frame_latency_us: u64,
    pub lat_p50_us: u64,
    pub lat_p95_us: u64,
    pub lat_p99_us: u64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            frames = %self.frames_total,
            empty_frames = %self.empty_frames_total,
            detections = %self.detections_observed,
            filtered = %self.detections_filtered,
            tracks = %self.tracks,
            frames_per_sec = format!("{:.1}", self.frames_per_sec),
            avg_latency_us = %self.avg_frame_latency_us,
            max_latency_us = %self.max_frame_latency_us,
            p50_us = %self.lat_p50_us,
            p95_us = %self.lat_p95_us,
            p99_us = %self.lat_p99_us,
            "metrics"
        );
    }
}
