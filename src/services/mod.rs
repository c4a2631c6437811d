//! Services - stateful bookkeeping and end-of-stream analysis
//!
//! - `aggregator` - Per-track position trail and box history
//! - `classifier` - Stationary verdict and visited-zone resolution
//! - `report_builder` - Folds per-track verdicts into the final report
//! - `pipeline` - Streaming/Finalizing state machine that owns the aggregator

pub mod aggregator;
pub mod classifier;
pub mod pipeline;
pub mod report_builder;

pub use aggregator::{TrackAggregator, TrackHistory};
pub use pipeline::Pipeline;
pub use report_builder::{build_report, ReportBuilder};
