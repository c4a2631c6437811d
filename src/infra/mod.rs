//! Infrastructure - configuration and metrics
//!
//! - `config` - Application configuration (TOML loading, defaults)
//! - `metrics` - Lock-free run counters

pub mod config;
pub mod metrics;

pub use config::Config;
pub use metrics::{Metrics, MetricsSummary};
