//! Configuration loading from TOML files
//!
//! Every section and key is optional; missing values fall back to the
//! defaults below. The zone file path can be overridden from the CLI.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct ZonesConfig {
    /// Zone JSON file (zone id -> list of [x, y] vertices)
    #[serde(default = "default_zones_file")]
    pub file: String,
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self { file: default_zones_file() }
    }
}

fn default_zones_file() -> String {
    "config/zones.json".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    /// Number of recent centers kept per track
    #[serde(default = "default_trail_length")]
    pub trail_length: usize,
    /// Detector class ids to keep (empty keeps everything)
    #[serde(default)]
    pub classes: Vec<u32>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self { trail_length: default_trail_length(), classes: Vec::new() }
    }
}

fn default_trail_length() -> usize {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Frame batches buffered between the reader and the aggregator
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { channel_capacity: default_channel_capacity() }
    }
}

fn default_channel_capacity() -> usize {
    256
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Log a metrics summary every N frames (0 to disable)
    #[serde(default = "default_progress_every_frames")]
    pub progress_every_frames: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { progress_every_frames: default_progress_every_frames() }
    }
}

fn default_progress_every_frames() -> u64 {
    500
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub zones: ZonesConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    zones_file: String,
    trail_length: usize,
    classes: Vec<u32>,
    channel_capacity: usize,
    progress_every_frames: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            zones_file: toml_config.zones.file,
            trail_length: toml_config.tracking.trail_length,
            classes: toml_config.tracking.classes,
            channel_capacity: toml_config.pipeline.channel_capacity,
            progress_every_frames: toml_config.metrics.progress_every_frames,
            config_file,
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if toml_config.tracking.trail_length == 0 {
            bail!("tracking.trail_length must be at least 1 in {}", path.display());
        }
        if toml_config.pipeline.channel_capacity == 0 {
            bail!("pipeline.channel_capacity must be at least 1 in {}", path.display());
        }

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration from `path`, falling back to defaults on any error
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{:#}", e), "config_load_failed_using_defaults");
                Self::default()
            }
        }
    }

    /// Whether a detection with this class should be aggregated
    pub fn accepts_class(&self, class_id: Option<u32>) -> bool {
        if self.classes.is_empty() {
            return true;
        }
        class_id.is_some_and(|c| self.classes.contains(&c))
    }

    pub fn zones_file(&self) -> &str {
        &self.zones_file
    }

    pub fn trail_length(&self) -> usize {
        self.trail_length
    }

    pub fn classes(&self) -> &[u32] {
        &self.classes
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    pub fn progress_every_frames(&self) -> u64 {
        self.progress_every_frames
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Override the zone file path (CLI flag)
    pub fn with_zones_file(mut self, zones_file: impl Into<String>) -> Self {
        self.zones_file = zones_file.into();
        self
    }

    /// Override the class filter
    pub fn with_classes(mut self, classes: Vec<u32>) -> Self {
        self.classes = classes;
        self
    }

    /// Builder method for tests to set the trail length
    pub fn with_trail_length(mut self, trail_length: usize) -> Self {
        self.trail_length = trail_length;
        self
    }
}
