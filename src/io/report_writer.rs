//! Report egress - writes the final report document to file
//!
//! The report is written once, as pretty-printed JSON, replacing any
//! existing file at the target path.

use crate::domain::report::Report;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writer for the end-of-stream report
pub struct ReportWriter {
    file_path: PathBuf,
}

impl ReportWriter {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        info!(file_path = %file_path.display(), "report_writer_initialized");
        Self { file_path }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Serialize and write `report`, creating parent directories as needed
    pub fn write_report(&self, report: &Report) -> anyhow::Result<()> {
        let json = report.to_json_pretty().context("Failed to serialize report")?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create report directory {}", parent.display())
                })?;
            }
        }

        fs::write(&self.file_path, &json).with_context(|| {
            format!("Failed to write report file {}", self.file_path.display())
        })?;
        debug!(file = %self.file_path.display(), bytes = %json.len(), "report_bytes_written");

        info!(
            file = %self.file_path.display(),
            objects = %report.objects.len(),
            total_stationary = %report.total_stationary,
            has_only_stationary = %report.has_only_stationary,
            has_detected_in_zones = %report.has_detected_in_zones,
            "report_written"
        );
        Ok(())
    }
}
