//! Detection stream reader
//!
//! Reads JSON Lines, one frame per line, and forwards each frame to the
//! pipeline over a bounded channel. The reader stops at the first line that
//! does not parse: a malformed record fails the whole run.

use crate::domain::types::FrameDetections;
use crate::infra::metrics::Metrics;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("failed to open detection stream {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read detection stream: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed detection record on line {line}: {source}")]
    Malformed {
        line: u64,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse one line of the stream. Blank lines yield `None`.
pub fn parse_line(line_no: u64, line: &str) -> Result<Option<FrameDetections>, DetectionError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| DetectionError::Malformed { line: line_no, source })
}

/// Forward every frame from `reader` to `frame_tx`
///
/// Returns the number of frames sent. Dropping the sender on return is what
/// tells the pipeline the stream is exhausted.
pub async fn stream_detections<R>(
    reader: R,
    frame_tx: mpsc::Sender<FrameDetections>,
    metrics: Arc<Metrics>,
) -> Result<u64, DetectionError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0u64;
    let mut frames_sent = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        metrics.record_line_read();

        let Some(frame) = parse_line(line_no, &line)? else {
            debug!(line = %line_no, "blank_line_skipped");
            continue;
        };

        if frame_tx.send(frame).await.is_err() {
            warn!(line = %line_no, "pipeline_closed_before_stream_end");
            break;
        }
        frames_sent += 1;
    }

    info!(lines = %line_no, frames = %frames_sent, "detection_stream_exhausted");
    Ok(frames_sent)
}

/// Open a JSONL detection file and stream it into `frame_tx`
pub async fn read_detection_file<P: AsRef<Path>>(
    path: P,
    frame_tx: mpsc::Sender<FrameDetections>,
    metrics: Arc<Metrics>,
) -> Result<u64, DetectionError> {
    let path = path.as_ref();
    let file = File::open(path)
        .await
        .map_err(|source| DetectionError::Open { path: path.display().to_string(), source })?;

    info!(path = %path.display(), "detection_stream_opened");
    stream_detections(BufReader::new(file), frame_tx, metrics).await
}
