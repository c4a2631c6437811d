//! IO modules - boundary adapters
//!
//! - `zone_file` - Zone JSON loading and validation
//! - `detections` - JSONL detection stream reader
//! - `report_writer` - Final report document output

pub mod detections;
pub mod report_writer;
pub mod zone_file;

pub use detections::{read_detection_file, stream_detections, DetectionError};
pub use report_writer::ReportWriter;
pub use zone_file::{load_zones, parse_zones};
