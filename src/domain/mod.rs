//! Domain models - pure types and geometry with no I/O
//!
//! - `types` - Track and zone identifiers, points, boxes, detections
//! - `geometry` - Box overlap and point-in-polygon tests
//! - `zones` - Validated zone polygons and the zone registry
//! - `report` - Per-object results and the final report document

pub mod geometry;
pub mod report;
pub mod types;
pub mod zones;

pub use report::{ObjectResult, Report};
pub use types::{BoundingBox, Detection, FrameDetections, Point, TrackId, ZoneId};
pub use zones::{Zone, ZoneError, ZoneRegistry};
