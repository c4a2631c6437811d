//! Shared types for the zone checker

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Newtype wrapper for tracker-assigned identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct TrackId(pub i64);

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for zone names from the zone file
///
/// Ordering is plain lexicographic string ordering, which is what
/// reported zone lists are sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ZoneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A point in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A bounding box as delivered by the tracker: `x`/`y` are the box center
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Center point, used for the bounded visualization trail
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Bottom-center point, the object's ground contact used for zone tests
    #[inline]
    pub fn footprint(&self) -> Point {
        Point::new(self.x, self.y + 0.5 * self.height)
    }
}

/// One tracked object in one frame, as produced by the external tracker
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub track_id: TrackId,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    /// Detector class, when the upstream model reports one
    #[serde(default)]
    pub class_id: Option<u32>,
}

impl Detection {
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.center_x, self.center_y, self.width, self.height)
    }
}

/// All detections for a single frame
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FrameDetections {
    /// Frame number, if the producer numbered its frames
    #[serde(default)]
    pub frame: Option<u64>,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl FrameDetections {
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}
