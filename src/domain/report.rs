//! Final report data model
//!
//! Field names and order serialize exactly as downstream consumers expect:
//! `objects`, `totalStationary`, `hasOnlyStationary`, `hasDetectedInZones`.

use crate::domain::types::{TrackId, ZoneId};
use serde::Serialize;

/// Verdict for a single tracked object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectResult {
    pub id: TrackId,
    /// Zones visited at any observed frame, strictly ascending
    pub detected_zones: Vec<ZoneId>,
    pub is_stationary: bool,
}

impl ObjectResult {
    #[inline]
    pub fn in_zones(&self) -> bool {
        !self.detected_zones.is_empty()
    }
}

/// Aggregate result for a whole stream
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// One entry per track, in first-sighting order
    pub objects: Vec<ObjectResult>,
    /// Zone-visiting objects that are stationary
    pub total_stationary: u64,
    /// `total_stationary == total_in_zones`, which is also true when no
    /// object entered any zone
    pub has_only_stationary: bool,
    pub has_detected_in_zones: bool,
    /// Objects with at least one detected zone (not part of the document)
    #[serde(skip)]
    pub total_in_zones: u64,
}

impl Report {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
