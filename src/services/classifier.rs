//! End-of-stream per-track judgments
//!
//! - `is_stationary`: first and last observed boxes overlap or touch
//! - `zones_visited`: every zone that contained the footprint at any frame
//!
//! The stationary check ignores everything between the first and last
//! observation. An object that drives off and comes back to the same spot
//! is reported as stationary.

use crate::domain::geometry::boxes_intersect;
use crate::domain::types::ZoneId;
use crate::domain::zones::ZoneRegistry;
use crate::services::aggregator::TrackHistory;
use std::collections::BTreeSet;

/// Whether the first and last observed boxes intersect
///
/// Boxes are compared in the tracker's raw `x, y, w, h` form, anchored at
/// `x`/`y`. Returns `false` for a history with no observations.
pub fn is_stationary(history: &TrackHistory) -> bool {
    match (history.first_box(), history.last_box()) {
        (Some(first), Some(last)) => boxes_intersect(first, last).found,
        _ => false,
    }
}

/// Sorted, de-duplicated ids of every zone the footprint point entered
pub fn zones_visited(history: &TrackHistory, zones: &ZoneRegistry) -> Vec<ZoneId> {
    let mut visited: BTreeSet<&ZoneId> = BTreeSet::new();
    for bbox in history.boxes() {
        visited.extend(zones.zones_containing(bbox.footprint()));
    }
    visited.into_iter().cloned().collect()
}
