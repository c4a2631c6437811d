//! Per-track history aggregation
//!
//! Every observed track id gets a `TrackHistory` holding two records:
//! - `positions`: the last `trail_length` box centers (visualization trail)
//! - `boxes`: every observed box, never truncated (used for all analysis)
//!
//! Histories are created on first sighting and live until the stream ends.
//! Iteration order is first-sighting order.

use crate::domain::types::{BoundingBox, Point, TrackId};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use tracing::debug;

/// Default length of the bounded position trail
pub const DEFAULT_TRAIL_LENGTH: usize = 30;

/// Observation history for a single track id
#[derive(Debug, Clone)]
pub struct TrackHistory {
    track_id: TrackId,
    positions: VecDeque<Point>,
    boxes: Vec<BoundingBox>,
    trail_length: usize,
}

impl TrackHistory {
    fn new(track_id: TrackId, trail_length: usize) -> Self {
        Self {
            track_id,
            positions: VecDeque::with_capacity(trail_length),
            boxes: Vec::new(),
            trail_length,
        }
    }

    /// Record one observation
    pub fn push(&mut self, bbox: BoundingBox) {
        self.boxes.push(bbox);

        self.positions.push_back(bbox.center());
        while self.positions.len() > self.trail_length {
            self.positions.pop_front();
        }
    }

    pub fn track_id(&self) -> TrackId {
        self.track_id
    }

    /// Most recent centers, oldest first
    pub fn positions(&self) -> &VecDeque<Point> {
        &self.positions
    }

    /// Every observed box in observation order
    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn first_box(&self) -> Option<&BoundingBox> {
        self.boxes.first()
    }

    pub fn last_box(&self) -> Option<&BoundingBox> {
        self.boxes.last()
    }

    pub fn observations(&self) -> usize {
        self.boxes.len()
    }
}

/// Collects track histories while frames stream in
pub struct TrackAggregator {
    /// track_id -> index into `histories`
    index: FxHashMap<TrackId, usize>,
    /// Histories in first-sighting order
    histories: Vec<TrackHistory>,
    trail_length: usize,
}

impl TrackAggregator {
    pub fn new() -> Self {
        Self::with_trail_length(DEFAULT_TRAIL_LENGTH)
    }

    /// Create an aggregator with a custom trail length (minimum 1)
    pub fn with_trail_length(trail_length: usize) -> Self {
        Self {
            index: FxHashMap::default(),
            histories: Vec::new(),
            trail_length: trail_length.max(1),
        }
    }

    /// Get the history for `track_id`, creating an empty one on first sighting
    pub fn get_or_create(&mut self, track_id: TrackId) -> &mut TrackHistory {
        let idx = match self.index.get(&track_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.histories.len();
                self.histories.push(TrackHistory::new(track_id, self.trail_length));
                self.index.insert(track_id, idx);
                debug!(track_id = %track_id, "track_created");
                idx
            }
        };
        &mut self.histories[idx]
    }

    /// Append one observation of `track_id`
    pub fn observe(&mut self, track_id: TrackId, bbox: BoundingBox) {
        self.get_or_create(track_id).push(bbox);
    }

    pub fn get(&self, track_id: TrackId) -> Option<&TrackHistory> {
        self.index.get(&track_id).map(|&idx| &self.histories[idx])
    }

    /// All histories in first-sighting order
    pub fn histories(&self) -> impl Iterator<Item = &TrackHistory> {
        self.histories.iter()
    }

    pub fn track_count(&self) -> usize {
        self.histories.len()
    }

    pub fn trail_length(&self) -> usize {
        self.trail_length
    }
}

impl Default for TrackAggregator {
    fn default() -> Self {
        Self::new()
    }
}
