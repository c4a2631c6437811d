//! Named zone polygons and membership queries
//!
//! The registry is built once before streaming starts and never changes.
//! Zone counts are small, so `zones_containing` is a plain linear scan.

use crate::domain::geometry::{point_in_polygon, polygon_area};
use crate::domain::types::{Point, ZoneId};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use thiserror::Error;

/// Fatal zone configuration problems, raised before any frame is processed
#[derive(Debug, Error, PartialEq)]
pub enum ZoneError {
    #[error("zone id must not be empty")]
    EmptyId,

    #[error("zone {id} has {vertices} distinct vertices, need at least 3")]
    TooFewVertices { id: ZoneId, vertices: usize },

    #[error("zone {id} encloses no area")]
    ZeroArea { id: ZoneId },

    #[error("zone {id} has a non-finite vertex at index {index}")]
    NonFiniteVertex { id: ZoneId, index: usize },

    #[error("zone {0} is defined more than once")]
    DuplicateId(ZoneId),
}

/// Rings enclosing less than this many square pixels are rejected
const AREA_EPSILON: f64 = 1e-9;

fn distinct_vertices(ring: &[Point]) -> usize {
    let mut keys: Vec<(u64, u64)> =
        ring.iter().map(|p| ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())).collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}

/// A named polygon in image coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    id: ZoneId,
    /// Closed ring: the first vertex is repeated as the last
    ring: Vec<Point>,
}

impl Zone {
    /// Validate and close a polygon
    pub fn new(id: ZoneId, vertices: Vec<Point>) -> Result<Self, ZoneError> {
        if id.as_str().is_empty() {
            return Err(ZoneError::EmptyId);
        }

        if let Some(index) = vertices.iter().position(|p| !p.is_finite()) {
            return Err(ZoneError::NonFiniteVertex { id, index });
        }

        let mut ring = vertices;
        ring.dedup();
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        let distinct = distinct_vertices(&ring);
        if distinct < 3 {
            return Err(ZoneError::TooFewVertices { id, vertices: distinct });
        }
        if polygon_area(&ring) <= AREA_EPSILON {
            return Err(ZoneError::ZeroArea { id });
        }

        ring.push(ring[0]);
        Ok(Self { id, ring })
    }

    pub fn id(&self) -> &ZoneId {
        &self.id
    }

    pub fn ring(&self) -> &[Point] {
        &self.ring
    }

    pub fn contains(&self, point: Point) -> bool {
        point_in_polygon(point, &self.ring)
    }
}

/// Immutable set of zones, iterated in zone id order
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: BTreeMap<ZoneId, Zone>,
}

impl ZoneRegistry {
    /// Build a registry from `(id, vertices)` pairs, rejecting duplicate ids
    pub fn from_polygons<I>(polygons: I) -> Result<Self, ZoneError>
    where
        I: IntoIterator<Item = (ZoneId, Vec<Point>)>,
    {
        let mut zones = BTreeMap::new();
        for (id, vertices) in polygons {
            if zones.contains_key(&id) {
                return Err(ZoneError::DuplicateId(id));
            }
            let zone = Zone::new(id.clone(), vertices)?;
            zones.insert(id, zone);
        }
        Ok(Self { zones })
    }

    /// Ids of every zone containing `point`, in ascending order
    pub fn zones_containing(&self, point: Point) -> SmallVec<[&ZoneId; 4]> {
        self.zones.values().filter(|zone| zone.contains(point)).map(Zone::id).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Zone> {
        self.zones.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ZoneId> {
        self.zones.keys()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
