//! Geometry helpers for box overlap and polygon containment
//!
//! Pure functions with no state. Polygon containment is boundary-inclusive:
//! a point lying on an edge or a vertex counts as contained.

use crate::domain::types::{BoundingBox, Point};

/// Tolerance for treating a point as lying on a polygon edge
const EDGE_EPSILON: f64 = 1e-9;

/// Result of intersecting two boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Whether the boxes overlap or touch
    pub found: bool,
    /// Overlap rectangle anchored at its `x`/`y` corner.
    /// Width or height is negative when `found` is false.
    pub rect: BoundingBox,
}

/// Intersect two boxes, both anchored at their `x`/`y` corner
///
/// Boxes that only share an edge (zero-width or zero-height overlap)
/// count as intersecting.
pub fn boxes_intersect(a: &BoundingBox, b: &BoundingBox) -> Overlap {
    let x = a.x.max(b.x);
    let y = a.y.max(b.y);
    let width = (a.x + a.width).min(b.x + b.width) - x;
    let height = (a.y + a.height).min(b.y + b.height) - y;

    let found = !(width < 0.0 || height < 0.0);

    Overlap { found, rect: BoundingBox::new(x, y, width, height) }
}

/// Test whether `point` lies inside or on the boundary of `ring`
///
/// `ring` may be open or closed (first vertex repeated last). Rings with
/// fewer than three vertices contain nothing.
pub fn point_in_polygon(point: Point, ring: &[Point]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];

        if on_segment(point, a, b) {
            return true;
        }

        // Even-odd ray cast towards +x
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Absolute area enclosed by `ring` (shoelace formula)
///
/// `ring` may be open or closed. Self-intersecting rings report the net
/// signed area, so a figure-eight with equal lobes comes out as zero.
pub fn polygon_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }

    let mut twice_area = 0.0;
    let mut j = n - 1;
    for i in 0..n {
        twice_area += (ring[j].x - ring[i].x) * (ring[j].y + ring[i].y);
        j = i;
    }
    (twice_area / 2.0).abs()
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let scale = (b.x - a.x).abs().max((b.y - a.y).abs()).max(1.0);
    if cross.abs() > EDGE_EPSILON * scale {
        return false;
    }

    p.x >= a.x.min(b.x) - EDGE_EPSILON
        && p.x <= a.x.max(b.x) + EDGE_EPSILON
        && p.y >= a.y.min(b.y) - EDGE_EPSILON
        && p.y <= a.y.max(b.y) + EDGE_EPSILON
}
