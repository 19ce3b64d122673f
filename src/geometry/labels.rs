//! Where to put text next to geometry.
//!
//! Each function picks a fixed pixel offset from a small table keyed on the
//! orientation of the relevant vector. Offsets are in view pixels.

use super::Point2;
use crate::config::EngineConfig;

/// Index label: up and to the right of the point.
pub fn index_label_position(point: Point2, config: &EngineConfig) -> Point2 {
    let shift = config.index_shifting;
    Point2::new(point.x + shift, point.y - shift)
}

/// Distance label for segment AB, anchored at `anchor` (usually the midpoint).
///
/// | AB orientation          | offset      |
/// |-------------------------|-------------|
/// | vertical                | (+d, 0)     |
/// | horizontal              | (0, −d)     |
/// | falling left-to-right   | (+d, +d)    |
/// | otherwise               | (+d, −d)    |
pub fn distance_label_position(a: Point2, b: Point2, anchor: Point2, config: &EngineConfig) -> Point2 {
    let eps = config.eps;
    let d = config.distance_shifting;

    if (a.x - b.x).abs() < eps {
        return Point2::new(anchor.x + d, anchor.y);
    }
    if (a.y - b.y).abs() < eps {
        return Point2::new(anchor.x, anchor.y - d);
    }
    if (a.x - b.x) * (a.y - b.y) < 0.0 {
        return Point2::new(anchor.x + d, anchor.y + d);
    }
    Point2::new(anchor.x + d, anchor.y - d)
}

/// Degree label for an angle with vertex `vertex`, anchored at the arc
/// midpoint `arc_mid`. Labels to the left get the wider shift so the text
/// clears the arc.
pub fn degree_label_position(vertex: Point2, arc_mid: Point2, config: &EngineConfig) -> Point2 {
    let eps = config.eps;
    let base = config.degree_shifting_base;
    let more = config.degree_shifting_more;
    let (a, b) = (vertex, arc_mid);

    let same_x = (a.x - b.x).abs() < eps;
    let same_y = (a.y - b.y).abs() < eps;
    let above = a.y > b.y + eps;
    let below = a.y + eps < b.y;
    let left = a.x > b.x + eps;
    let right = a.x + eps < b.x;

    let (dx, dy) = if above && same_x {
        (0.0, -base)
    } else if below && same_x {
        (0.0, base)
    } else if left && same_y {
        (-more, 0.0)
    } else if right && same_y {
        (base, 0.0)
    } else if right && above {
        (base, -base)
    } else if left && above {
        (-more, -base)
    } else if left && below {
        (-more, base)
    } else {
        (base, base)
    };

    Point2::new(b.x + dx, b.y + dy)
}
