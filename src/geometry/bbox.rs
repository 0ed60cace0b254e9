//! Axis-aligned bounding boxes and overlap tests.

use crate::graph::node::Point;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Minimum x.
    pub min_x: f64,
    /// Minimum y.
    pub min_y: f64,
    /// Maximum x.
    pub max_x: f64,
    /// Maximum y.
    pub max_y: f64,
}

impl Rect {
    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Length of the diagonal.
    pub fn diagonal(&self) -> f64 {
        (self.width() * self.width() + self.height() * self.height()).sqrt()
    }

    /// True when this rectangle, inflated by `padding` on every side,
    /// intersects `other` inflated the same way.
    pub fn intersects_padded(&self, other: &Rect, padding: f64) -> bool {
        self.min_x - padding < other.max_x + padding
            && other.min_x - padding < self.max_x + padding
            && self.min_y - padding < other.max_y + padding
            && other.min_y - padding < self.max_y + padding
    }
}

/// Minimal axis-aligned rectangle covering all given node centers inflated
/// by their half extents.
///
/// Empty input yields the degenerate all-zero box — never NaN or infinity.
pub fn bounding_box(items: &[(Point, (f64, f64))]) -> Rect {
    if items.is_empty() {
        return Rect::default();
    }

    let mut rect = Rect {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for &(center, (hw, hh)) in items {
        rect.min_x = rect.min_x.min(center.x - hw);
        rect.min_y = rect.min_y.min(center.y - hh);
        rect.max_x = rect.max_x.max(center.x + hw);
        rect.max_y = rect.max_y.max(center.y + hh);
    }
    rect
}

/// Separated-axis overlap test for two padded boxes given as center plus
/// half extents: overlap iff `|dx| < hwA + hwB + pad` AND
/// `|dy| < hhA + hhB + pad`.
pub fn boxes_overlap(
    pos_a: Point,
    half_a: (f64, f64),
    pos_b: Point,
    half_b: (f64, f64),
    padding: f64,
) -> bool {
    let dx = (pos_a.x - pos_b.x).abs();
    let dy = (pos_a.y - pos_b.y).abs();
    dx < half_a.0 + half_b.0 + padding && dy < half_a.1 + half_b.1 + padding
}
