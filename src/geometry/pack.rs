//! Circle packing on a golden-angle spiral.
//!
//! Places a designated center circle at the origin and every other circle
//! (largest first) along a sunflower spiral, advancing until a slot clear
//! of all already-placed circles is found. Used to pack disconnected
//! components and advisor groups onto one canvas.

use std::collections::HashMap;

use crate::graph::node::Point;

/// Attempt bound for the spiral walk. If a circle exhausts the bound it is
/// placed at the last tested position — best effort, overlap not guaranteed
/// to be resolved.
const MAX_SPIRAL_ATTEMPTS: u32 = 20_000;

/// Golden angle in radians: `(3 - sqrt(5)) * pi`.
const GOLDEN_ANGLE: f64 = (3.0 - 2.236_067_977_499_79) * std::f64::consts::PI;

/// A circle to pack, keyed by an opaque id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Caller-chosen key (component index, group index, ...).
    pub id: usize,
    /// Radius; clamped to a small positive value when non-positive.
    pub radius: f64,
}

impl Circle {
    /// Create a new circle.
    pub fn new(id: usize, radius: f64) -> Self {
        Self { id, radius }
    }
}

/// Pack circles around the origin.
///
/// The circle matching `center_id` (or the largest circle when `None`)
/// goes to the origin; the rest are placed largest-first on the spiral
/// (`angle = k * (3 - sqrt(5)) * pi`, `radius = step * sqrt(k)`), taking
/// the first position whose center distance to every placed circle is at
/// least the sum of radii.
pub fn pack_circles(circles: &[Circle], center_id: Option<usize>) -> HashMap<usize, Point> {
    let mut result = HashMap::with_capacity(circles.len());
    if circles.is_empty() {
        return result;
    }

    let sanitized: Vec<Circle> = circles
        .iter()
        .map(|c| Circle::new(c.id, c.radius.max(1.0)))
        .collect();

    let center = match center_id.and_then(|id| sanitized.iter().find(|c| c.id == id)) {
        Some(c) => *c,
        None => *sanitized
            .iter()
            .max_by(|a, b| a.radius.total_cmp(&b.radius))
            .unwrap_or(&sanitized[0]),
    };

    let mut placed: Vec<(Point, f64)> = vec![(Point::default(), center.radius)];
    result.insert(center.id, Point::default());

    let mut rest: Vec<Circle> = sanitized
        .iter()
        .filter(|c| c.id != center.id)
        .copied()
        .collect();
    rest.sort_by(|a, b| b.radius.total_cmp(&a.radius).then(a.id.cmp(&b.id)));

    let mean_radius = sanitized.iter().map(|c| c.radius).sum::<f64>() / sanitized.len() as f64;
    let step = (mean_radius * 0.5).max(1.0);

    for circle in rest {
        let mut position = Point::default();
        let mut found = false;

        for k in 1..=MAX_SPIRAL_ATTEMPTS {
            let angle = k as f64 * GOLDEN_ANGLE;
            let spiral_radius = step * (k as f64).sqrt();
            position = Point::new(spiral_radius * angle.cos(), spiral_radius * angle.sin());

            let clear = placed
                .iter()
                .all(|&(p, r)| position.distance(p) >= r + circle.radius);
            if clear {
                found = true;
                break;
            }
        }

        if !found {
            log::warn!(
                "circle packing exhausted {MAX_SPIRAL_ATTEMPTS} attempts for id {}; placing best-effort",
                circle.id
            );
        }

        placed.push((position, circle.radius));
        result.insert(circle.id, position);
    }

    result
}
