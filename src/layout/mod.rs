//! Layout solvers and the shared output type.

pub mod expand;
pub mod grouping;
pub mod layered;
pub mod radial;
pub mod run;

use std::collections::HashMap;

use crate::graph::node::Point;
use crate::graph::snapshot::GraphSnapshot;

pub use expand::{compute_all, expand_children, ExpandConfig, ExpandMode};
pub use grouping::{resolve_groups, AdvisorGroup};
pub use layered::{compute_grouped_layout, compute_layered_layout, LayeredConfig};
pub use radial::{compute_radial, compute_radial_layout, RadialConfig, RadialResult};
pub use run::{RunToken, RunTracker};

/// Final position per node id.
pub type PositionMap = HashMap<String, Point>;

/// Fallback layout: every node keeps its current position, nodes without
/// one sit at the origin. Used when the layered adapter fails.
pub fn identity_layout(snapshot: &GraphSnapshot) -> PositionMap {
    snapshot
        .nodes()
        .iter()
        .map(|n| (n.id.clone(), n.position.unwrap_or_default()))
        .collect()
}

/// Locked nodes' caller positions, verbatim. Every solver entry point
/// seeds its output with this map so locked positions are never computed,
/// only echoed.
pub fn locked_passthrough(snapshot: &GraphSnapshot) -> PositionMap {
    snapshot
        .nodes()
        .iter()
        .filter(|n| n.locked)
        .filter_map(|n| n.position.map(|p| (n.id.clone(), p)))
        .collect()
}
