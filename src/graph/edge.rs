//! Edge input records and side annotation.
//!
//! Edges connect node identifiers. Structural edges define the
//! parent→child hierarchy; transactional edges contribute to connectivity
//! and grouping but never to depth. Parallel transactional multi-edges
//! between the same pair are allowed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::node::Point;

/// Classification of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Hierarchy-defining edge (parent owns/contains child). Directed.
    Structural,
    /// Non-hierarchical relationship (transfers, fees, referrals).
    Transactional,
    /// Untyped edge; treated as generic adjacency for partitioning.
    #[default]
    #[serde(other)]
    Generic,
}

/// Caller-supplied edge record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutEdge {
    /// Unique identifier.
    pub id: String,
    /// Source node id. For structural edges, the parent.
    pub source: String,
    /// Target node id. For structural edges, the child.
    pub target: String,
    /// Edge classification.
    #[serde(default, rename = "edgeType")]
    pub kind: EdgeKind,
}

impl LayoutEdge {
    /// Create a new edge.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        kind: EdgeKind,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

/// Which side of a node's box an edge visually attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachSide {
    /// Left side of the box.
    Left,
    /// Right side of the box.
    Right,
    /// Top side of the box.
    Top,
    /// Bottom side of the box.
    Bottom,
}

/// An edge annotated with the side each endpoint connects to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidedEdge {
    /// Original edge id.
    pub id: String,
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Side of the source box the edge leaves from.
    #[serde(rename = "sourceSide")]
    pub source_side: AttachSide,
    /// Side of the target box the edge arrives at.
    #[serde(rename = "targetSide")]
    pub target_side: AttachSide,
}

/// Derive per-endpoint attachment sides from endpoint displacement.
///
/// The dominant axis of displacement decides: `|dx| >= |dy|` picks a
/// horizontal side (right on the source when the target lies to the right),
/// otherwise a vertical side. Edges with an endpoint missing from the
/// position map are skipped.
pub fn annotate_sides(edges: &[LayoutEdge], positions: &HashMap<String, Point>) -> Vec<SidedEdge> {
    edges
        .iter()
        .filter_map(|edge| {
            let from = positions.get(&edge.source)?;
            let to = positions.get(&edge.target)?;
            let dx = to.x - from.x;
            let dy = to.y - from.y;

            let (source_side, target_side) = if dx.abs() >= dy.abs() {
                if dx >= 0.0 {
                    (AttachSide::Right, AttachSide::Left)
                } else {
                    (AttachSide::Left, AttachSide::Right)
                }
            } else if dy >= 0.0 {
                (AttachSide::Bottom, AttachSide::Top)
            } else {
                (AttachSide::Top, AttachSide::Bottom)
            };

            Some(SidedEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                source_side,
                target_side,
            })
        })
        .collect()
}
