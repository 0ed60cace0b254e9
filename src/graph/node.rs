//! Node input records and related types.
//!
//! A [`LayoutNode`] is the caller-supplied description of one graph vertex:
//! - A unique string identifier
//! - Semantic size (radius, or explicit width/height)
//! - An optional role tag used to infer hierarchy roots
//! - An optional locked flag plus caller-authoritative position

use serde::{Deserialize, Serialize};

/// Diameter used for nodes that carry no size information.
pub const DEFAULT_EXTENT: f64 = 36.0;

/// A point in the shared center-origin Cartesian plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Semantic role of a node within the advisory hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Root of a per-advisor subtree; used as a grouping anchor.
    Advisor,
    /// Client owned by an advisor.
    Client,
    /// Portfolio owned by a client.
    Portfolio,
    /// Account held under a portfolio.
    Account,
    /// Anything else (counterparties, custodians, untagged nodes).
    Other,
}

impl NodeRole {
    /// Parse a role tag. Unrecognized tags map to [`NodeRole::Other`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "advisor" => Self::Advisor,
            "client" => Self::Client,
            "portfolio" => Self::Portfolio,
            "account" => Self::Account,
            _ => Self::Other,
        }
    }
}

/// Caller-supplied node record.
///
/// Positions are inputs only for locked nodes; for everything else the
/// solvers treat them as hints (expand controller, identity fallback).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutNode {
    /// Unique identifier.
    pub id: String,
    /// Human-meaningful display name; preferred stable sort key when present.
    #[serde(default)]
    pub label: Option<String>,
    /// Explicit width, in canvas units.
    #[serde(default)]
    pub width: Option<f64>,
    /// Explicit height, in canvas units.
    #[serde(default)]
    pub height: Option<f64>,
    /// Radius for circular nodes; ignored when width/height are given.
    #[serde(default)]
    pub size: Option<f64>,
    /// Business role tag ("advisor", "client", "portfolio", "account", ...).
    #[serde(default)]
    pub role: Option<String>,
    /// When true (and a position is present), the position is authoritative
    /// and must never be overwritten by any solver.
    #[serde(default)]
    pub locked: bool,
    /// Current position, if the node has been placed before.
    #[serde(default)]
    pub position: Option<Point>,
}

impl LayoutNode {
    /// Minimal node with just an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            width: None,
            height: None,
            size: None,
            role: None,
            locked: false,
            position: None,
        }
    }

    /// Parsed role tag.
    pub fn node_role(&self) -> NodeRole {
        self.role
            .as_deref()
            .map(NodeRole::from_tag)
            .unwrap_or(NodeRole::Other)
    }

    /// Stable sort key: the label when present, else the id, lower-cased.
    ///
    /// All deterministic orderings (component enumeration, BFS neighbor
    /// visitation, grouping anchors) derive from this key.
    pub fn stable_key(&self) -> String {
        self.label.as_deref().unwrap_or(&self.id).to_lowercase()
    }

    /// Half extents (half-width, half-height) of the node's bounding box.
    pub fn half_extents(&self) -> (f64, f64) {
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w / 2.0, h / 2.0),
            (Some(w), None) => (w / 2.0, w / 2.0),
            (None, Some(h)) => (h / 2.0, h / 2.0),
            (None, None) => {
                let r = self.size.unwrap_or(DEFAULT_EXTENT / 2.0);
                (r, r)
            }
        }
    }

    /// Largest side of the bounding box (`max(width, height)`).
    pub fn extent_max(&self) -> f64 {
        let (hw, hh) = self.half_extents();
        hw.max(hh) * 2.0
    }

    /// True when the node's position is caller-authoritative.
    ///
    /// A locked flag without a position is degenerate input; such nodes are
    /// treated as unlocked so they still receive coordinates.
    pub fn is_effectively_locked(&self) -> bool {
        self.locked && self.position.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(NodeRole::from_tag("advisor"), NodeRole::Advisor);
        assert_eq!(NodeRole::from_tag("Advisor"), NodeRole::Advisor);
        assert_eq!(NodeRole::from_tag("CLIENT"), NodeRole::Client);
        assert_eq!(NodeRole::from_tag("custodian"), NodeRole::Other);
    }

    #[test]
    fn test_stable_key_prefers_label() {
        let mut node = LayoutNode::new("n-42");
        assert_eq!(node.stable_key(), "n-42");

        node.label = Some("Alice Advisor".to_string());
        assert_eq!(node.stable_key(), "alice advisor");
    }

    #[test]
    fn test_half_extents_from_size() {
        let mut node = LayoutNode::new("a");
        assert_eq!(
            node.half_extents(),
            (DEFAULT_EXTENT / 2.0, DEFAULT_EXTENT / 2.0)
        );

        node.size = Some(30.0);
        assert_eq!(node.half_extents(), (30.0, 30.0));
        assert_eq!(node.extent_max(), 60.0);
    }

    #[test]
    fn test_half_extents_from_box() {
        let mut node = LayoutNode::new("a");
        node.width = Some(80.0);
        node.height = Some(40.0);
        assert_eq!(node.half_extents(), (40.0, 20.0));
        assert_eq!(node.extent_max(), 80.0);
    }

    #[test]
    fn test_locked_without_position_is_not_locked() {
        let mut node = LayoutNode::new("a");
        node.locked = true;
        assert!(!node.is_effectively_locked());

        node.position = Some(Point::new(1.0, 2.0));
        assert!(node.is_effectively_locked());
    }
}
