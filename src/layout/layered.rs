//! Layered (hierarchical) layout adapter.
//!
//! An alternative to the radial solver for hierarchy-heavy graphs: nodes
//! are assigned to tiers over structural edges only (longest path from the
//! structural roots), orderings within a tier are refined by barycenter
//! sweeps, and coordinates are assigned with fixed in-layer and
//! between-layer spacing. Transactional and generic edges do not influence
//! tiers; they are drawn over whatever the hierarchy produces.
//!
//! Two entry points:
//! - [`compute_layered_layout`]: one hierarchy per connected component,
//!   components stacked vertically.
//! - [`compute_grouped_layout`]: one hierarchy per advisor group, group
//!   centers placed by circle packing with the first group at the origin.
//!
//! A graph with nodes but no structural edges has no hierarchy to derive
//! layers from; that returns [`LayoutError::NoStructuralEdges`] and callers
//! fall back to an identity layout.

use std::collections::{HashMap, HashSet};

use crate::error::LayoutError;
use crate::geometry::bbox::bounding_box;
use crate::geometry::pack::{pack_circles, Circle};
use crate::graph::edge::EdgeKind;
use crate::graph::node::Point;
use crate::graph::partition::connected_components;
use crate::graph::snapshot::GraphSnapshot;
use crate::layout::grouping::resolve_groups;
use crate::layout::{identity_layout, locked_passthrough, PositionMap};

/// Tunables for the layered adapter. All distances are canvas units.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Horizontal gap between adjacent nodes in one tier.
    pub in_layer_spacing: f64,
    /// Vertical gap between consecutive tiers.
    pub layer_spacing: f64,
    /// Extra width reserved per node so labels do not collide.
    pub label_buffer: f64,
    /// Gap between advisor-group (or component) bounding regions.
    pub group_gap: f64,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self {
            in_layer_spacing: 40.0,
            layer_spacing: 120.0,
            label_buffer: 60.0,
            group_gap: 80.0,
        }
    }
}

/// Barycenter refinement sweeps (down, up, down, up).
const ORDERING_SWEEPS: usize = 4;

/// Reserved drawing size for a node: labels extend horizontally, so width
/// reserves twice the extent plus the label buffer.
fn node_dimensions(snapshot: &GraphSnapshot, index: usize, config: &LayeredConfig) -> (f64, f64) {
    let extent = snapshot.node(index).extent_max();
    (extent * 2.0 + config.label_buffer, extent)
}

/// Layered layout over the whole snapshot, one hierarchy per connected
/// component, components stacked vertically with the group gap between.
pub fn compute_layered_layout(
    snapshot: &GraphSnapshot,
    config: &LayeredConfig,
) -> Result<PositionMap, LayoutError> {
    if snapshot.is_empty() {
        return Ok(PositionMap::new());
    }
    ensure_structural(snapshot)?;

    let mut positions = locked_passthrough(snapshot);
    let mut cursor_y = 0.0;
    for component in connected_components(snapshot) {
        let local = layer_members(snapshot, &component.members, config);
        let rect = member_rect(snapshot, &component.members, &local, config);

        let shift_y = cursor_y - rect.min_y;
        for (&index, point) in &local {
            positions.insert(
                snapshot.id(index).to_string(),
                Point::new(point.x, point.y + shift_y),
            );
        }
        cursor_y += rect.height() + config.group_gap;
    }
    Ok(positions)
}

/// Layered layout per advisor group: each group gets its own hierarchy
/// re-centered on its centroid, group centers are spread by circle packing
/// with the first group at the global origin. Nodes outside every group
/// keep their identity position.
pub fn compute_grouped_layout(
    snapshot: &GraphSnapshot,
    config: &LayeredConfig,
) -> Result<PositionMap, LayoutError> {
    if snapshot.is_empty() {
        return Ok(PositionMap::new());
    }
    ensure_structural(snapshot)?;

    let groups = resolve_groups(snapshot);
    if groups.is_empty() {
        return compute_layered_layout(snapshot, config);
    }

    // Ungrouped nodes fall back to identity so the output map stays complete
    let mut positions = identity_layout(snapshot);

    let mut locals: Vec<HashMap<usize, Point>> = Vec::with_capacity(groups.len());
    let mut circles: Vec<Circle> = Vec::with_capacity(groups.len());
    for (gi, group) in groups.iter().enumerate() {
        let mut local = layer_members(snapshot, &group.members, config);

        // Re-center on the group's centroid
        let n = local.len().max(1) as f64;
        let (sum_x, sum_y) = local
            .values()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        let (cx, cy) = (sum_x / n, sum_y / n);
        for point in local.values_mut() {
            point.x -= cx;
            point.y -= cy;
        }

        let rect = member_rect(snapshot, &group.members, &local, config);
        circles.push(Circle::new(gi, rect.diagonal() / 2.0 + config.group_gap));
        locals.push(local);
    }

    // First group anchors the global origin
    let placement = pack_circles(&circles, Some(0));
    for (gi, local) in locals.iter().enumerate() {
        let center = placement.get(&gi).copied().unwrap_or_default();
        for (&index, point) in local {
            positions.insert(
                snapshot.id(index).to_string(),
                Point::new(point.x + center.x, point.y + center.y),
            );
        }
    }
    Ok(positions)
}

fn ensure_structural(snapshot: &GraphSnapshot) -> Result<(), LayoutError> {
    let has_structural = snapshot
        .edges()
        .iter()
        .any(|e| e.kind == EdgeKind::Structural);
    if has_structural {
        Ok(())
    } else {
        Err(LayoutError::NoStructuralEdges)
    }
}

/// Lay out one member set in local coordinates (center origin per node).
///
/// Locked members are excluded from all placement; their caller positions
/// pass through untouched at the entry points. Tier assignment is
/// longest-path over structural edges restricted to the unlocked member
/// set; the pass count is bounded by the member count so structural cycles
/// terminate with stable tiers.
fn layer_members(
    snapshot: &GraphSnapshot,
    all_members: &[usize],
    config: &LayeredConfig,
) -> HashMap<usize, Point> {
    let members: Vec<usize> = all_members
        .iter()
        .copied()
        .filter(|&i| !snapshot.node(i).is_effectively_locked())
        .collect();
    let member_set: HashSet<usize> = members.iter().copied().collect();
    let mut tier: HashMap<usize, usize> = members.iter().map(|&i| (i, 0)).collect();

    for _ in 0..members.len() {
        let mut changed = false;
        for &parent in &members {
            let parent_tier = tier[&parent];
            for &child in snapshot.structural_children(parent) {
                if !member_set.contains(&child) {
                    continue;
                }
                if tier[&child] < parent_tier + 1 {
                    tier.insert(child, parent_tier + 1);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    let max_tier = tier.values().copied().max().unwrap_or(0);
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); max_tier + 1];
    for &i in &members {
        layers[tier[&i]].push(i);
    }
    for layer in &mut layers {
        layer.sort_unstable();
    }

    reduce_crossings(snapshot, &mut layers, &member_set);

    // Coordinate assignment: tiers stack downward, each tier centered
    // horizontally; positions are node centers.
    let mut positions: HashMap<usize, Point> = HashMap::with_capacity(members.len());
    let mut cursor_y = 0.0;
    for layer in &layers {
        let heights: Vec<f64> = layer
            .iter()
            .map(|&i| node_dimensions(snapshot, i, config).1)
            .collect();
        let row_height = heights.iter().copied().fold(0.0, f64::max);

        let total_width: f64 = layer
            .iter()
            .map(|&i| node_dimensions(snapshot, i, config).0)
            .sum::<f64>()
            + config.in_layer_spacing * (layer.len().saturating_sub(1)) as f64;

        let mut cursor_x = -total_width / 2.0;
        for &i in layer {
            let (w, h) = node_dimensions(snapshot, i, config);
            // Top-left cursor to node center
            positions.insert(
                i,
                Point::new(cursor_x + w / 2.0, cursor_y + (row_height - h) / 2.0 + h / 2.0),
            );
            cursor_x += w + config.in_layer_spacing;
        }
        cursor_y += row_height + config.layer_spacing;
    }
    positions
}

/// Barycenter crossing reduction: alternating downward and upward sweeps
/// reorder each tier by the mean in-tier position of structural neighbors
/// in the fixed adjacent tier. Nodes without neighbors keep their slot.
fn reduce_crossings(snapshot: &GraphSnapshot, layers: &mut [Vec<usize>], members: &HashSet<usize>) {
    if layers.len() < 2 {
        return;
    }
    for sweep in 0..ORDERING_SWEEPS {
        let downward = sweep % 2 == 0;
        let range: Vec<usize> = if downward {
            (1..layers.len()).collect()
        } else {
            (0..layers.len() - 1).rev().collect()
        };
        for li in range {
            let fixed = if downward { li - 1 } else { li + 1 };
            let slot: HashMap<usize, usize> = layers[fixed]
                .iter()
                .enumerate()
                .map(|(pos, &i)| (i, pos))
                .collect();

            let mut keyed: Vec<(f64, usize, usize)> = layers[li]
                .iter()
                .enumerate()
                .map(|(pos, &i)| {
                    let relevant = if downward {
                        snapshot.structural_parents(i)
                    } else {
                        snapshot.structural_children(i)
                    };
                    let slots: Vec<f64> = relevant
                        .iter()
                        .copied()
                        .filter(|n| members.contains(n))
                        .filter_map(|n| slot.get(&n))
                        .map(|&s| s as f64)
                        .collect();
                    let key = if slots.is_empty() {
                        pos as f64
                    } else {
                        slots.iter().sum::<f64>() / slots.len() as f64
                    };
                    (key, pos, i)
                })
                .collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            layers[li] = keyed.into_iter().map(|(_, _, i)| i).collect();
        }
    }
}

fn member_rect(
    snapshot: &GraphSnapshot,
    members: &[usize],
    local: &HashMap<usize, Point>,
    config: &LayeredConfig,
) -> crate::geometry::bbox::Rect {
    let items: Vec<(Point, (f64, f64))> = members
        .iter()
        .filter_map(|&i| {
            local.get(&i).map(|&p| {
                let (w, h) = node_dimensions(snapshot, i, config);
                (p, (w / 2.0, h / 2.0))
            })
        })
        .collect();
    bounding_box(&items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edge::LayoutEdge;
    use crate::graph::node::LayoutNode;

    fn role_node(id: &str, role: &str) -> LayoutNode {
        let mut node = LayoutNode::new(id);
        node.role = Some(role.to_string());
        node
    }

    fn structural(id: &str, s: &str, t: &str) -> LayoutEdge {
        LayoutEdge::new(id, s, t, EdgeKind::Structural)
    }

    #[test]
    fn test_empty_graph_ok() {
        let snap = GraphSnapshot::build(Vec::new(), Vec::new());
        let positions = compute_layered_layout(&snap, &LayeredConfig::default()).unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn test_no_structural_edges_is_an_error() {
        let snap = GraphSnapshot::build(
            vec![LayoutNode::new("a"), LayoutNode::new("b")],
            vec![LayoutEdge::new("t", "a", "b", EdgeKind::Transactional)],
        );
        let result = compute_layered_layout(&snap, &LayeredConfig::default());
        assert_eq!(result.unwrap_err(), LayoutError::NoStructuralEdges);
    }

    #[test]
    fn test_chain_descends_one_tier_per_hop() {
        let snap = GraphSnapshot::build(
            vec![
                LayoutNode::new("root"),
                LayoutNode::new("mid"),
                LayoutNode::new("leaf"),
            ],
            vec![
                structural("s1", "root", "mid"),
                structural("s2", "mid", "leaf"),
            ],
        );
        let positions = compute_layered_layout(&snap, &LayeredConfig::default()).unwrap();
        assert_eq!(positions.len(), 3);
        assert!(positions["root"].y < positions["mid"].y);
        assert!(positions["mid"].y < positions["leaf"].y);
    }

    #[test]
    fn test_longest_path_wins_tier_assignment() {
        // "acct" is reachable in one hop and in two; it must sit below both
        let snap = GraphSnapshot::build(
            vec![
                LayoutNode::new("root"),
                LayoutNode::new("mid"),
                LayoutNode::new("acct"),
            ],
            vec![
                structural("s1", "root", "mid"),
                structural("s2", "mid", "acct"),
                structural("s3", "root", "acct"),
            ],
        );
        let positions = compute_layered_layout(&snap, &LayeredConfig::default()).unwrap();
        assert!(positions["mid"].y < positions["acct"].y);
    }

    #[test]
    fn test_siblings_share_tier_with_spacing() {
        let config = LayeredConfig::default();
        let snap = GraphSnapshot::build(
            vec![
                LayoutNode::new("root"),
                LayoutNode::new("a"),
                LayoutNode::new("b"),
                LayoutNode::new("c"),
            ],
            vec![
                structural("s1", "root", "a"),
                structural("s2", "root", "b"),
                structural("s3", "root", "c"),
            ],
        );
        let positions = compute_layered_layout(&snap, &config).unwrap();
        assert_eq!(positions["a"].y, positions["b"].y);
        assert_eq!(positions["b"].y, positions["c"].y);

        let mut xs: Vec<f64> = ["a", "b", "c"].iter().map(|id| positions[*id].x).collect();
        xs.sort_by(f64::total_cmp);
        for pair in xs.windows(2) {
            // Centers are a full node width plus the in-layer gap apart
            assert!(
                pair[1] - pair[0] >= config.in_layer_spacing,
                "siblings too close: {} vs {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_structural_cycle_terminates() {
        let snap = GraphSnapshot::build(
            vec![
                LayoutNode::new("a"),
                LayoutNode::new("b"),
                LayoutNode::new("c"),
            ],
            vec![
                structural("s1", "a", "b"),
                structural("s2", "b", "c"),
                structural("s3", "c", "a"),
            ],
        );
        let positions = compute_layered_layout(&snap, &LayeredConfig::default()).unwrap();
        assert_eq!(positions.len(), 3);
        for p in positions.values() {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn test_components_stack_vertically() {
        let snap = GraphSnapshot::build(
            vec![
                LayoutNode::new("a1"),
                LayoutNode::new("a2"),
                LayoutNode::new("b1"),
                LayoutNode::new("b2"),
            ],
            vec![structural("s1", "a1", "a2"), structural("s2", "b1", "b2")],
        );
        let positions = compute_layered_layout(&snap, &LayeredConfig::default()).unwrap();
        assert_eq!(positions.len(), 4);

        let first_max = positions["a1"].y.max(positions["a2"].y);
        let second_min = positions["b1"].y.min(positions["b2"].y);
        assert!(
            second_min > first_max,
            "second component should start below the first"
        );
    }

    #[test]
    fn test_grouped_layout_keeps_groups_apart() {
        let snap = GraphSnapshot::build(
            vec![
                role_node("adv-a", "advisor"),
                role_node("adv-b", "advisor"),
                role_node("cli-a", "client"),
                role_node("cli-b", "client"),
            ],
            vec![
                structural("s1", "adv-a", "cli-a"),
                structural("s2", "adv-b", "cli-b"),
            ],
        );
        let config = LayeredConfig::default();
        let positions = compute_grouped_layout(&snap, &config).unwrap();
        assert_eq!(positions.len(), 4);

        let centroid = |ids: &[&str]| {
            let (sx, sy) = ids
                .iter()
                .fold((0.0, 0.0), |(sx, sy), id| {
                    (sx + positions[*id].x, sy + positions[*id].y)
                });
            Point::new(sx / ids.len() as f64, sy / ids.len() as f64)
        };
        let first = centroid(&["adv-a", "cli-a"]);
        let second = centroid(&["adv-b", "cli-b"]);
        assert!(
            first.distance(second) >= config.group_gap,
            "group centers too close: {}",
            first.distance(second)
        );
        // First group anchors the origin
        assert!(first.x.abs() < 1e-6 && first.y.abs() < 1e-6);
    }

    #[test]
    fn test_grouped_layout_ungrouped_node_gets_identity() {
        let mut island = LayoutNode::new("island");
        island.position = Some(Point::new(7.5, -3.25));
        let snap = GraphSnapshot::build(
            vec![role_node("adv", "advisor"), role_node("cli", "client"), island],
            vec![structural("s1", "adv", "cli")],
        );
        let positions = compute_grouped_layout(&snap, &LayeredConfig::default()).unwrap();
        assert_eq!(positions["island"], Point::new(7.5, -3.25));
    }

    #[test]
    fn test_locked_position_passes_through_verbatim() {
        let mut pinned = LayoutNode::new("pinned");
        pinned.locked = true;
        pinned.position = Some(Point::new(321.125, -87.5));
        let snap = GraphSnapshot::build(
            vec![LayoutNode::new("root"), pinned, LayoutNode::new("leaf")],
            vec![
                structural("s1", "root", "pinned"),
                structural("s2", "pinned", "leaf"),
            ],
        );

        let positions = compute_layered_layout(&snap, &LayeredConfig::default()).unwrap();
        assert_eq!(positions.len(), 3);
        assert_eq!(positions["pinned"], Point::new(321.125, -87.5));
        assert!(positions["leaf"].x.is_finite() && positions["leaf"].y.is_finite());
    }

    #[test]
    fn test_grouped_locked_position_passes_through_verbatim() {
        let mut pinned = role_node("cli", "client");
        pinned.locked = true;
        pinned.position = Some(Point::new(-77.75, 19.5));
        let snap = GraphSnapshot::build(
            vec![role_node("adv", "advisor"), pinned, role_node("acct", "account")],
            vec![structural("s1", "adv", "cli"), structural("s2", "cli", "acct")],
        );

        let positions = compute_grouped_layout(&snap, &LayeredConfig::default()).unwrap();
        assert_eq!(positions.len(), 3);
        assert_eq!(positions["cli"], Point::new(-77.75, 19.5));
    }

    #[test]
    fn test_deterministic() {
        let snap = GraphSnapshot::build(
            vec![
                role_node("adv", "advisor"),
                LayoutNode::new("x"),
                LayoutNode::new("y"),
                LayoutNode::new("z"),
            ],
            vec![
                structural("s1", "adv", "x"),
                structural("s2", "adv", "y"),
                structural("s3", "x", "z"),
            ],
        );
        let config = LayeredConfig::default();
        let first = compute_layered_layout(&snap, &config).unwrap();
        let second = compute_layered_layout(&snap, &config).unwrap();
        assert_eq!(first, second);
    }
}
