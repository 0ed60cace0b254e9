//! Radial/tree layout solver.
//!
//! Lays out each connected component independently:
//!
//! 1. **Pseudo-root selection**: caller-preferred roots when they intersect
//!    the component, else a high-degree set.
//! 2. **Spanning forest**: BFS from the roots (stable-key neighbor order)
//!    assigns parent, depth and tree; unreached nodes are absorbed as
//!    depth-1 children of the first root.
//! 3. **Angular allocation**: the full circle is split among root trees by
//!    subtree weight, then recursively among children; a node sits at the
//!    midpoint of its sector.
//! 4. **Radial bands**: fixed radius per depth (first ring, then a constant
//!    gap per level).
//! 5. **Overlap relaxation**: bounded same-depth and cross-depth passes
//!    inflate ring radii until padded boxes clear; locked nodes keep their
//!    caller positions and unlocked nodes still colliding with a locked box
//!    are pushed outward at their own depth.
//!
//! Components are finally spread apart by packing their bounding circles.
//! The whole pipeline is a pure function of the snapshot; calling it twice
//! on identical input yields identical output.

use std::collections::{HashMap, HashSet, VecDeque};
use std::f64::consts::TAU;

use crate::geometry::bbox::{bounding_box, boxes_overlap, Rect};
use crate::geometry::pack::{pack_circles, Circle};
use crate::graph::node::Point;
use crate::graph::partition::connected_components;
use crate::graph::snapshot::GraphSnapshot;
use crate::layout::{locked_passthrough, PositionMap};
use crate::spatial::index::{BoxIndex, NodeBox};

/// Tunables for the radial solver. All distances are canvas units.
#[derive(Debug, Clone)]
pub struct RadialConfig {
    /// Minimum angular span reserved per node, in radians.
    pub min_leaf_angle: f64,
    /// Radius of the first ring (depth 1).
    pub first_ring_radius: f64,
    /// Radial gap between consecutive depth rings.
    pub level_gap: f64,
    /// Padding kept between node bounding boxes.
    pub node_margin: f64,
    /// Gap kept between component bounding circles during final packing.
    pub component_gap: f64,
    /// Degree contribution to the angular weight formula.
    pub degree_factor: f64,
    /// Iteration cap for each relaxation pass.
    pub max_relax_iterations: u32,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            min_leaf_angle: 15.0_f64.to_radians(),
            first_ring_radius: 220.0,
            level_gap: 200.0,
            node_margin: 24.0,
            component_gap: 420.0,
            degree_factor: 0.15,
            max_relax_iterations: 12,
        }
    }
}

/// Output of the radial solver.
pub struct RadialResult {
    /// Final position per node id. Every input node appears exactly once.
    pub positions: PositionMap,
    /// Depth per unlocked laid-out node id (locked nodes carry no depth).
    pub depths: HashMap<String, usize>,
}

/// A node placed in component-local polar coordinates.
struct PlacedNode {
    index: usize,
    depth: usize,
    angle: f64,
    radius: f64,
}

/// Compute the radial layout and return just the position map.
pub fn compute_radial_layout(
    snapshot: &GraphSnapshot,
    preferred_roots: &[String],
    config: &RadialConfig,
) -> PositionMap {
    compute_radial(snapshot, preferred_roots, config).positions
}

/// Compute the radial layout.
///
/// When `preferred_roots` is empty, advisor-role nodes act as the
/// preferred root set.
pub fn compute_radial(
    snapshot: &GraphSnapshot,
    preferred_roots: &[String],
    config: &RadialConfig,
) -> RadialResult {
    let mut depths = HashMap::new();
    if snapshot.is_empty() {
        return RadialResult {
            positions: PositionMap::new(),
            depths,
        };
    }

    // Locked positions are authoritative inputs, never outputs
    let mut positions = locked_passthrough(snapshot);

    let preferred: Vec<usize> = if preferred_roots.is_empty() {
        snapshot.advisors()
    } else {
        preferred_roots
            .iter()
            .filter_map(|id| snapshot.index_of(id))
            .collect()
    };

    let components = connected_components(snapshot);
    let solved: Vec<Vec<PlacedNode>> = components
        .iter()
        .map(|c| solve_component(snapshot, &c.members, &preferred, config))
        .collect();

    // Pack component bounding circles when more than one component has
    // solver-placed nodes; a lone component stays at the origin.
    let mut offsets: Vec<Point> = vec![Point::default(); components.len()];
    let occupied: Vec<usize> = (0..solved.len())
        .filter(|&ci| !solved[ci].is_empty())
        .collect();
    if occupied.len() > 1 {
        let rects: HashMap<usize, Rect> = occupied
            .iter()
            .map(|&ci| (ci, component_rect(snapshot, &solved[ci])))
            .collect();
        let circles: Vec<Circle> = occupied
            .iter()
            .map(|&ci| {
                Circle::new(ci, rects[&ci].diagonal() / 2.0 + config.component_gap / 2.0)
            })
            .collect();
        let placement = pack_circles(&circles, None);
        for &ci in &occupied {
            let center = rects[&ci].center();
            if let Some(&target) = placement.get(&ci) {
                offsets[ci] = Point::new(target.x - center.x, target.y - center.y);
            }
        }
    }

    let locked_index = BoxIndex::bulk(
        snapshot
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_effectively_locked())
            .filter_map(|(i, n)| n.position.map(|p| NodeBox::new(i, p, n.half_extents())))
            .collect(),
    );

    for (ci, placed) in solved.iter().enumerate() {
        let offset = offsets[ci];
        for p in placed {
            let node = snapshot.node(p.index);
            let half = node.half_extents();

            // Push outward at the node's own depth until clear of locked
            // boxes, bounded retries
            let mut radius = p.radius;
            if !locked_index.is_empty() {
                for _ in 0..config.max_relax_iterations {
                    let pos = local_to_global(offset, radius, p.angle);
                    if locked_index
                        .intersecting(pos, half, config.node_margin)
                        .is_empty()
                    {
                        break;
                    }
                    radius += config.node_margin;
                }
            }

            let pos = local_to_global(offset, radius, p.angle);
            positions.insert(node.id.clone(), pos);
            depths.insert(node.id.clone(), p.depth);
        }
    }

    RadialResult { positions, depths }
}

#[inline]
fn local_to_global(offset: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        offset.x + radius * angle.cos(),
        offset.y + radius * angle.sin(),
    )
}

fn component_rect(snapshot: &GraphSnapshot, placed: &[PlacedNode]) -> Rect {
    let items: Vec<(Point, (f64, f64))> = placed
        .iter()
        .map(|p| {
            (
                local_to_global(Point::default(), p.radius, p.angle),
                snapshot.node(p.index).half_extents(),
            )
        })
        .collect();
    bounding_box(&items)
}

/// Solve one component in local polar coordinates. Locked members are
/// excluded from all angle/radius computation.
fn solve_component(
    snapshot: &GraphSnapshot,
    members: &[usize],
    preferred: &[usize],
    config: &RadialConfig,
) -> Vec<PlacedNode> {
    let unlocked: Vec<usize> = members
        .iter()
        .copied()
        .filter(|&i| !snapshot.node(i).is_effectively_locked())
        .collect();
    if unlocked.is_empty() {
        return Vec::new();
    }
    let unlocked_set: HashSet<usize> = unlocked.iter().copied().collect();

    let roots = select_roots(snapshot, &unlocked, &unlocked_set, preferred);

    // Spanning forest via BFS from all roots
    let mut depth: HashMap<usize, usize> = HashMap::new();
    let mut parent: HashMap<usize, usize> = HashMap::new();
    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut order: Vec<usize> = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    for &root in &roots {
        if !depth.contains_key(&root) {
            depth.insert(root, 0);
            queue.push_back(root);
        }
    }
    while let Some(node) = queue.pop_front() {
        order.push(node);
        let d = depth[&node];
        for &neighbor in snapshot.neighbors(node) {
            if unlocked_set.contains(&neighbor) && !depth.contains_key(&neighbor) {
                depth.insert(neighbor, d + 1);
                parent.insert(neighbor, node);
                children.entry(node).or_default().push(neighbor);
                queue.push_back(neighbor);
            }
        }
    }

    // Orphan absorption: BFS over the full adjacency should reach every
    // member, so this only fires for inconsistent graphs (e.g. paths cut
    // by locked nodes). Placement is best-effort, not guaranteed correct.
    let first_root = roots[0];
    let mut absorbed = 0usize;
    for &i in &unlocked {
        if !depth.contains_key(&i) {
            depth.insert(i, 1);
            parent.insert(i, first_root);
            children.entry(first_root).or_default().push(i);
            order.push(i);
            absorbed += 1;
        }
    }
    if absorbed > 0 {
        log::warn!("radial solver absorbed {absorbed} unreached node(s) under the first root");
    }

    // Subtree weights and node counts, accumulated leaf-first
    let mut weight: HashMap<usize, f64> = HashMap::new();
    let mut count: HashMap<usize, usize> = HashMap::new();
    for &i in &unlocked {
        let node = snapshot.node(i);
        let w = (node.extent_max() + config.node_margin)
            * (1.0 + config.degree_factor * snapshot.degree(i) as f64);
        weight.insert(i, w);
        count.insert(i, 1);
    }
    for &i in order.iter().rev() {
        if let Some(&p) = parent.get(&i) {
            let (w, c) = (weight[&i], count[&i]);
            *weight.entry(p).or_insert(0.0) += w;
            *count.entry(p).or_insert(0) += c;
        }
    }

    // Angular sectors: trees first, then recursive subdivision
    let mut sector: HashMap<usize, (f64, f64)> = HashMap::new();
    let mut angle: HashMap<usize, f64> = HashMap::new();

    let total_weight: f64 = roots.iter().map(|r| weight[r]).sum();
    let mut tree_spans: Vec<f64> = roots
        .iter()
        .map(|r| {
            let proportional = TAU * weight[r] / total_weight;
            let minimum = config.min_leaf_angle * count[r] as f64;
            proportional.max(minimum)
        })
        .collect();
    let span_sum: f64 = tree_spans.iter().sum();
    for span in &mut tree_spans {
        *span *= TAU / span_sum;
    }

    let mut cursor = 0.0;
    for (tid, &root) in roots.iter().enumerate() {
        sector.insert(root, (cursor, tree_spans[tid]));
        angle.insert(root, cursor + tree_spans[tid] / 2.0);
        cursor += tree_spans[tid];
    }

    for &node in &order {
        let Some(kids) = children.get(&node) else {
            continue;
        };
        let (start, span) = sector[&node];
        let mut kid_spans: Vec<f64> = kids
            .iter()
            .map(|k| {
                let proportional = span * weight[k] / weight[&node];
                proportional.max(config.min_leaf_angle * count[k] as f64)
            })
            .collect();
        let kid_sum: f64 = kid_spans.iter().sum();
        for s in &mut kid_spans {
            *s *= span / kid_sum;
        }

        let mut kid_cursor = start;
        for (k, &kspan) in kids.iter().zip(kid_spans.iter()) {
            sector.insert(*k, (kid_cursor, kspan));
            angle.insert(*k, kid_cursor + kspan / 2.0);
            kid_cursor += kspan;
        }
    }

    // Radius bands: depth 0 at the origin, offset slightly when several
    // root trees share the component
    let max_depth = depth.values().copied().max().unwrap_or(0);
    let mut ring_radius: Vec<f64> = (0..=max_depth)
        .map(|d| match d {
            0 if roots.len() > 1 => config.first_ring_radius * 0.25,
            0 => 0.0,
            _ => config.first_ring_radius + (d as f64 - 1.0) * config.level_gap,
        })
        .collect();

    let mut rings: Vec<Vec<usize>> = vec![Vec::new(); max_depth + 1];
    for &i in &order {
        rings[depth[&i]].push(i);
    }
    for ring in &mut rings {
        ring.sort_by(|a, b| angle[a].total_cmp(&angle[b]));
    }

    relax_same_depth(snapshot, &rings, &angle, &mut ring_radius, config);
    relax_cross_depth(snapshot, &rings, &angle, &mut ring_radius, config);

    order
        .iter()
        .map(|&i| {
            let d = depth[&i];
            PlacedNode {
                index: i,
                depth: d,
                angle: angle[&i],
                radius: ring_radius[d],
            }
        })
        .collect()
}

/// Root selection: preferred roots restricted to the component when any
/// intersect it, else the high-degree set, else the single busiest node.
fn select_roots(
    snapshot: &GraphSnapshot,
    unlocked: &[usize],
    unlocked_set: &HashSet<usize>,
    preferred: &[usize],
) -> Vec<usize> {
    let mut seen: HashSet<usize> = HashSet::new();
    let mut roots: Vec<usize> = preferred
        .iter()
        .copied()
        .filter(|i| unlocked_set.contains(i) && seen.insert(*i))
        .collect();

    if !roots.is_empty() {
        roots.sort_by_key(|&i| (std::cmp::Reverse(snapshot.degree(i)), i));
        return roots;
    }

    let max_degree = unlocked
        .iter()
        .map(|&i| snapshot.degree(i))
        .max()
        .unwrap_or(0);
    let threshold = 3.max((0.7 * max_degree as f64).floor() as usize);
    roots = unlocked
        .iter()
        .copied()
        .filter(|&i| snapshot.degree(i) >= threshold)
        .collect();

    if roots.is_empty() {
        // Lowest index wins degree ties
        let busiest = unlocked
            .iter()
            .copied()
            .max_by_key(|&i| (snapshot.degree(i), std::cmp::Reverse(i)));
        roots = busiest.into_iter().collect();
    }
    roots
}

/// Same-depth pass: every pair on a ring must clear the padded box test;
/// an overlap pushes the whole ring (and all deeper rings) outward.
fn relax_same_depth(
    snapshot: &GraphSnapshot,
    rings: &[Vec<usize>],
    angle: &HashMap<usize, f64>,
    ring_radius: &mut [f64],
    config: &RadialConfig,
) {
    for _ in 0..config.max_relax_iterations {
        let mut adjusted = false;
        for d in 0..rings.len() {
            let ring = &rings[d];
            if ring.len() < 2 {
                continue;
            }
            let r = ring_radius[d];
            let mut needed: f64 = 0.0;
            for (i, &a) in ring.iter().enumerate() {
                for &b in ring.iter().skip(i + 1) {
                    let half_a = snapshot.node(a).half_extents();
                    let half_b = snapshot.node(b).half_extents();
                    let pos_a = local_to_global(Point::default(), r, angle[&a]);
                    let pos_b = local_to_global(Point::default(), r, angle[&b]);
                    if boxes_overlap(pos_a, half_a, pos_b, half_b, config.node_margin) {
                        needed = needed.max(same_ring_push(
                            r,
                            angle[&a],
                            angle[&b],
                            half_a,
                            half_b,
                            config.node_margin,
                        ));
                    }
                }
            }
            if needed > 0.0 {
                for radius in ring_radius.iter_mut().skip(d) {
                    *radius += needed;
                }
                adjusted = true;
            }
        }
        if !adjusted {
            break;
        }
    }
}

/// Radial increase that separates two same-ring boxes on at least one axis.
fn same_ring_push(
    radius: f64,
    angle_a: f64,
    angle_b: f64,
    half_a: (f64, f64),
    half_b: (f64, f64),
    margin: f64,
) -> f64 {
    let sep_x = half_a.0 + half_b.0 + margin;
    let sep_y = half_a.1 + half_b.1 + margin;
    let coeff_x = (angle_a.cos() - angle_b.cos()).abs();
    let coeff_y = (angle_a.sin() - angle_b.sin()).abs();

    let needed_x = if coeff_x > 1e-9 {
        sep_x / coeff_x
    } else {
        f64::INFINITY
    };
    let needed_y = if coeff_y > 1e-9 {
        sep_y / coeff_y
    } else {
        f64::INFINITY
    };

    let needed = needed_x.min(needed_y);
    if needed.is_finite() {
        (needed - radius + 1e-6).max(margin)
    } else {
        // Coincident angles: a fixed increment is all we can do
        margin
    }
}

/// Cross-depth pass: every inner/outer combination of adjacent rings must
/// clear; an overlap pushes the outer ring (and all deeper) outward.
fn relax_cross_depth(
    snapshot: &GraphSnapshot,
    rings: &[Vec<usize>],
    angle: &HashMap<usize, f64>,
    ring_radius: &mut [f64],
    config: &RadialConfig,
) {
    if rings.len() < 2 {
        return;
    }
    for _ in 0..config.max_relax_iterations {
        let mut adjusted = false;
        for d in 0..rings.len() - 1 {
            let mut needed: f64 = 0.0;
            for &inner in &rings[d] {
                let inner_half = snapshot.node(inner).half_extents();
                let inner_pos = local_to_global(Point::default(), ring_radius[d], angle[&inner]);
                for &outer in &rings[d + 1] {
                    let outer_half = snapshot.node(outer).half_extents();
                    let outer_pos =
                        local_to_global(Point::default(), ring_radius[d + 1], angle[&outer]);
                    if boxes_overlap(outer_pos, outer_half, inner_pos, inner_half, config.node_margin)
                    {
                        needed = needed.max(cross_ring_push(
                            inner_pos,
                            inner_half,
                            ring_radius[d + 1],
                            angle[&outer],
                            outer_half,
                            config.node_margin,
                        ));
                    }
                }
            }
            if needed > 0.0 {
                for radius in ring_radius.iter_mut().skip(d + 1) {
                    *radius += needed;
                }
                adjusted = true;
            }
        }
        if !adjusted {
            break;
        }
    }
}

/// Smallest multiple of the margin that moves the outer box clear of the
/// inner box along the outer node's radial direction.
fn cross_ring_push(
    inner_pos: Point,
    inner_half: (f64, f64),
    outer_radius: f64,
    outer_angle: f64,
    outer_half: (f64, f64),
    margin: f64,
) -> f64 {
    const SCAN_LIMIT: u32 = 64;
    for k in 1..=SCAN_LIMIT {
        let push = k as f64 * margin;
        let pos = local_to_global(Point::default(), outer_radius + push, outer_angle);
        if !boxes_overlap(pos, outer_half, inner_pos, inner_half, margin) {
            return push;
        }
    }
    SCAN_LIMIT as f64 * margin
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edge::{EdgeKind, LayoutEdge};
    use crate::graph::node::LayoutNode;
    use proptest::prelude::*;

    fn role_node(id: &str, role: &str) -> LayoutNode {
        let mut node = LayoutNode::new(id);
        node.role = Some(role.to_string());
        node
    }

    fn structural(id: &str, s: &str, t: &str) -> LayoutEdge {
        LayoutEdge::new(id, s, t, EdgeKind::Structural)
    }

    fn advisory_chain() -> GraphSnapshot {
        GraphSnapshot::build(
            vec![
                role_node("A", "advisor"),
                role_node("B", "client"),
                role_node("C", "account"),
            ],
            vec![structural("s1", "A", "B"), structural("s2", "B", "C")],
        )
    }

    #[test]
    fn test_empty_graph() {
        let snap = GraphSnapshot::build(Vec::new(), Vec::new());
        let result = compute_radial(&snap, &[], &RadialConfig::default());
        assert!(result.positions.is_empty());
        assert!(result.depths.is_empty());
    }

    #[test]
    fn test_advisor_chain_depths_and_radii() {
        let snap = advisory_chain();
        let config = RadialConfig::default();
        let result = compute_radial(&snap, &[], &config);

        assert_eq!(result.depths["A"], 0);
        assert_eq!(result.depths["B"], 1);
        assert_eq!(result.depths["C"], 2);

        let origin = Point::default();
        let dist = |id: &str| result.positions[id].distance(origin);
        assert!(dist("A").abs() < 1e-9, "root at radius 0, got {}", dist("A"));
        assert!(
            (dist("B") - 220.0).abs() < 1e-6,
            "depth 1 at first ring, got {}",
            dist("B")
        );
        assert!(
            (dist("C") - 420.0).abs() < 1e-6,
            "depth 2 at 220+200, got {}",
            dist("C")
        );
    }

    #[test]
    fn test_every_node_appears_exactly_once() {
        let snap = GraphSnapshot::build(
            vec![
                role_node("A", "advisor"),
                LayoutNode::new("b"),
                LayoutNode::new("c"),
                LayoutNode::new("lonely"),
            ],
            vec![structural("s1", "A", "b"), structural("s2", "A", "c")],
        );
        let result = compute_radial(&snap, &[], &RadialConfig::default());
        assert_eq!(result.positions.len(), 4);
        for node in snap.nodes() {
            assert!(result.positions.contains_key(&node.id));
            let p = result.positions[&node.id];
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn test_locked_position_passes_through_verbatim() {
        let mut locked = LayoutNode::new("pinned");
        locked.locked = true;
        locked.position = Some(Point::new(123.456789, -98.7654321));
        let snap = GraphSnapshot::build(
            vec![role_node("A", "advisor"), LayoutNode::new("b"), locked],
            vec![structural("s1", "A", "b"), structural("s2", "A", "pinned")],
        );

        let result = compute_radial(&snap, &[], &RadialConfig::default());
        assert_eq!(
            result.positions["pinned"],
            Point::new(123.456789, -98.7654321)
        );
        assert!(!result.depths.contains_key("pinned"));
    }

    #[test]
    fn test_unlocked_cleared_from_locked_box() {
        // Lock a node right on the first ring where the child would land
        let config = RadialConfig::default();
        let mut locked = LayoutNode::new("wall");
        locked.locked = true;
        // Single tree: child angle is pi, so it lands near (-220, 0)
        locked.position = Some(Point::new(-220.0, 0.0));
        locked.size = Some(30.0);

        let snap = GraphSnapshot::build(
            vec![role_node("A", "advisor"), LayoutNode::new("b"), locked],
            vec![structural("s1", "A", "b"), structural("s2", "A", "wall")],
        );
        let result = compute_radial(&snap, &[], &config);

        let b = result.positions["b"];
        let wall = result.positions["wall"];
        assert!(
            !boxes_overlap(b, (18.0, 18.0), wall, (30.0, 30.0), config.node_margin),
            "unlocked node should be pushed clear of the locked box: {b:?} vs {wall:?}"
        );
    }

    #[test]
    fn test_two_components_separated_by_gap() {
        let snap = GraphSnapshot::build(
            vec![
                LayoutNode::new("a"),
                LayoutNode::new("b"),
                LayoutNode::new("c"),
                LayoutNode::new("d"),
            ],
            vec![
                LayoutEdge::new("e1", "a", "b", EdgeKind::Generic),
                LayoutEdge::new("e2", "c", "d", EdgeKind::Generic),
            ],
        );
        assert_eq!(connected_components(&snap).len(), 2);

        let config = RadialConfig::default();
        let result = compute_radial(&snap, &[], &config);
        assert_eq!(result.positions.len(), 4);

        let rect_of = |ids: &[&str]| {
            let items: Vec<(Point, (f64, f64))> = ids
                .iter()
                .map(|&id| {
                    let i = snap.index_of(id).unwrap();
                    (result.positions[id], snap.node(i).half_extents())
                })
                .collect();
            bounding_box(&items)
        };
        let first = rect_of(&["a", "b"]);
        let second = rect_of(&["c", "d"]);
        assert!(
            !first.intersects_padded(&second, config.component_gap / 4.0),
            "components should keep the configured gap: {first:?} vs {second:?}"
        );
    }

    #[test]
    fn test_idempotent() {
        let snap = GraphSnapshot::build(
            vec![
                role_node("A", "advisor"),
                LayoutNode::new("b"),
                LayoutNode::new("c"),
                LayoutNode::new("d"),
                LayoutNode::new("e"),
            ],
            vec![
                structural("s1", "A", "b"),
                structural("s2", "A", "c"),
                structural("s3", "b", "d"),
                LayoutEdge::new("t1", "d", "e", EdgeKind::Transactional),
            ],
        );
        let config = RadialConfig::default();
        let first = compute_radial(&snap, &[], &config);
        let second = compute_radial(&snap, &[], &config);
        assert_eq!(first.positions, second.positions);
        assert_eq!(first.depths, second.depths);
    }

    #[test]
    fn test_preferred_root_wins_over_degree() {
        // "hub" has the highest degree, but the caller prefers "leaf"
        let snap = GraphSnapshot::build(
            vec![
                LayoutNode::new("hub"),
                LayoutNode::new("leaf"),
                LayoutNode::new("x"),
                LayoutNode::new("y"),
                LayoutNode::new("z"),
            ],
            vec![
                structural("s1", "hub", "leaf"),
                structural("s2", "hub", "x"),
                structural("s3", "hub", "y"),
                structural("s4", "hub", "z"),
            ],
        );
        let result = compute_radial(
            &snap,
            &["leaf".to_string()],
            &RadialConfig::default(),
        );
        assert_eq!(result.depths["leaf"], 0);
        assert_eq!(result.depths["hub"], 1);
    }

    #[test]
    fn test_high_degree_root_fallback() {
        // No preferred roots, no advisors: the busiest node becomes root
        let snap = GraphSnapshot::build(
            vec![
                LayoutNode::new("hub"),
                LayoutNode::new("x"),
                LayoutNode::new("y"),
                LayoutNode::new("z"),
            ],
            vec![
                structural("s1", "hub", "x"),
                structural("s2", "hub", "y"),
                structural("s3", "hub", "z"),
            ],
        );
        let result = compute_radial(&snap, &[], &RadialConfig::default());
        assert_eq!(result.depths["hub"], 0);
        assert_eq!(result.depths["x"], 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        /// After relaxation, no two unlocked same-depth nodes in one
        /// component have overlapping padded boxes.
        #[test]
        fn prop_same_depth_boxes_clear(parents in proptest::collection::vec(0usize..24, 0..24)) {
            // parents[i] < i+1 builds a random tree rooted at n00
            let n = parents.len() + 1;
            let ids: Vec<String> = (0..n).map(|i| format!("n{i:02}")).collect();
            let mut nodes: Vec<LayoutNode> = ids.iter().map(LayoutNode::new).collect();
            nodes[0].role = Some("advisor".to_string());
            let edges: Vec<LayoutEdge> = parents
                .iter()
                .enumerate()
                .map(|(i, &p)| {
                    let parent = p % (i + 1);
                    LayoutEdge::new(
                        format!("e{i}"),
                        ids[parent].clone(),
                        ids[i + 1].clone(),
                        EdgeKind::Structural,
                    )
                })
                .collect();

            let snap = GraphSnapshot::build(nodes, edges);
            let config = RadialConfig::default();
            let result = compute_radial(&snap, &[], &config);
            prop_assert_eq!(result.positions.len(), n);

            let laid_out: Vec<&String> = ids.iter().collect();
            for (i, &a) in laid_out.iter().enumerate() {
                for &b in laid_out.iter().skip(i + 1) {
                    if result.depths.get(a) != result.depths.get(b) {
                        continue;
                    }
                    let ia = snap.index_of(a).unwrap();
                    let ib = snap.index_of(b).unwrap();
                    prop_assert!(
                        !boxes_overlap(
                            result.positions[a],
                            snap.node(ia).half_extents(),
                            result.positions[b],
                            snap.node(ib).half_extents(),
                            config.node_margin,
                        ),
                        "same-depth overlap between {} and {}", a, b
                    );
                }
            }
        }
    }
}
