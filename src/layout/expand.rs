//! Incremental expand controller.
//!
//! When the host reveals a collapsed node's children, only those children
//! should move; the rest of the canvas stays put. Two placement policies:
//!
//! - **Directional**: children fan out at a minimum forward offset from
//!   the parent, stacked symmetrically on the cross axis, ordered by their
//!   current vertical position so edges do not cross on reveal. Children
//!   already clear of the parent are left untouched.
//! - **Ring**: children fill concentric rings around the parent, a bounded
//!   number per ring, radii scaled by parent and child size.
//!
//! [`compute_all`] applies the selected policy breadth-first from every
//! visible structural root, producing a full layout for the visible
//! subgraph in one pass.

use std::collections::{HashMap, HashSet, VecDeque};
use std::f64::consts::TAU;

use crate::error::LayoutError;
use crate::graph::node::Point;
use crate::graph::snapshot::GraphSnapshot;
use crate::layout::PositionMap;

/// Placement policy for newly revealed children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpandMode {
    /// Forward fan with symmetric cross-axis stacking.
    #[default]
    Directional,
    /// Concentric rings around the parent.
    Ring,
}

impl ExpandMode {
    /// Parse a mode tag; unknown tags fall back to directional.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "ring" => Self::Ring,
            _ => Self::Directional,
        }
    }
}

/// Tunables for the expand controller.
#[derive(Debug, Clone)]
pub struct ExpandConfig {
    /// Forward offset as a multiple of the parent extent.
    pub forward_offset_scale: f64,
    /// Cross-axis slot height as a multiple of the child extent.
    pub sibling_spacing_scale: f64,
    /// Maximum children per ring in ring mode.
    pub ring_capacity: usize,
    /// Radial gap between consecutive rings.
    pub ring_gap: f64,
    /// Fraction of the forward offset below which an already visible
    /// child is considered too close and re-placed.
    pub jitter_threshold: f64,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            forward_offset_scale: 3.0,
            sibling_spacing_scale: 2.5,
            ring_capacity: 12,
            ring_gap: 90.0,
            jitter_threshold: 0.75,
        }
    }
}

/// Place the structural children of `parent_id` around the parent's
/// current position.
///
/// Children already in `visible` whose current position clears the jitter
/// threshold are left alone and omitted from the result; everything else
/// (newly revealed, or visible but still on top of the parent) gets a
/// fresh position. The returned map contains only moved children.
pub fn expand_children(
    snapshot: &GraphSnapshot,
    parent_id: &str,
    visible: &HashSet<String>,
    current: &PositionMap,
    mode: ExpandMode,
    config: &ExpandConfig,
) -> Result<PositionMap, LayoutError> {
    let parent = snapshot
        .index_of(parent_id)
        .ok_or_else(|| LayoutError::UnknownNode(parent_id.to_string()))?;
    let parent_pos = current.get(parent_id).copied().unwrap_or_default();
    let parent_extent = snapshot.node(parent).extent_max();
    let clear_distance =
        parent_extent * config.forward_offset_scale * config.jitter_threshold;

    let to_place: Vec<usize> = snapshot
        .structural_children(parent)
        .iter()
        .copied()
        .filter(|&child| {
            // Locked children keep their caller positions unconditionally
            if snapshot.node(child).is_effectively_locked() {
                return false;
            }
            let id = snapshot.id(child);
            if !visible.contains(id) {
                return true; // newly revealed
            }
            match current.get(id) {
                Some(&p) => p.distance(parent_pos) < clear_distance,
                None => true,
            }
        })
        .collect();

    Ok(place_children(
        snapshot, parent, parent_pos, &to_place, current, mode, config,
    ))
}

/// Full visible-subgraph layout: the selected policy applied breadth-first
/// from every visible structural root (visible nodes with no visible
/// structural parent). Returns positions for all visible nodes.
pub fn compute_all(
    snapshot: &GraphSnapshot,
    visible: &HashSet<String>,
    current: &PositionMap,
    mode: ExpandMode,
    config: &ExpandConfig,
) -> PositionMap {
    let is_visible = |i: usize| visible.contains(snapshot.id(i));

    let roots: Vec<usize> = (0..snapshot.node_count())
        .filter(|&i| is_visible(i))
        .filter(|&i| {
            !snapshot
                .structural_parents(i)
                .iter()
                .any(|&p| is_visible(p))
        })
        .collect();

    let mut working: PositionMap = PositionMap::new();
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut enqueued: HashSet<usize> = HashSet::new();
    for &root in &roots {
        let node = snapshot.node(root);
        let pos = if node.is_effectively_locked() {
            node.position.unwrap_or_default()
        } else {
            current.get(&node.id).copied().unwrap_or_default()
        };
        working.insert(node.id.clone(), pos);
        queue.push_back(root);
        enqueued.insert(root);
    }

    while let Some(parent) = queue.pop_front() {
        let parent_pos = working
            .get(snapshot.id(parent))
            .copied()
            .unwrap_or_default();
        let children: Vec<usize> = snapshot
            .structural_children(parent)
            .iter()
            .copied()
            .filter(|&c| is_visible(c) && !enqueued.contains(&c))
            .collect();
        if children.is_empty() {
            continue;
        }

        // Locked children pass through verbatim but still anchor their own
        // subtrees during the traversal
        let mut to_place = Vec::with_capacity(children.len());
        for &child in &children {
            let node = snapshot.node(child);
            if node.is_effectively_locked() {
                working.insert(node.id.clone(), node.position.unwrap_or_default());
            } else {
                to_place.push(child);
            }
        }

        let placed = place_children(
            snapshot, parent, parent_pos, &to_place, current, mode, config,
        );
        for (id, pos) in placed {
            working.insert(id, pos);
        }
        for child in children {
            enqueued.insert(child);
            queue.push_back(child);
        }
    }
    working
}

fn place_children(
    snapshot: &GraphSnapshot,
    parent: usize,
    parent_pos: Point,
    children: &[usize],
    current: &PositionMap,
    mode: ExpandMode,
    config: &ExpandConfig,
) -> PositionMap {
    match mode {
        ExpandMode::Directional => {
            place_directional(snapshot, parent, parent_pos, children, current, config)
        }
        ExpandMode::Ring => place_ring(snapshot, parent, parent_pos, children, config),
    }
}

/// Forward fan: children sorted by current vertical position (unplaced
/// children keep their relative order), stacked symmetrically around the
/// parent's y at a fixed forward x offset.
fn place_directional(
    snapshot: &GraphSnapshot,
    parent: usize,
    parent_pos: Point,
    children: &[usize],
    current: &PositionMap,
    config: &ExpandConfig,
) -> PositionMap {
    let mut placed = PositionMap::new();
    if children.is_empty() {
        return placed;
    }

    let parent_extent = snapshot.node(parent).extent_max();
    let forward_x = parent_pos.x + parent_extent * config.forward_offset_scale;

    let mut ordered: Vec<(f64, usize, usize)> = children
        .iter()
        .enumerate()
        .map(|(slot, &child)| {
            let y = current
                .get(snapshot.id(child))
                .map(|p| p.y)
                .unwrap_or(parent_pos.y);
            (y, slot, child)
        })
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let slots: Vec<f64> = ordered
        .iter()
        .map(|&(_, _, child)| snapshot.node(child).extent_max() * config.sibling_spacing_scale)
        .collect();
    let total: f64 = slots.iter().sum();

    let mut cursor = parent_pos.y - total / 2.0;
    for ((_, _, child), slot) in ordered.iter().zip(slots.iter()) {
        placed.insert(
            snapshot.id(*child).to_string(),
            Point::new(forward_x, cursor + slot / 2.0),
        );
        cursor += slot;
    }
    placed
}

/// Concentric rings: at most `ring_capacity` children per ring, evenly
/// spaced angles within a ring, radius scaled by parent and child extents.
fn place_ring(
    snapshot: &GraphSnapshot,
    parent: usize,
    parent_pos: Point,
    children: &[usize],
    config: &ExpandConfig,
) -> PositionMap {
    let mut placed = PositionMap::new();
    if children.is_empty() {
        return placed;
    }

    let parent_extent = snapshot.node(parent).extent_max();
    let capacity = config.ring_capacity.max(1);

    for (ring, chunk) in children.chunks(capacity).enumerate() {
        let child_allowance = chunk
            .iter()
            .map(|&c| snapshot.node(c).extent_max())
            .fold(0.0, f64::max);
        let radius = parent_extent + child_allowance + (ring as f64 + 1.0) * config.ring_gap;

        for (i, &child) in chunk.iter().enumerate() {
            let angle = TAU * i as f64 / chunk.len() as f64;
            placed.insert(
                snapshot.id(child).to_string(),
                Point::new(
                    parent_pos.x + radius * angle.cos(),
                    parent_pos.y + radius * angle.sin(),
                ),
            );
        }
    }
    placed
}
