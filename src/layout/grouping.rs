//! Advisor-grouping resolver.
//!
//! Many unrelated per-advisor subtrees share one canvas; per-group layout
//! needs to know which advisor "owns" every node, including
//! transactional-only nodes with no structural ancestor. Ownership is
//! inferred in three stages:
//!
//! 1. **Direct resolution**: a node owns itself if it is advisor-role,
//!    else a bounded walk up inbound structural edges (10 hops, so cycles
//!    cannot loop forever) looks for an advisor ancestor.
//! 2. **Neighbor propagation**: owners spread breadth-first across edges
//!    of any kind to nodes stage 1 could not resolve.
//! 3. **Union-find**: edges whose endpoints resolved to different advisors
//!    merge those advisors' groups (path-compressed union-find).
//!
//! Nodes that remain unresolved are dropped from grouping — they are not
//! an error, they simply take the identity fallback in grouped layouts.

use petgraph::unionfind::UnionFind;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::node::NodeRole;
use crate::graph::snapshot::GraphSnapshot;

/// Upper bound on the inbound structural walk when looking for an advisor
/// ancestor. Cycles in malformed hierarchies terminate here.
const ANCESTOR_HOP_LIMIT: u32 = 10;

/// One advisor group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorGroup {
    /// Earliest-enumerated advisor in the group; drives deterministic
    /// group ordering in final packing.
    pub anchor: usize,
    /// Member node indices, ascending.
    pub members: Vec<usize>,
}

/// Resolve advisor groups for the whole snapshot.
///
/// Returns groups sorted by anchor index. Every member appears in exactly
/// one group; nodes with no resolvable advisor appear in none.
pub fn resolve_groups(snapshot: &GraphSnapshot) -> Vec<AdvisorGroup> {
    let n = snapshot.node_count();
    let advisors = snapshot.advisors();
    if advisors.is_empty() {
        return Vec::new();
    }

    // Stage 1: direct resolution (self or bounded structural ancestry)
    let mut owner: Vec<Option<usize>> = (0..n)
        .map(|node| direct_owner(snapshot, node))
        .collect();

    // Stage 2: breadth-first owner propagation over any edge kind
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| owner[i].is_some()).collect();
    while let Some(node) = queue.pop_front() {
        let node_owner = owner[node];
        for &neighbor in snapshot.neighbors(node) {
            if owner[neighbor].is_none() {
                owner[neighbor] = node_owner;
                queue.push_back(neighbor);
            }
        }
    }

    // Stage 3: union advisors bridged by any edge
    let mut union_find: UnionFind<usize> = UnionFind::new(n);
    for (source, target, _) in snapshot.edge_endpoints() {
        if let (Some(a), Some(b)) = (owner[source], owner[target]) {
            if a != b {
                union_find.union(a, b);
            }
        }
    }

    // Collect members per union root; anchor is the earliest advisor
    let mut anchor_of_root: HashMap<usize, usize> = HashMap::new();
    for &advisor in &advisors {
        let root = union_find.find_mut(advisor);
        anchor_of_root.entry(root).or_insert(advisor);
    }

    let mut members_of_anchor: HashMap<usize, Vec<usize>> = HashMap::new();
    for node in 0..n {
        let Some(node_owner) = owner[node] else {
            continue;
        };
        let root = union_find.find_mut(node_owner);
        // Owners are always advisors, so the root is always anchored
        if let Some(&anchor) = anchor_of_root.get(&root) {
            members_of_anchor.entry(anchor).or_default().push(node);
        }
    }

    let mut groups: Vec<AdvisorGroup> = members_of_anchor
        .into_iter()
        .map(|(anchor, mut members)| {
            members.sort_unstable();
            AdvisorGroup { anchor, members }
        })
        .collect();
    groups.sort_by_key(|g| g.anchor);
    groups
}

/// Stage-1 resolution: the node itself, or an advisor found by walking
/// inbound structural edges breadth-first for at most
/// [`ANCESTOR_HOP_LIMIT`] hops.
fn direct_owner(snapshot: &GraphSnapshot, node: usize) -> Option<usize> {
    if snapshot.node(node).node_role() == NodeRole::Advisor {
        return Some(node);
    }

    let mut visited: HashSet<usize> = HashSet::new();
    visited.insert(node);
    let mut frontier = vec![node];

    for _ in 0..ANCESTOR_HOP_LIMIT {
        let mut next = Vec::new();
        for &current in &frontier {
            for &parent in snapshot.structural_parents(current) {
                if !visited.insert(parent) {
                    continue;
                }
                if snapshot.node(parent).node_role() == NodeRole::Advisor {
                    return Some(parent);
                }
                next.push(parent);
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    None
}
