//! Connected-component partitioning.
//!
//! Components are the unit of independent layout: every node belongs to
//! exactly one, and components never share coordinate space until final
//! packing. Edges of every kind count for connectivity.
//!
//! Determinism: BFS is seeded in snapshot index order (stable-key order)
//! and neighbors are visited in the same order, so component enumeration
//! and member order are reproducible for identical input.

use std::collections::VecDeque;

use super::snapshot::GraphSnapshot;

/// One connected component: member indices in BFS discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Snapshot indices of member nodes.
    pub members: Vec<usize>,
}

/// Compute connected components over the undirected adjacency.
pub fn connected_components(snapshot: &GraphSnapshot) -> Vec<Component> {
    let n = snapshot.node_count();
    let mut visited = vec![false; n];
    let mut components = Vec::new();

    for seed in 0..n {
        if visited[seed] {
            continue;
        }

        let mut members = Vec::new();
        let mut queue = VecDeque::new();
        visited[seed] = true;
        queue.push_back(seed);

        while let Some(node) = queue.pop_front() {
            members.push(node);
            for &neighbor in snapshot.neighbors(node) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        components.push(Component { members });
    }

    components
}
