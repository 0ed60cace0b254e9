//! GraphSnapshot - immutable per-call view of the input graph.
//!
//! The snapshot interns node ids into dense indices ordered by the stable
//! sort key, stores the topology in petgraph's StableGraph, and precomputes
//! the derived structures every solver needs:
//! - Undirected adjacency (all edge kinds), neighbors sorted by stable key
//! - Structural parent/children maps for hierarchy traversal
//! - Dangling-edge and self-loop filtering (silently dropped, not errors)
//!
//! A snapshot never mutates topology. Solvers are pure functions over it;
//! any caches they need (role lookups, grouping memos) are local to one
//! invocation.

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Directed;
use std::collections::HashMap;

use super::edge::{EdgeKind, LayoutEdge};
use super::node::{LayoutNode, NodeRole};

/// Immutable snapshot of the node/edge collections for one layout pass.
pub struct GraphSnapshot {
    /// Nodes in stable-key order. Dense indices into this vec are the
    /// node handles used throughout the crate.
    nodes: Vec<LayoutNode>,

    /// Map from node id to dense index.
    index_of: HashMap<String, usize>,

    /// Topology. Node weights are dense indices, edge weights the kind.
    graph: StableGraph<usize, EdgeKind, Directed>,

    /// Dense index → petgraph NodeIndex.
    node_indices: Vec<NodeIndex>,

    /// Edges that survived filtering, in input order.
    edges: Vec<LayoutEdge>,

    /// Undirected adjacency: deduped neighbor indices, ascending
    /// (ascending dense index == stable-key order).
    adjacency: Vec<Vec<usize>>,

    /// Structural children per node, ascending.
    structural_children: Vec<Vec<usize>>,

    /// Structural parents per node, ascending.
    structural_parents: Vec<Vec<usize>>,
}

impl GraphSnapshot {
    /// Build a snapshot from raw node/edge collections.
    ///
    /// Duplicate node ids keep the first occurrence. Edges referencing an
    /// unknown endpoint and self-loops are dropped.
    pub fn build(nodes: Vec<LayoutNode>, edges: Vec<LayoutEdge>) -> Self {
        // Dedupe by id, first occurrence wins
        let mut seen: HashMap<String, ()> = HashMap::with_capacity(nodes.len());
        let mut unique: Vec<LayoutNode> = Vec::with_capacity(nodes.len());
        for node in nodes {
            if seen.insert(node.id.clone(), ()).is_none() {
                unique.push(node);
            }
        }

        // Stable-key order; ties broken by id so the order is total
        unique.sort_by(|a, b| {
            a.stable_key()
                .cmp(&b.stable_key())
                .then_with(|| a.id.cmp(&b.id))
        });

        let index_of: HashMap<String, usize> = unique
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();

        let mut graph: StableGraph<usize, EdgeKind, Directed> =
            StableGraph::with_capacity(unique.len(), edges.len());
        let node_indices: Vec<NodeIndex> = (0..unique.len()).map(|i| graph.add_node(i)).collect();

        let mut kept_edges: Vec<LayoutEdge> = Vec::with_capacity(edges.len());
        for edge in edges {
            let (Some(&s), Some(&t)) = (index_of.get(&edge.source), index_of.get(&edge.target))
            else {
                continue; // dangling endpoint
            };
            if s == t {
                continue; // self-loop
            }
            graph.add_edge(node_indices[s], node_indices[t], edge.kind);
            kept_edges.push(edge);
        }

        let n = unique.len();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut structural_children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut structural_parents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for edge in graph.edge_references() {
            let s = graph[edge.source()];
            let t = graph[edge.target()];
            adjacency[s].push(t);
            adjacency[t].push(s);
            if *edge.weight() == EdgeKind::Structural {
                structural_children[s].push(t);
                structural_parents[t].push(s);
            }
        }
        for list in adjacency
            .iter_mut()
            .chain(structural_children.iter_mut())
            .chain(structural_parents.iter_mut())
        {
            list.sort_unstable();
            list.dedup();
        }

        Self {
            nodes: unique,
            index_of,
            graph,
            node_indices,
            edges: kept_edges,
            adjacency,
            structural_children,
            structural_parents,
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when the snapshot has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in stable-key order.
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    /// Node by dense index.
    pub fn node(&self, index: usize) -> &LayoutNode {
        &self.nodes[index]
    }

    /// Node id by dense index.
    pub fn id(&self, index: usize) -> &str {
        &self.nodes[index].id
    }

    /// Dense index for a node id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_of.get(id).copied()
    }

    /// Edges that survived filtering.
    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    /// Dense endpoint indices for every kept edge, with kind.
    pub fn edge_endpoints(&self) -> impl Iterator<Item = (usize, usize, EdgeKind)> + '_ {
        self.graph.edge_references().map(|e| {
            (
                self.graph[e.source()],
                self.graph[e.target()],
                *e.weight(),
            )
        })
    }

    /// Undirected neighbors (all edge kinds), in stable-key order.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }

    /// Undirected degree (distinct neighbors).
    pub fn degree(&self, index: usize) -> usize {
        self.adjacency[index].len()
    }

    /// Structural children, in stable-key order.
    pub fn structural_children(&self, index: usize) -> &[usize] {
        &self.structural_children[index]
    }

    /// Structural parents, in stable-key order.
    pub fn structural_parents(&self, index: usize) -> &[usize] {
        &self.structural_parents[index]
    }

    /// Indices of advisor-role nodes, in stable-key order.
    pub fn advisors(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.node_role() == NodeRole::Advisor)
            .map(|(i, _)| i)
            .collect()
    }

    /// Petgraph NodeIndex for a dense index (topology-level access).
    pub fn petgraph_index(&self, index: usize) -> NodeIndex {
        self.node_indices[index]
    }
}
