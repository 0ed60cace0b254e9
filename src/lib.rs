//! fingraph-layout - WASM Module
//!
//! Layout engine for hierarchical financial relationship graphs
//! (advisors → clients → portfolios → accounts, plus transactional
//! relationships). It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen; the host renders the
//! resulting positions on its own canvas.
//!
//! # Architecture
//!
//! - `graph`: input records, immutable snapshot, connected components
//! - `geometry`: bounding boxes and golden-angle circle packing
//! - `spatial`: R-tree box index for locked-node clearance queries
//! - `layout`: radial solver, layered adapter, advisor grouping,
//!   incremental expand, run tokens

use std::collections::HashSet;

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod spatial;

use graph::edge::{annotate_sides, LayoutEdge};
use graph::node::LayoutNode;
use graph::snapshot::GraphSnapshot;
use layout::{
    compute_all, compute_grouped_layout, compute_layered_layout, compute_radial_layout,
    expand_children, identity_layout, ExpandConfig, ExpandMode, LayeredConfig, PositionMap,
    RadialConfig, RunToken, RunTracker,
};

/// Initialize the WASM module: panic hook plus console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Repeated init (e.g. hot reload) is not an error
    let _ = console_log::init_with_level(log::Level::Warn);
}

/// Main entry point for the layout engine.
///
/// Holds the current graph snapshot, the solver configurations and the
/// last computed position map. All compute methods are synchronous; the
/// layered path additionally participates in run-token stale-result
/// suppression (see [`RunTracker`]).
#[wasm_bindgen]
pub struct FinGraphLayout {
    snapshot: Option<GraphSnapshot>,
    radial_config: RadialConfig,
    layered_config: LayeredConfig,
    expand_config: ExpandConfig,
    runs: RunTracker,
    positions: PositionMap,
}

#[wasm_bindgen]
impl FinGraphLayout {
    /// Create an engine with no graph loaded.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            snapshot: None,
            radial_config: RadialConfig::default(),
            layered_config: LayeredConfig::default(),
            expand_config: ExpandConfig::default(),
            runs: RunTracker::new(),
            positions: PositionMap::new(),
        }
    }

    // =========================================================================
    // Graph Input
    // =========================================================================

    /// Load a graph from node and edge arrays.
    ///
    /// `nodes` is an array of `{ id, label?, width?, height?, size?, role?,
    /// locked?, position? }` records, `edges` an array of `{ id, source,
    /// target, edgeType? }` records. Dangling edges and self-loops are
    /// dropped silently; duplicate node ids keep the first occurrence.
    #[wasm_bindgen(js_name = setGraph)]
    pub fn set_graph(&mut self, nodes: JsValue, edges: JsValue) -> Result<(), JsValue> {
        let nodes: Vec<LayoutNode> =
            serde_wasm_bindgen::from_value(nodes).map_err(|e| JsValue::from(e.to_string()))?;
        let edges: Vec<LayoutEdge> =
            serde_wasm_bindgen::from_value(edges).map_err(|e| JsValue::from(e.to_string()))?;

        self.snapshot = Some(GraphSnapshot::build(nodes, edges));
        self.positions.clear();
        Ok(())
    }

    /// Number of nodes in the loaded graph.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> usize {
        self.snapshot.as_ref().map_or(0, GraphSnapshot::node_count)
    }

    // =========================================================================
    // Radial Layout
    // =========================================================================

    /// Compute the radial layout.
    ///
    /// `preferred_roots` biases pseudo-root selection; an empty array falls
    /// back to advisor-role nodes. Returns the position map as
    /// `{ nodeId: { x, y } }`.
    #[wasm_bindgen(js_name = computeRadial)]
    pub fn compute_radial(&mut self, preferred_roots: Vec<String>) -> Result<JsValue, JsValue> {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return serialize(&PositionMap::new());
        };
        self.positions = compute_radial_layout(snapshot, &preferred_roots, &self.radial_config);
        serialize(&self.positions)
    }

    // =========================================================================
    // Layered Layout (run-token guarded)
    // =========================================================================

    /// Start a new layout run, invalidating all earlier run tokens.
    #[wasm_bindgen(js_name = beginRun)]
    pub fn begin_run(&mut self) -> f64 {
        self.runs.begin().0 as f64
    }

    /// Compute the layered layout for the given run token.
    ///
    /// Returns `null` when a newer run has started since the token was
    /// issued (the stale result is discarded, current positions stay).
    /// A hierarchy-less graph falls back to the identity layout with a
    /// console warning.
    #[wasm_bindgen(js_name = computeLayered)]
    pub fn compute_layered(&mut self, run: f64) -> Result<JsValue, JsValue> {
        self.layered_run(run, false)
    }

    /// Compute the layered layout with one hierarchy per advisor group,
    /// under the same run-token rules as [`Self::compute_layered`].
    #[wasm_bindgen(js_name = computeGrouped)]
    pub fn compute_grouped(&mut self, run: f64) -> Result<JsValue, JsValue> {
        self.layered_run(run, true)
    }

    // =========================================================================
    // Incremental Expand
    // =========================================================================

    /// Place the structural children of `parent_id` around the parent.
    ///
    /// `visible` lists currently visible node ids, `mode` is `"directional"`
    /// or `"ring"`. Only moved children appear in the returned map; their
    /// positions are also committed to the engine's position state.
    #[wasm_bindgen(js_name = expandNode)]
    pub fn expand_node(
        &mut self,
        parent_id: &str,
        visible: Vec<String>,
        mode: &str,
    ) -> Result<JsValue, JsValue> {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return serialize(&PositionMap::new());
        };
        let visible: HashSet<String> = visible.into_iter().collect();
        let placed = expand_children(
            snapshot,
            parent_id,
            &visible,
            &self.positions,
            ExpandMode::from_tag(mode),
            &self.expand_config,
        )
        .map_err(|e| JsValue::from(e.to_string()))?;

        for (id, pos) in &placed {
            self.positions.insert(id.clone(), *pos);
        }
        serialize(&placed)
    }

    /// Lay out the whole visible subgraph with the expand policy applied
    /// breadth-first from every visible structural root.
    #[wasm_bindgen(js_name = computeAll)]
    pub fn compute_all(&mut self, visible: Vec<String>, mode: &str) -> Result<JsValue, JsValue> {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return serialize(&PositionMap::new());
        };
        let visible: HashSet<String> = visible.into_iter().collect();
        let placed = compute_all(
            snapshot,
            &visible,
            &self.positions,
            ExpandMode::from_tag(mode),
            &self.expand_config,
        );
        for (id, pos) in &placed {
            self.positions.insert(id.clone(), *pos);
        }
        serialize(&placed)
    }

    // =========================================================================
    // Output Access
    // =========================================================================

    /// The last computed position map as `{ nodeId: { x, y } }`.
    pub fn positions(&self) -> Result<JsValue, JsValue> {
        serialize(&self.positions)
    }

    /// Interleaved positions `[x0, y0, x1, y1, ...]` in the snapshot's
    /// stable node order, for typed-array consumers. Nodes without a
    /// computed position emit the origin.
    #[wasm_bindgen(js_name = positionsBuffer)]
    pub fn positions_buffer(&self) -> Float32Array {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return Float32Array::new_with_length(0);
        };
        let mut interleaved = Vec::with_capacity(snapshot.node_count() * 2);
        for node in snapshot.nodes() {
            let pos = self.positions.get(&node.id).copied().unwrap_or_default();
            interleaved.push(pos.x as f32);
            interleaved.push(pos.y as f32);
        }
        Float32Array::from(&interleaved[..])
    }

    /// Edge attachment sides derived from the current positions, as an
    /// array of `{ id, source, target, sourceSide, targetSide }`.
    #[wasm_bindgen(js_name = edgeSides)]
    pub fn edge_sides(&self) -> Result<JsValue, JsValue> {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return serialize(&Vec::<graph::edge::SidedEdge>::new());
        };
        serialize(&annotate_sides(snapshot.edges(), &self.positions))
    }

    fn layered_run(&mut self, run: f64, grouped: bool) -> Result<JsValue, JsValue> {
        if !self.runs.is_current(RunToken(run as u64)) {
            return Ok(JsValue::NULL);
        }
        let Some(snapshot) = self.snapshot.as_ref() else {
            return serialize(&PositionMap::new());
        };
        let computed = if grouped {
            compute_grouped_layout(snapshot, &self.layered_config)
        } else {
            compute_layered_layout(snapshot, &self.layered_config)
        };
        self.positions = match computed {
            Ok(positions) => positions,
            Err(err) => {
                log::warn!("layered layout failed ({err}), falling back to identity layout");
                identity_layout(snapshot)
            }
        };
        serialize(&self.positions)
    }
}

impl Default for FinGraphLayout {
    fn default() -> Self {
        Self::new()
    }
}

fn serialize<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from(e.to_string()))
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use graph::edge::{AttachSide, EdgeKind};
    use graph::node::Point;
    use layout::compute_layered_layout;

    fn advisory_graph() -> GraphSnapshot {
        let mut advisor = LayoutNode::new("advisor-1");
        advisor.role = Some("advisor".to_string());
        let mut client = LayoutNode::new("client-1");
        client.role = Some("client".to_string());
        let mut account = LayoutNode::new("account-1");
        account.role = Some("account".to_string());

        GraphSnapshot::build(
            vec![advisor, client, account],
            vec![
                LayoutEdge::new("s1", "advisor-1", "client-1", EdgeKind::Structural),
                LayoutEdge::new("s2", "client-1", "account-1", EdgeKind::Structural),
                LayoutEdge::new("t1", "account-1", "advisor-1", EdgeKind::Transactional),
            ],
        )
    }

    /// Full pipeline: snapshot → radial solve → edge side annotation.
    #[test]
    fn test_radial_pipeline_with_edge_sides() {
        let snapshot = advisory_graph();
        let positions =
            compute_radial_layout(&snapshot, &[], &RadialConfig::default());
        assert_eq!(positions.len(), 3);

        let sided = annotate_sides(snapshot.edges(), &positions);
        assert_eq!(sided.len(), 3);
        for edge in &sided {
            // Every annotated side pairs with its opposite
            let expected = match edge.source_side {
                AttachSide::Left => AttachSide::Right,
                AttachSide::Right => AttachSide::Left,
                AttachSide::Top => AttachSide::Bottom,
                AttachSide::Bottom => AttachSide::Top,
            };
            assert_eq!(edge.target_side, expected);
        }
    }

    /// The layered fallback path: no structural edges → identity layout.
    #[test]
    fn test_layered_failure_falls_back_to_identity() {
        let mut placed = LayoutNode::new("a");
        placed.position = Some(Point::new(12.0, 34.0));
        let snapshot = GraphSnapshot::build(
            vec![placed, LayoutNode::new("b")],
            vec![LayoutEdge::new("t1", "a", "b", EdgeKind::Transactional)],
        );

        let positions = match compute_layered_layout(&snapshot, &LayeredConfig::default()) {
            Ok(positions) => positions,
            Err(_) => identity_layout(&snapshot),
        };
        assert_eq!(positions["a"], Point::new(12.0, 34.0));
        assert_eq!(positions["b"], Point::default());
    }

    /// Run tokens: an older layered run's result is suppressed.
    #[test]
    fn test_stale_run_suppressed() {
        let mut runs = RunTracker::new();
        let stale = runs.begin();
        let fresh = runs.begin();
        assert!(!runs.is_current(stale));
        assert!(runs.is_current(fresh));
    }
}
