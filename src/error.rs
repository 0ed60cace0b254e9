//! Error types for the layout engine.
//!
//! Most malformed input is tolerated by design (dangling edges dropped,
//! cycles broken by bounded walks, empty input short-circuits). Errors are
//! reserved for cases the caller must handle: an unknown node reference, or
//! a layered run over a graph with no hierarchy to derive layers from —
//! the caller is expected to fall back to an identity layout for the
//! latter, not crash.

use thiserror::Error;

/// Failures surfaced by the layout solvers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A caller-supplied node id does not exist in the snapshot.
    #[error("unknown node id: {0}")]
    UnknownNode(String),

    /// The layered adapter needs structural edges to assign tiers.
    #[error("no structural edges to derive layers from")]
    NoStructuralEdges,
}
