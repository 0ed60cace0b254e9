//! Graph data model: input records, immutable snapshots, partitioning.

pub mod edge;
pub mod node;
pub mod partition;
pub mod snapshot;

pub use edge::{annotate_sides, AttachSide, EdgeKind, LayoutEdge, SidedEdge};
pub use node::{LayoutNode, NodeRole, Point};
pub use partition::{connected_components, Component};
pub use snapshot::GraphSnapshot;
