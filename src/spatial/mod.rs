//! Spatial indexing for overlap queries.

pub mod index;

pub use index::{BoxIndex, NodeBox};
