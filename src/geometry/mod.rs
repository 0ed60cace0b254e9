//! Geometry and packing primitives shared by the layout solvers.

pub mod bbox;
pub mod pack;

pub use bbox::{bounding_box, boxes_overlap, Rect};
pub use pack::{pack_circles, Circle};
