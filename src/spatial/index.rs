//! R-tree based box index using the rstar crate.
//!
//! Indexes node bounding boxes for O(log n) intersection queries. The
//! radial solver uses it to find locked nodes whose boxes an unlocked
//! node would collide with after relaxation.

use rstar::{RTree, RTreeObject, AABB};

use crate::graph::node::Point;

/// A node's bounding box in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    /// Snapshot index of the node.
    pub index: usize,
    /// Box center.
    pub center: Point,
    /// Half extents (half-width, half-height).
    pub half: (f64, f64),
}

impl NodeBox {
    /// Create a new node box.
    pub fn new(index: usize, center: Point, half: (f64, f64)) -> Self {
        Self {
            index,
            center,
            half,
        }
    }
}

impl RTreeObject for NodeBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.center.x - self.half.0, self.center.y - self.half.1],
            [self.center.x + self.half.0, self.center.y + self.half.1],
        )
    }
}

/// Spatial index over node bounding boxes.
pub struct BoxIndex {
    tree: RTree<NodeBox>,
}

impl BoxIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-load an index from node boxes.
    pub fn bulk(boxes: Vec<NodeBox>) -> Self {
        Self {
            tree: RTree::bulk_load(boxes),
        }
    }

    /// Insert a box.
    pub fn insert(&mut self, node_box: NodeBox) {
        self.tree.insert(node_box);
    }

    /// Indices of all boxes intersecting the query box inflated by
    /// `padding` on every side.
    pub fn intersecting(&self, center: Point, half: (f64, f64), padding: f64) -> Vec<usize> {
        let envelope = AABB::from_corners(
            [
                center.x - half.0 - padding,
                center.y - half.1 - padding,
            ],
            [
                center.x + half.0 + padding,
                center.y + half.1 + padding,
            ],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|b| b.index)
            .collect()
    }

    /// Number of boxes in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// True when the index holds no boxes.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for BoxIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let index = BoxIndex::new();
        assert!(index.is_empty());
        assert!(index
            .intersecting(Point::default(), (10.0, 10.0), 0.0)
            .is_empty());
    }

    #[test]
    fn test_intersecting() {
        let index = BoxIndex::bulk(vec![
            NodeBox::new(0, Point::new(0.0, 0.0), (5.0, 5.0)),
            NodeBox::new(1, Point::new(100.0, 0.0), (5.0, 5.0)),
            NodeBox::new(2, Point::new(0.0, 100.0), (5.0, 5.0)),
        ]);
        assert_eq!(index.len(), 3);

        let hits = index.intersecting(Point::new(8.0, 0.0), (5.0, 5.0), 0.0);
        assert_eq!(hits, vec![0]);

        // Query far from everything
        assert!(index
            .intersecting(Point::new(50.0, 50.0), (2.0, 2.0), 0.0)
            .is_empty());
    }

    #[test]
    fn test_padding_widens_query() {
        let index = BoxIndex::bulk(vec![NodeBox::new(0, Point::new(20.0, 0.0), (5.0, 5.0))]);

        assert!(index
            .intersecting(Point::new(0.0, 0.0), (5.0, 5.0), 0.0)
            .is_empty());
        let hits = index.intersecting(Point::new(0.0, 0.0), (5.0, 5.0), 12.0);
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn test_incremental_insert() {
        let mut index = BoxIndex::new();
        index.insert(NodeBox::new(3, Point::new(1.0, 1.0), (2.0, 2.0)));
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.intersecting(Point::new(0.0, 0.0), (1.0, 1.0), 1.5),
            vec![3]
        );
    }
}
