//! R-tree index over node circles using the rstar crate.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::cluster::{NodeId, Point};

/// A node circle stored in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeCircle {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl NodeCircle {
    pub fn new(id: NodeId, center: Point, radius: f64) -> Self {
        Self {
            id,
            x: center.x,
            y: center.y,
            radius,
        }
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        self.distance_2(&[x, y]) <= self.radius * self.radius
    }
}

impl RTreeObject for NodeCircle {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for NodeCircle {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index for hit testing rendered nodes.
///
/// Built once per layout with [`RTree::bulk_load`]; positions never change
/// while a layout is displayed, so there is no incremental update.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    tree: RTree<NodeCircle>,
    max_radius: f64,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from node circles.
    pub fn bulk_load(circles: Vec<NodeCircle>) -> Self {
        let max_radius = circles.iter().map(|c| c.radius).fold(0.0, f64::max);
        Self {
            tree: RTree::bulk_load(circles),
            max_radius,
        }
    }

    /// The closest node whose circle contains the point.
    ///
    /// Overlapping circles resolve to the one whose center is nearest.
    pub fn hit(&self, point: Point) -> Option<NodeId> {
        let query = [point.x, point.y];
        let reach = self.max_radius * self.max_radius;
        self.tree
            .nearest_neighbor_iter(&query)
            .take_while(|c| c.distance_2(&query) <= reach)
            .find(|c| c.contains(point.x, point.y))
            .map(|c| c.id)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
