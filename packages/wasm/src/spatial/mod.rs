//! Spatial indexing for hit testing rendered nodes.

mod rtree;

pub use rtree::{NodeCircle, SpatialIndex};
