//! Issue clusters.
//!
//! Issues are grouped by their primary label into named, colored clusters.
//! [`ClusterData`] is the hand-off between clustering, layout and rendering;
//! it is rebuilt from scratch for every input change.

mod builder;
mod data;
mod node;

pub use builder::{cluster, DEFAULT_CLUSTER_COLOR, MAX_NODES, UNLABELED};
pub use data::{Cluster, ClusterData};
pub use node::{node_radius, ClusterNode, NodeId, Point};
