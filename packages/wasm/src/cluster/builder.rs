//! The clustering pass: issues in, unpositioned clusters and nodes out.

use std::collections::HashMap;

use super::data::{Cluster, ClusterData};
use super::node::ClusterNode;
use crate::issue::{normalize_color, Issue};

/// Maximum number of issues visualized per layout pass.
///
/// A hard cap to keep the scene tractable: the first `MAX_NODES` issues in
/// input order are kept, the rest are dropped.
pub const MAX_NODES: usize = 30;

/// Cluster name for issues without labels.
pub const UNLABELED: &str = "Unlabeled";

/// Color of the [`UNLABELED`] cluster.
pub const DEFAULT_CLUSTER_COLOR: &str = "#8b949e";

/// Group issues into clusters keyed by their first label.
///
/// Clusters appear in order of first occurrence. The output nodes carry no
/// position. Pure function of the input.
pub fn cluster<'a, I>(issues: I) -> ClusterData
where
    I: IntoIterator<Item = &'a Issue>,
{
    let mut data = ClusterData::default();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for issue in issues.into_iter().take(MAX_NODES) {
        let (name, color) = match issue.primary_label() {
            Some(label) => (label.name.clone(), normalize_color(&label.color)),
            None => (UNLABELED.to_string(), DEFAULT_CLUSTER_COLOR.to_string()),
        };

        let slot = *slots.entry(name.clone()).or_insert_with(|| {
            data.clusters.push(Cluster::new(name.clone(), color));
            data.clusters.len() - 1
        });
        let cluster = &mut data.clusters[slot];
        cluster.count += 1;

        data.nodes
            .push(ClusterNode::new(issue.number, name, cluster.color.clone()));
    }

    data
}
