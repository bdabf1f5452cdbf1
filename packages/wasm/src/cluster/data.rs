//! Cluster list plus node list, as passed between pipeline stages.

use std::collections::HashMap;

use super::node::{ClusterNode, Point};

/// A named, colored group of nodes sharing a primary label.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub name: String,
    pub color: String,
    /// Number of member nodes.
    pub count: usize,
    /// Center in viewport space; `None` until laid out.
    pub position: Option<Point>,
}

impl Cluster {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            count: 0,
            position: None,
        }
    }
}

/// Clusters and nodes of one layout pass.
///
/// Both strategies of the layout computer produce this same shape, so the
/// renderer never needs to know which one ran.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterData {
    pub clusters: Vec<Cluster>,
    pub nodes: Vec<ClusterNode>,
}

impl ClusterData {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.name == name)
    }

    /// Nodes belonging to the named cluster, in node order.
    pub fn members<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ClusterNode> + 'a {
        self.nodes.iter().filter(move |node| node.cluster == name)
    }

    /// True once every cluster and node has a position.
    pub fn is_positioned(&self) -> bool {
        self.clusters.iter().all(|c| c.position.is_some())
            && self.nodes.iter().all(|n| n.position.is_some())
    }

    /// Check the structural invariants:
    /// cluster names are unique, every node names exactly one cluster, and each
    /// cluster's count equals its number of member nodes.
    pub fn validate(&self) -> Result<(), String> {
        let mut counts: HashMap<&str, usize> = HashMap::with_capacity(self.clusters.len());
        for cluster in &self.clusters {
            if counts.insert(cluster.name.as_str(), 0).is_some() {
                return Err(format!("duplicate cluster {:?}", cluster.name));
            }
        }

        for node in &self.nodes {
            match counts.get_mut(node.cluster.as_str()) {
                Some(count) => *count += 1,
                None => {
                    return Err(format!(
                        "{} refers to unknown cluster {:?}",
                        node.id, node.cluster
                    ));
                }
            }
        }

        for cluster in &self.clusters {
            let actual = counts[cluster.name.as_str()];
            if actual != cluster.count {
                return Err(format!(
                    "cluster {:?} reports {} members but has {}",
                    cluster.name, cluster.count, actual
                ));
            }
        }
        Ok(())
    }
}
