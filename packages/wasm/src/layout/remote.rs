//! Remote layout protocol.
//!
//! The remote service receives a capped projection of the issue set plus the
//! viewport size and answers with viewport-space coordinates for clusters and
//! nodes. Its nodes carry only a minimal issue projection, so they are rejoined
//! to the caller's issues by number before use.
//!
//! Request body:
//!
//! ```json
//! { "issues": [{ "number": 1, "title": "...", "url": "...",
//!                "labels": [{ "name": "bug", "color": "d73a4a" }],
//!                "comments": { "totalCount": 3 } }],
//!   "width": 800, "height": 600, "maxNodes": 30 }
//! ```

use std::collections::HashSet;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::cluster::{Cluster, ClusterData, ClusterNode, Point, MAX_NODES};
use crate::error::LayoutError;
use crate::issue::{Comments, Issue, IssueId, IssueIndex};

/// Body of a remote layout request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteLayoutRequest {
    pub issues: Vec<Issue>,
    pub width: f64,
    pub height: f64,
    pub max_nodes: usize,
}

impl RemoteLayoutRequest {
    /// Build a request from the first [`MAX_NODES`] issues.
    pub fn from_issues<'a, I>(issues: I, width: f64, height: f64) -> Self
    where
        I: IntoIterator<Item = &'a Issue>,
    {
        Self {
            issues: issues.into_iter().take(MAX_NODES).cloned().collect(),
            width,
            height,
            max_nodes: MAX_NODES,
        }
    }
}

/// Body of a remote layout response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteLayoutResponse {
    pub clusters: Vec<RemoteCluster>,
    pub nodes: Vec<RemoteNode>,
    #[serde(default)]
    pub meta: Option<RemoteMeta>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteCluster {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub count: usize,
    pub x: f64,
    pub y: f64,
}

/// A positioned node. The wire `id` and `radius` fields are ignored: both are
/// derived locally from the issue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteNode {
    pub cluster: String,
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub issue: RemoteIssueRef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteIssueRef {
    pub number: IssueId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub comment_count: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteMeta {
    pub total_issues: usize,
    pub processed_issues: usize,
    pub compute_time_ms: f64,
}

/// Something that can carry a layout request to the remote service.
///
/// Dropping the returned future must cancel the request.
pub trait LayoutTransport {
    fn send(
        &self,
        request: &RemoteLayoutRequest,
    ) -> LocalBoxFuture<'static, Result<RemoteLayoutResponse, LayoutError>>;
}

/// Decode a response body.
pub fn decode_response(body: &str) -> Result<RemoteLayoutResponse, LayoutError> {
    serde_json::from_str(body).map_err(|e| LayoutError::Malformed(e.to_string()))
}

/// A remote layout ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct AdoptedLayout {
    pub data: ClusterData,
    /// Minimal issues for response nodes whose number was not in the input set.
    pub stubs: Vec<Issue>,
    /// Server-reported compute time.
    pub compute_time_ms: Option<f64>,
}

/// Turn a response into positioned cluster data.
///
/// Coordinates are taken verbatim. Cluster counts are recomputed from the
/// node list so the count invariant holds whatever the server reported.
pub fn adopt_response(
    response: RemoteLayoutResponse,
    issues: &IssueIndex,
) -> Result<AdoptedLayout, LayoutError> {
    if response.nodes.is_empty() {
        return Err(LayoutError::EmptyResponse);
    }

    let mut clusters = Vec::with_capacity(response.clusters.len());
    for remote in response.clusters {
        let position = Point::new(remote.x, remote.y);
        if !position.is_finite() {
            return Err(LayoutError::Malformed(format!(
                "cluster {:?} has no finite position",
                remote.name
            )));
        }
        clusters.push(Cluster {
            name: remote.name,
            color: remote.color,
            count: 0,
            position: Some(position),
        });
    }

    let mut seen = HashSet::with_capacity(response.nodes.len());
    let mut nodes = Vec::with_capacity(response.nodes.len());
    let mut stubs = Vec::new();
    for remote in response.nodes {
        let number = remote.issue.number;
        if !seen.insert(number) {
            return Err(LayoutError::Malformed(format!("issue {number} appears twice")));
        }
        let position = Point::new(remote.x, remote.y);
        if !position.is_finite() {
            return Err(LayoutError::Malformed(format!(
                "issue {number} has no finite position"
            )));
        }
        let Some(cluster) = clusters.iter_mut().find(|c| c.name == remote.cluster) else {
            return Err(LayoutError::Malformed(format!(
                "issue {number} refers to unknown cluster {:?}",
                remote.cluster
            )));
        };
        cluster.count += 1;

        if !issues.contains(number) {
            stubs.push(Issue {
                number,
                title: remote.issue.title,
                url: remote.issue.url,
                labels: Vec::new(),
                comments: Comments {
                    total_count: remote.issue.comment_count,
                },
            });
        }

        let mut node = ClusterNode::new(number, remote.cluster, remote.color);
        node.position = Some(position);
        nodes.push(node);
    }

    Ok(AdoptedLayout {
        data: ClusterData { clusters, nodes },
        stubs,
        compute_time_ms: response.meta.map(|meta| meta.compute_time_ms),
    })
}
