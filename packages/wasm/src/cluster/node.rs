//! Node type and related structures.
//!
//! A cluster node is the visual stand-in for one issue. It carries:
//! - A stable identifier derived from the issue number
//! - The name and color of the cluster it belongs to
//! - A position in viewport space, absent until a layout pass places it
//!
//! The issue itself is not embedded; resolve it through an
//! [`IssueIndex`](crate::issue::IssueIndex).

use std::fmt;

use crate::issue::IssueId;

/// Stable node identifier.
///
/// Derived from the issue number, so the same issue keeps the same id across
/// rebuilds even though its position may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The issue this node represents.
    #[inline]
    pub fn issue(self) -> IssueId {
        IssueId(self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "issue-{}", self.0)
    }
}

impl From<IssueId> for NodeId {
    #[inline]
    fn from(id: IssueId) -> Self {
        Self(id.0)
    }
}

/// A point in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One visualized issue.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterNode {
    pub id: NodeId,
    /// Name of the owning cluster.
    pub cluster: String,
    /// Fill color, inherited from the cluster.
    pub color: String,
    /// Viewport-space position; `None` until laid out.
    pub position: Option<Point>,
}

impl ClusterNode {
    pub fn new(issue: IssueId, cluster: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: issue.into(),
            cluster: cluster.into(),
            color: color.into(),
            position: None,
        }
    }

    #[inline]
    pub fn issue(&self) -> IssueId {
        self.id.issue()
    }
}

/// Base node radius.
const NODE_BASE_RADIUS: f64 = 6.0;
/// Comment counts above this no longer grow the node.
const NODE_COMMENT_CAP: u32 = 5;
/// Radius added per counted comment.
const NODE_RADIUS_PER_COMMENT: f64 = 0.4;

/// Radius of a node for an issue with `comment_count` comments.
///
/// Monotonic in the comment count but capped, so busy issues cannot dominate
/// the canvas.
#[inline]
pub fn node_radius(comment_count: u32) -> f64 {
    NODE_BASE_RADIUS + f64::from(comment_count.min(NODE_COMMENT_CAP)) * NODE_RADIUS_PER_COMMENT
}
