//! The drawing surface the scene renderer targets.
//!
//! Everything the renderer draws is described by plain values, so a surface
//! only has to turn them into pixels (or SVG elements, or a call log).

use std::rc::Rc;

use crate::cluster::{Cluster, ClusterNode, NodeId, Point};
use crate::interaction::ViewTransform;
use crate::issue::Issue;

/// Cluster names longer than this are truncated on badges.
pub const BADGE_NAME_LIMIT: usize = 10;
/// Badges sit this far above their cluster center.
pub const BADGE_OFFSET_Y: f64 = 60.0;

/// Shorten a cluster name for its badge.
pub fn badge_name(name: &str) -> String {
    if name.chars().count() > BADGE_NAME_LIMIT {
        let head: String = name.chars().take(BADGE_NAME_LIMIT).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Clickable label drawn above a cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterBadge {
    /// Full cluster name, reported back on click.
    pub name: String,
    /// Display text: truncated name and member count.
    pub label: String,
    pub color: String,
    pub count: usize,
    pub x: f64,
    pub y: f64,
}

impl ClusterBadge {
    /// Badge for a positioned cluster.
    pub fn for_cluster(cluster: &Cluster, center: Point) -> Self {
        Self {
            name: cluster.name.clone(),
            label: format!("{} ({})", badge_name(&cluster.name), cluster.count),
            color: cluster.color.clone(),
            count: cluster.count,
            x: center.x,
            y: center.y - BADGE_OFFSET_Y,
        }
    }
}

/// One issue circle.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGlyph {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: String,
    pub cluster: String,
    pub title: String,
    pub url: String,
    pub comments: u32,
    /// Accessible name: issue number, title and cluster.
    pub aria_label: String,
}

impl NodeGlyph {
    pub fn new(node: &ClusterNode, center: Point, issue: &Issue) -> Self {
        let comments = issue.comment_count();
        Self {
            id: node.id,
            x: center.x,
            y: center.y,
            radius: crate::cluster::node_radius(comments),
            color: node.color.clone(),
            cluster: node.cluster.clone(),
            title: issue.title.clone(),
            url: issue.url.clone(),
            comments,
            aria_label: format!(
                "Issue #{}: {} ({})",
                issue.number.0, issue.title, node.cluster
            ),
        }
    }
}

/// Hover card for a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub node: NodeId,
    pub title: String,
    pub cluster: String,
    pub comments: u32,
    pub url: String,
    /// Top-left corner in viewport coordinates.
    pub x: f64,
    pub y: f64,
}

impl Tooltip {
    pub fn new(glyph: &NodeGlyph, anchor: Point) -> Self {
        Self {
            node: glyph.id,
            title: glyph.title.clone(),
            cluster: glyph.cluster.clone(),
            comments: glyph.comments,
            url: glyph.url.clone(),
            x: anchor.x,
            y: anchor.y,
        }
    }
}

/// Pointer input reported by a surface.
///
/// Coordinates are viewport-local: relative to the surface's top-left corner,
/// before the view transform.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Drag by a screen-space delta.
    Pan { dx: f64, dy: f64 },
    /// Wheel or pinch zoom about a pointer position.
    Zoom { factor: f64, x: f64, y: f64 },
    /// Click on empty canvas.
    BackgroundClick,
    /// Click on a cluster badge.
    ClusterClick(String),
    PointerMove { x: f64, y: f64 },
    PointerLeave,
}

/// Where a surface delivers its [`SceneEvent`]s.
pub type EventSink = Rc<dyn Fn(SceneEvent)>;

/// A resizable 2D vector surface with pointer input.
///
/// Drawing happens in layout coordinates inside a group that
/// [`apply_transform`](RenderSurface::apply_transform) positions. Tooltips are
/// drawn outside that group, in viewport coordinates.
pub trait RenderSurface {
    /// Remove everything drawn so far, including installed gesture handlers.
    fn clear(&mut self);

    /// Size the surface and draw the background that receives canvas clicks.
    fn draw_background(&mut self, width: f64, height: f64);

    fn draw_cluster(&mut self, badge: &ClusterBadge);

    fn draw_node(&mut self, glyph: &NodeGlyph);

    /// Start reporting pointer input to `sink`, replacing any previous sink.
    fn install_gestures(&mut self, sink: EventSink);

    fn apply_transform(&mut self, transform: &ViewTransform);

    /// Show a tooltip, or hide it with `None`.
    fn show_tooltip(&mut self, tooltip: Option<&Tooltip>);

    /// Emphasize one cluster's badge and nodes, or none.
    fn highlight_cluster(&mut self, name: Option<&str>);
}
