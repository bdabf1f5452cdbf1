//! Full redraw of a positioned [`ClusterData`] onto a [`RenderSurface`].

use std::collections::HashMap;

use log::{debug, warn};

use super::surface::{ClusterBadge, EventSink, NodeGlyph, RenderSurface};
use crate::cluster::{ClusterData, NodeId, Point};
use crate::issue::IssueIndex;
use crate::spatial::{NodeCircle, SpatialIndex};

/// What was drawn by the last render, kept for hit testing.
#[derive(Debug, Default)]
pub struct RenderedScene {
    index: SpatialIndex,
    glyphs: HashMap<NodeId, NodeGlyph>,
    badges: Vec<ClusterBadge>,
}

impl RenderedScene {
    /// A scene with nothing drawn.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Node under a point in layout coordinates.
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.index.hit(point)
    }

    pub fn glyph(&self, id: NodeId) -> Option<&NodeGlyph> {
        self.glyphs.get(&id)
    }

    pub fn badges(&self) -> &[ClusterBadge] {
        &self.badges
    }

    pub fn node_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty() && self.badges.is_empty()
    }
}

/// Draws cluster badges and issue nodes.
///
/// The renderer never computes positions or transforms. It draws what the
/// layout produced and wires the surface's gestures to `sink`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SceneRenderer;

impl SceneRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<S>(
        &self,
        surface: &mut S,
        data: &ClusterData,
        issues: &IssueIndex,
        width: f64,
        height: f64,
        sink: EventSink,
    ) -> RenderedScene
    where
        S: RenderSurface + ?Sized,
    {
        surface.clear();
        surface.draw_background(width, height);

        let mut glyphs = HashMap::with_capacity(data.nodes.len());
        let mut circles = Vec::with_capacity(data.nodes.len());
        for node in &data.nodes {
            let Some(position) = node.position else {
                warn!("skipping unpositioned node {}", node.id);
                continue;
            };
            let Some(issue) = issues.get(node.issue()) else {
                warn!("skipping node {} with no issue", node.id);
                continue;
            };
            let glyph = NodeGlyph::new(node, position, issue);
            surface.draw_node(&glyph);
            circles.push(NodeCircle::new(glyph.id, position, glyph.radius));
            glyphs.insert(glyph.id, glyph);
        }

        // Badges go on top
        let mut badges = Vec::with_capacity(data.clusters.len());
        for cluster in &data.clusters {
            let Some(center) = cluster.position else {
                warn!("skipping unpositioned cluster {:?}", cluster.name);
                continue;
            };
            let badge = ClusterBadge::for_cluster(cluster, center);
            surface.draw_cluster(&badge);
            badges.push(badge);
        }

        surface.install_gestures(sink);
        debug!(
            "rendered {} nodes and {} cluster badges",
            glyphs.len(),
            badges.len()
        );

        RenderedScene {
            index: SpatialIndex::bulk_load(circles),
            glyphs,
            badges,
        }
    }
}
