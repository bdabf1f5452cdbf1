//! A headless surface that records what it is asked to draw.

use super::surface::{ClusterBadge, EventSink, NodeGlyph, RenderSurface, SceneEvent, Tooltip};
use crate::interaction::ViewTransform;

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Background { width: f64, height: f64 },
    Cluster(ClusterBadge),
    Node(NodeGlyph),
    InstallGestures,
    Transform(ViewTransform),
    Tooltip(Option<Tooltip>),
    Highlight(Option<String>),
}

/// Surface that keeps a log of draw calls and the resulting scene state.
///
/// Useful wherever there is no display: tests, and hosts that only want the
/// computed layout. Pointer input can be simulated through [`emit`].
///
/// [`emit`]: RecordingSurface::emit
#[derive(Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
    clusters: Vec<ClusterBadge>,
    nodes: Vec<NodeGlyph>,
    transform: ViewTransform,
    tooltip: Option<Tooltip>,
    highlighted: Option<String>,
    size: Option<(f64, f64)>,
    sink: Option<EventSink>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call since creation, in order.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drop the call log, keeping the scene state.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Badges drawn since the last clear.
    pub fn clusters(&self) -> &[ClusterBadge] {
        &self.clusters
    }

    /// Nodes drawn since the last clear.
    pub fn nodes(&self) -> &[NodeGlyph] {
        &self.nodes
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn size(&self) -> Option<(f64, f64)> {
        self.size
    }

    pub fn has_gestures(&self) -> bool {
        self.sink.is_some()
    }

    /// The installed event sink, if any.
    ///
    /// Clone it out before calling so no borrow of the surface is held while
    /// the view handles the event.
    pub fn sink(&self) -> Option<EventSink> {
        self.sink.clone()
    }

    /// Deliver `event` to the installed sink. Returns false if none is installed.
    pub fn emit(&self, event: SceneEvent) -> bool {
        match &self.sink {
            Some(sink) => {
                sink(event);
                true
            }
            None => false,
        }
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
        self.clusters.clear();
        self.nodes.clear();
        self.tooltip = None;
        self.highlighted = None;
        self.size = None;
        self.sink = None;
    }

    fn draw_background(&mut self, width: f64, height: f64) {
        self.calls.push(DrawCall::Background { width, height });
        self.size = Some((width, height));
    }

    fn draw_cluster(&mut self, badge: &ClusterBadge) {
        self.calls.push(DrawCall::Cluster(badge.clone()));
        self.clusters.push(badge.clone());
    }

    fn draw_node(&mut self, glyph: &NodeGlyph) {
        self.calls.push(DrawCall::Node(glyph.clone()));
        self.nodes.push(glyph.clone());
    }

    fn install_gestures(&mut self, sink: EventSink) {
        self.calls.push(DrawCall::InstallGestures);
        self.sink = Some(sink);
    }

    fn apply_transform(&mut self, transform: &ViewTransform) {
        self.calls.push(DrawCall::Transform(*transform));
        self.transform = *transform;
    }

    fn show_tooltip(&mut self, tooltip: Option<&Tooltip>) {
        self.calls.push(DrawCall::Tooltip(tooltip.cloned()));
        self.tooltip = tooltip.cloned();
    }

    fn highlight_cluster(&mut self, name: Option<&str>) {
        self.calls.push(DrawCall::Highlight(name.map(str::to_string)));
        self.highlighted = name.map(str::to_string);
    }
}
