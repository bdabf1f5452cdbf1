//! Camera control for the cluster scene.
//!
//! The controller owns the [`ViewTransform`] and the selected cluster. It never
//! moves nodes; every operation only changes how the laid-out scene is viewed.
//! Animated operations start a [`Transition`] that the host advances with
//! [`InteractionController::tick`] once per frame.

use super::transform::{Bounds, ScaleExtent, ViewTransform, SCALE_EXTENT};
use super::transition::Transition;
use crate::cluster::{ClusterData, NodeId, Point};
use crate::scene::RenderedScene;

/// Factor applied by one zoom-in step (zoom-out uses the reciprocal).
pub const ZOOM_STEP: f64 = 1.5;
/// Margin added around a focused cluster's nodes.
pub const FOCUS_PADDING: f64 = 80.0;
/// Fraction of the viewport a focused cluster fills.
pub const FOCUS_FILL: f64 = 0.9;
/// Maximum scale reached by focusing.
pub const FOCUS_MAX_SCALE: f64 = 2.0;

pub const ZOOM_DURATION_MS: f64 = 300.0;
pub const RESET_DURATION_MS: f64 = 500.0;
pub const FOCUS_DURATION_MS: f64 = 750.0;

/// Tooltip offset from the pointer.
pub const TOOLTIP_OFFSET: f64 = 15.0;
/// Tooltip box used for edge clamping.
pub const TOOLTIP_WIDTH: f64 = 280.0;
pub const TOOLTIP_HEIGHT: f64 = 120.0;

/// A node under the pointer and where its tooltip goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverHit {
    pub node: NodeId,
    /// Tooltip corner in scene-local (viewport) coordinates.
    pub anchor: Point,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    width: f64,
    height: f64,
    current: ViewTransform,
    transition: Option<Transition>,
    selected: Option<String>,
}

impl InteractionController {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            current: ViewTransform::IDENTITY,
            transition: None,
            selected: None,
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Transform to apply right now.
    pub fn transform(&self) -> ViewTransform {
        self.current
    }

    /// Where the running transition ends, or the current transform.
    pub fn target(&self) -> ViewTransform {
        self.transition.map_or(self.current, |t| t.to)
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn selected_cluster(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Back to identity with nothing selected, no animation.
    pub fn reset_immediate(&mut self) {
        self.current = ViewTransform::IDENTITY;
        self.transition = None;
        self.selected = None;
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Advance the running transition. Returns true while it is still running.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        let (value, done) = transition.sample(now_ms);
        self.current = value;
        if done {
            self.transition = None;
        }
        !done
    }

    /// Freeze at the current transform.
    pub fn stop_animation(&mut self) {
        self.transition = None;
    }

    fn animate_to(&mut self, to: ViewTransform, duration_ms: f64, now_ms: f64) {
        self.transition = Some(Transition::new(self.current, to, now_ms, duration_ms));
    }

    // =========================================================================
    // Camera operations
    // =========================================================================

    /// Zoom in one step about the viewport center.
    pub fn zoom_in(&mut self, now_ms: f64) {
        self.zoom_by(ZOOM_STEP, now_ms);
    }

    /// Zoom out one step about the viewport center.
    pub fn zoom_out(&mut self, now_ms: f64) {
        self.zoom_by(1.0 / ZOOM_STEP, now_ms);
    }

    fn zoom_by(&mut self, factor: f64, now_ms: f64) {
        // Steps compound from the target so rapid clicks are not lost.
        let to = self
            .target()
            .scaled_about(factor, self.viewport_center(), SCALE_EXTENT);
        self.animate_to(to, ZOOM_DURATION_MS, now_ms);
    }

    /// Animate back to identity and clear the selection.
    pub fn reset(&mut self, now_ms: f64) {
        self.selected = None;
        self.animate_to(ViewTransform::IDENTITY, RESET_DURATION_MS, now_ms);
    }

    /// Fit the named cluster's nodes to the viewport and select it.
    ///
    /// Returns false, changing nothing, if the cluster has no positioned nodes.
    pub fn focus_cluster(&mut self, name: &str, data: &ClusterData, now_ms: f64) -> bool {
        let Some(to) = self.focus_transform(name, data) else {
            return false;
        };
        self.selected = Some(name.to_string());
        self.animate_to(to, FOCUS_DURATION_MS, now_ms);
        true
    }

    /// Transform that fits the named cluster, without applying it.
    fn focus_transform(&self, name: &str, data: &ClusterData) -> Option<ViewTransform> {
        let bounds = Bounds::from_points(data.members(name).filter_map(|n| n.position))?;
        Some(ViewTransform::fit(
            &bounds.padded(FOCUS_PADDING),
            self.width,
            self.height,
            FOCUS_FILL,
            ScaleExtent {
                min: SCALE_EXTENT.min,
                max: FOCUS_MAX_SCALE,
            },
        ))
    }

    /// Legend click: focus a cluster, or reset if it is already selected.
    pub fn toggle_legend(&mut self, name: &str, data: &ClusterData, now_ms: f64) -> bool {
        if self.selected.as_deref() == Some(name) {
            self.reset(now_ms);
            true
        } else {
            self.focus_cluster(name, data, now_ms)
        }
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Drag-pan by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.stop_animation();
        self.current = self.current.translated(dx, dy);
    }

    /// Wheel/pinch zoom about a pointer position in scene-local coordinates.
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) {
        self.stop_animation();
        self.current = self.current.scaled_about(factor, anchor, SCALE_EXTENT);
    }

    /// Hit-test the pointer (scene-local coordinates) and place a tooltip.
    pub fn hover(&self, pointer: Point, scene: &RenderedScene) -> Option<HoverHit> {
        let node = scene.node_at(self.current.invert(pointer))?;
        Some(HoverHit {
            node,
            anchor: self.tooltip_anchor(pointer),
        })
    }

    /// Tooltip corner next to the pointer, kept inside the right and bottom edges.
    pub fn tooltip_anchor(&self, pointer: Point) -> Point {
        let x = (pointer.x + TOOLTIP_OFFSET).min(self.width - TOOLTIP_WIDTH);
        let y = (pointer.y + TOOLTIP_OFFSET).min(self.height - TOOLTIP_HEIGHT);
        Point::new(x.max(0.0), y.max(0.0))
    }
}
