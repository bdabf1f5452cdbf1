//! Lifecycle coordinator: debounced rebuilds, cancellation, teardown.
//!
//! Owns the render surface, the interaction controller and whatever work is
//! in flight on their behalf:
//!
//! - the pending rebuild (debounce sleep, then layout, possibly a remote
//!   request), held as a [`TaskGuard`];
//! - the running camera animation, also a [`TaskGuard`].
//!
//! A new rebuild drops the previous guard, which aborts its timer and its
//! request. A generation counter backs this up: a layout that completes for a
//! superseded rebuild is discarded before it reaches the surface.

use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::{debug, info};

use super::scheduler::{Scheduler, TaskGuard};
use crate::cluster::{cluster, Cluster, ClusterData, NodeId, Point};
use crate::config::ViewConfig;
use crate::error::ViewError;
use crate::interaction::{InteractionController, ViewTransform};
use crate::issue::{Issue, IssueId, IssueIndex};
use crate::layout::{LayoutComputer, LayoutOutcome, LayoutPhase, LayoutStrategy, LayoutTransport};
use crate::scene::{EventSink, RenderSurface, RenderedScene, SceneEvent, SceneRenderer, Tooltip};

/// The inputs of one rebuild. Equal inputs do not trigger a second rebuild.
#[derive(Debug, Clone, PartialEq)]
struct RebuildInput {
    issues: Vec<Issue>,
    width: f64,
    height: f64,
}

/// What is currently on screen.
struct ViewState<S> {
    surface: S,
    controller: InteractionController,
    data: ClusterData,
    issues: IssueIndex,
    scene: RenderedScene,
    strategy: Option<LayoutStrategy>,
    hovered: Option<NodeId>,
}

/// State shared with spawned tasks and the surface's event sink.
///
/// Tasks and the sink only hold a [`Weak`] reference, so dropping the
/// coordinator releases everything.
struct Shared<S> {
    state: RefCell<ViewState<S>>,
    animation: RefCell<Option<TaskGuard>>,
    scheduler: Rc<dyn Scheduler>,
    renderer: SceneRenderer,
    generation: Cell<u64>,
    disposed: Cell<bool>,
}

impl<S: RenderSurface + 'static> Shared<S> {
    fn now(&self) -> f64 {
        self.scheduler.now_ms()
    }

    fn event_sink(self: &Rc<Self>) -> EventSink {
        let shared = Rc::downgrade(self);
        Rc::new(move |event| {
            if let Some(shared) = shared.upgrade() {
                shared.handle_event(event);
            }
        })
    }

    // =========================================================================
    // Animation
    // =========================================================================

    fn stop_animation(&self) {
        let guard = self.animation.borrow_mut().take();
        drop(guard);
        self.state.borrow_mut().controller.stop_animation();
    }

    /// Step the controller's transition once per frame until it settles.
    fn animate(self: &Rc<Self>) {
        if !self.state.borrow().controller.is_animating() {
            return;
        }
        let shared = Rc::downgrade(self);
        let scheduler = self.scheduler.clone();
        let task = async move {
            loop {
                let now = scheduler.next_frame().await;
                let Some(shared) = shared.upgrade() else {
                    return;
                };
                if !shared.step_animation(now) {
                    return;
                }
            }
        };
        let guard = TaskGuard::spawn(self.scheduler.as_ref(), task);
        // Replacing the old guard aborts the old loop.
        *self.animation.borrow_mut() = Some(guard);
    }

    fn step_animation(&self, now: f64) -> bool {
        let mut state = self.state.borrow_mut();
        let running = state.controller.tick(now);
        let transform = state.controller.transform();
        state.surface.apply_transform(&transform);
        running
    }

    // =========================================================================
    // Camera commands
    // =========================================================================

    fn zoom(self: &Rc<Self>, zoom_in: bool) {
        let now = self.now();
        {
            let mut state = self.state.borrow_mut();
            if zoom_in {
                state.controller.zoom_in(now);
            } else {
                state.controller.zoom_out(now);
            }
        }
        self.animate();
    }

    fn reset(self: &Rc<Self>) {
        let now = self.now();
        {
            let mut state = self.state.borrow_mut();
            state.controller.reset(now);
            state.surface.highlight_cluster(None);
        }
        self.animate();
    }

    fn focus(self: &Rc<Self>, name: &str, toggle: bool) -> bool {
        let now = self.now();
        let changed = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            let changed = if toggle {
                state.controller.toggle_legend(name, &state.data, now)
            } else {
                state.controller.focus_cluster(name, &state.data, now)
            };
            if changed {
                state
                    .surface
                    .highlight_cluster(state.controller.selected_cluster());
            }
            changed
        };
        if changed {
            self.animate();
        }
        changed
    }

    // =========================================================================
    // Surface events
    // =========================================================================

    fn handle_event(self: &Rc<Self>, event: SceneEvent) {
        if self.disposed.get() {
            return;
        }
        match event {
            SceneEvent::Pan { dx, dy } => {
                self.stop_animation();
                let mut state = self.state.borrow_mut();
                state.controller.pan_by(dx, dy);
                let transform = state.controller.transform();
                state.surface.apply_transform(&transform);
            }
            SceneEvent::Zoom { factor, x, y } => {
                self.stop_animation();
                let mut state = self.state.borrow_mut();
                state.controller.zoom_at(factor, Point::new(x, y));
                let transform = state.controller.transform();
                state.surface.apply_transform(&transform);
            }
            SceneEvent::BackgroundClick => self.reset(),
            SceneEvent::ClusterClick(name) => {
                self.focus(&name, false);
            }
            SceneEvent::PointerMove { x, y } => self.hover(Point::new(x, y)),
            SceneEvent::PointerLeave => {
                let mut state = self.state.borrow_mut();
                if state.hovered.take().is_some() {
                    state.surface.show_tooltip(None);
                }
            }
        }
    }

    fn hover(&self, pointer: Point) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let tooltip = state
            .controller
            .hover(pointer, &state.scene)
            .and_then(|hit| {
                let glyph = state.scene.glyph(hit.node)?;
                Some(Tooltip::new(glyph, hit.anchor))
            });
        match tooltip {
            Some(tooltip) => {
                state.hovered = Some(tooltip.node);
                state.surface.show_tooltip(Some(&tooltip));
            }
            None => {
                if state.hovered.take().is_some() {
                    state.surface.show_tooltip(None);
                }
            }
        }
    }

    // =========================================================================
    // Rebuild results
    // =========================================================================

    /// Draw a finished layout and reset the camera.
    fn install(self: &Rc<Self>, outcome: LayoutOutcome, mut issues: IssueIndex, width: f64, height: f64) {
        for stub in outcome.stubs {
            issues.insert_if_absent(Rc::new(stub));
        }
        let sink = self.event_sink();

        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.controller.resize(width, height);
        state.controller.reset_immediate();
        state.scene =
            self.renderer
                .render(&mut state.surface, &outcome.data, &issues, width, height, sink);
        state.surface.apply_transform(&ViewTransform::IDENTITY);

        info!(
            "topic clusters rendered: {} nodes in {} clusters via {}",
            state.scene.node_count(),
            outcome.data.clusters.len(),
            outcome.strategy
        );
        state.data = outcome.data;
        state.issues = issues;
        state.strategy = Some(outcome.strategy);
        state.hovered = None;
    }

    /// Nothing to show: clear the surface.
    fn install_empty(&self, width: f64, height: f64) {
        let mut state = self.state.borrow_mut();
        state.surface.clear();
        state.controller.resize(width, height);
        state.controller.reset_immediate();
        state.scene = RenderedScene::empty();
        state.data = ClusterData::default();
        state.issues = IssueIndex::default();
        state.strategy = None;
        state.hovered = None;
        debug!("no issues to visualize");
    }
}

/// Supervises the cluster -> layout -> render pipeline for one view.
///
/// All operations are synchronous apart from [`rebuild`], which schedules the
/// pipeline behind a debounce timer and returns immediately.
///
/// [`rebuild`]: LifecycleCoordinator::rebuild
pub struct LifecycleCoordinator<S: RenderSurface + 'static> {
    shared: Rc<Shared<S>>,
    computer: Rc<LayoutComputer>,
    debounce: Duration,
    pending: Option<TaskGuard>,
    last_input: Option<RebuildInput>,
}

impl<S: RenderSurface + 'static> LifecycleCoordinator<S> {
    /// Create a view drawing into `surface`.
    ///
    /// Without a transport every layout is computed locally.
    pub fn new(
        surface: S,
        scheduler: Rc<dyn Scheduler>,
        config: &ViewConfig,
        transport: Option<Rc<dyn LayoutTransport>>,
    ) -> Self {
        let mut computer = LayoutComputer::new(scheduler.clone()).with_timeout(config.remote_timeout());
        if let Some(transport) = transport {
            computer = computer.with_transport(transport);
        }

        let state = ViewState {
            surface,
            controller: InteractionController::new(0.0, 0.0),
            data: ClusterData::default(),
            issues: IssueIndex::default(),
            scene: RenderedScene::empty(),
            strategy: None,
            hovered: None,
        };

        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(state),
                animation: RefCell::new(None),
                scheduler,
                renderer: SceneRenderer::new(),
                generation: Cell::new(0),
                disposed: Cell::new(false),
            }),
            computer: Rc::new(computer),
            debounce: config.debounce(),
            pending: None,
            last_input: None,
        }
    }

    // =========================================================================
    // Rebuild
    // =========================================================================

    /// Schedule a rebuild for a new issue set or viewport size.
    ///
    /// Calls within the debounce window collapse into one rebuild, and any
    /// rebuild still waiting or requesting a remote layout is cancelled.
    /// Repeating the last inputs does nothing.
    pub fn rebuild(&mut self, issues: Vec<Issue>, width: f64, height: f64) -> Result<(), ViewError> {
        if self.shared.disposed.get() {
            return Err(ViewError::Disposed);
        }
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ViewError::InvalidViewport { width, height });
        }

        let input = RebuildInput {
            issues,
            width,
            height,
        };
        if self.last_input.as_ref() == Some(&input) {
            debug!("rebuild skipped, inputs unchanged");
            return Ok(());
        }
        self.last_input = Some(input.clone());

        let generation = self.shared.generation.get() + 1;
        self.shared.generation.set(generation);
        // Aborts the previous debounce timer and remote request.
        self.pending = None;

        let shared = Rc::downgrade(&self.shared);
        let computer = self.computer.clone();
        let scheduler = self.shared.scheduler.clone();
        let debounce = self.debounce;
        let task = async move {
            scheduler.sleep(debounce).await;
            run_pipeline(shared, computer, generation, input).await;
        };
        self.pending = Some(TaskGuard::spawn(self.shared.scheduler.as_ref(), task));
        debug!("rebuild {generation} scheduled");
        Ok(())
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    pub fn zoom_in(&self) {
        if !self.is_disposed() {
            self.shared.zoom(true);
        }
    }

    pub fn zoom_out(&self) {
        if !self.is_disposed() {
            self.shared.zoom(false);
        }
    }

    /// Animate back to identity and clear the selected cluster.
    pub fn reset_view(&self) {
        if !self.is_disposed() {
            self.shared.reset();
        }
    }

    /// Fit the named cluster to the viewport. Returns false if it is not shown.
    pub fn focus_cluster(&self, name: &str) -> bool {
        !self.is_disposed() && self.shared.focus(name, false)
    }

    /// Legend click: focus the cluster, or reset if it is already selected.
    pub fn toggle_legend(&self, name: &str) -> bool {
        !self.is_disposed() && self.shared.focus(name, true)
    }

    /// Handle pointer input as if the surface had reported it.
    pub fn dispatch(&self, event: SceneEvent) {
        self.shared.handle_event(event);
    }

    pub fn stop_animation(&self) {
        self.shared.stop_animation();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn transform(&self) -> ViewTransform {
        self.shared.state.borrow().controller.transform()
    }

    pub fn selected_cluster(&self) -> Option<String> {
        self.shared
            .state
            .borrow()
            .controller
            .selected_cluster()
            .map(str::to_string)
    }

    /// Clusters currently shown, for the legend.
    pub fn clusters(&self) -> Vec<Cluster> {
        self.shared.state.borrow().data.clusters.clone()
    }

    /// The positioned data currently shown.
    pub fn cluster_data(&self) -> Ref<'_, ClusterData> {
        Ref::map(self.shared.state.borrow(), |state| &state.data)
    }

    /// The issue behind a shown node.
    pub fn issue(&self, id: IssueId) -> Option<Rc<Issue>> {
        self.shared.state.borrow().issues.get(id).cloned()
    }

    /// How the shown layout was computed, if anything is shown.
    pub fn layout_strategy(&self) -> Option<LayoutStrategy> {
        self.shared.state.borrow().strategy.clone()
    }

    pub fn layout_phase(&self) -> LayoutPhase {
        self.computer.phase()
    }

    pub fn is_animating(&self) -> bool {
        self.shared.animation.borrow().is_some() && self.shared.state.borrow().controller.is_animating()
    }

    pub fn surface(&self) -> Ref<'_, S> {
        Ref::map(self.shared.state.borrow(), |state| &state.surface)
    }

    /// Run `f` with the surface borrowed mutably.
    ///
    /// `f` must not call back into the view.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.shared.state.borrow_mut().surface)
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Cancel all pending work and clear the surface. Idempotent.
    pub fn dispose(&mut self) {
        if self.shared.disposed.replace(true) {
            return;
        }
        self.pending = None;
        self.shared.stop_animation();
        self.shared.generation.set(self.shared.generation.get() + 1);
        if let Ok(mut state) = self.shared.state.try_borrow_mut() {
            state.surface.clear();
        }
        info!("topic cluster view disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.get()
    }
}

impl<S: RenderSurface + 'static> Drop for LifecycleCoordinator<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Cluster, lay out and render one rebuild's inputs.
async fn run_pipeline<S: RenderSurface + 'static>(
    shared: Weak<Shared<S>>,
    computer: Rc<LayoutComputer>,
    generation: u64,
    input: RebuildInput,
) {
    let RebuildInput {
        issues,
        width,
        height,
    } = input;

    {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        shared.stop_animation();
    }

    let issues = IssueIndex::new(issues);
    let data = cluster(issues.iter().map(|issue| issue.as_ref()));
    if data.is_empty() {
        if let Some(shared) = shared.upgrade() {
            shared.install_empty(width, height);
        }
        return;
    }

    let outcome = computer.layout(&data, &issues, width, height).await;

    let Some(shared) = shared.upgrade() else {
        return;
    };
    if shared.generation.get() != generation {
        debug!("discarding layout for superseded rebuild {generation}");
        return;
    }
    shared.install(outcome, issues, width, height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::layout::remote::decode_response;
    use crate::layout::FallbackReason;
    use crate::scene::{DrawCall, RecordingSurface};
    use crate::testing::{example_issues, issue, remote_response_json, ChannelTransport, TestRuntime};

    struct Fixture {
        runtime: TestRuntime,
        transport: Rc<ChannelTransport>,
        view: LifecycleCoordinator<RecordingSurface>,
    }

    impl Fixture {
        fn new(with_transport: bool) -> Self {
            let runtime = TestRuntime::new();
            let transport = Rc::new(ChannelTransport::default());
            let remote: Option<Rc<dyn LayoutTransport>> = if with_transport {
                Some(transport.clone())
            } else {
                None
            };
            let view = LifecycleCoordinator::new(
                RecordingSurface::new(),
                runtime.scheduler(),
                &ViewConfig::default(),
                remote,
            );
            Self {
                runtime,
                transport,
                view,
            }
        }

        /// Rebuild with the example issues and let the debounce expire.
        fn shown(with_transport: bool) -> Self {
            let mut fx = Self::new(with_transport);
            fx.view.rebuild(example_issues(), 800.0, 600.0).unwrap();
            fx.runtime.advance(100.0);
            fx
        }

        fn node_count(&self) -> usize {
            self.view.surface().nodes().len()
        }

        fn sink(&self) -> EventSink {
            self.view.surface().sink().expect("gestures installed")
        }
    }

    #[test]
    fn test_rebuild_waits_for_debounce() {
        let mut fx = Fixture::new(false);
        fx.view.rebuild(example_issues(), 800.0, 600.0).unwrap();
        fx.runtime.advance(99.0);
        assert_eq!(fx.node_count(), 0);

        fx.runtime.advance(1.0);
        assert_eq!(fx.node_count(), 6);
        assert_eq!(fx.view.clusters().len(), 3);
        assert_eq!(
            fx.view.layout_strategy(),
            Some(LayoutStrategy::Local {
                reason: FallbackReason::RemoteDisabled
            })
        );
        assert_eq!(fx.view.layout_phase(), LayoutPhase::Positioned);
    }

    #[test]
    fn test_example_scenario_local_positions() {
        let fx = Fixture::shown(false);
        let data = fx.view.cluster_data();
        let unlabeled = data.cluster("Unlabeled").and_then(|c| c.position).unwrap();
        let node = data.members("Unlabeled").next().unwrap();
        assert_eq!(node.position, Some(unlabeled));

        let center = data.cluster("bug").and_then(|c| c.position).unwrap();
        let angles: Vec<f64> = data
            .members("bug")
            .map(|n| {
                let p = n.position.unwrap();
                (p.y - center.y).atan2(p.x - center.x).to_degrees().rem_euclid(360.0)
            })
            .collect();
        for (angle, expected) in angles.iter().zip([0.0, 120.0, 240.0]) {
            assert!((angle - expected).abs() < 1e-6, "angle {angle} vs {expected}");
        }
    }

    #[test]
    fn test_rapid_rebuilds_collapse() {
        let mut fx = Fixture::new(true);
        fx.view.rebuild(example_issues(), 800.0, 600.0).unwrap();
        fx.runtime.advance(50.0);
        fx.view.rebuild(example_issues(), 900.0, 600.0).unwrap();
        fx.runtime.advance(50.0);
        fx.view.rebuild(example_issues(), 1000.0, 600.0).unwrap();
        fx.runtime.advance(99.0);
        assert_eq!(fx.transport.request_count(), 0);

        fx.runtime.advance(1.0);
        assert_eq!(fx.transport.request_count(), 1);
        assert_eq!(fx.transport.request(0).width, 1000.0);
    }

    #[test]
    fn test_unchanged_input_is_ignored() {
        let mut fx = Fixture::shown(false);
        fx.view.with_surface(|surface| surface.take_calls());

        fx.view.rebuild(example_issues(), 800.0, 600.0).unwrap();
        fx.runtime.advance(500.0);
        assert!(fx.view.surface().calls().is_empty());

        fx.view.rebuild(example_issues(), 800.0, 500.0).unwrap();
        fx.runtime.advance(100.0);
        assert_eq!(fx.view.surface().calls()[0], DrawCall::Clear);
        assert_eq!(fx.view.surface().size(), Some((800.0, 500.0)));
    }

    #[test]
    fn test_invalid_viewport_rejected() {
        let mut fx = Fixture::new(false);
        assert_eq!(
            fx.view.rebuild(example_issues(), 0.0, 600.0),
            Err(ViewError::InvalidViewport {
                width: 0.0,
                height: 600.0
            })
        );
        assert!(fx.view.rebuild(example_issues(), f64::NAN, 600.0).is_err());
    }

    #[test]
    fn test_empty_input_clears_scene() {
        let mut fx = Fixture::shown(false);
        assert_eq!(fx.node_count(), 6);

        fx.view.rebuild(Vec::new(), 800.0, 600.0).unwrap();
        fx.runtime.advance(100.0);
        assert_eq!(fx.node_count(), 0);
        assert!(fx.view.surface().clusters().is_empty());
        assert!(fx.view.clusters().is_empty());
        assert_eq!(fx.view.layout_strategy(), None);
    }

    #[test]
    fn test_empty_input_sends_no_request() {
        let mut fx = Fixture::new(true);
        fx.view.rebuild(Vec::new(), 800.0, 600.0).unwrap();
        fx.runtime.advance(1_000.0);
        assert_eq!(fx.transport.request_count(), 0);
        assert_eq!(fx.node_count(), 0);
    }

    #[test]
    fn test_remote_layout_adopted() {
        let mut fx = Fixture::shown(true);
        assert_eq!(fx.transport.request_count(), 1);
        assert_eq!(fx.node_count(), 0);

        let response = decode_response(&remote_response_json()).unwrap();
        assert!(fx.transport.respond(0, Ok(response)));
        fx.runtime.run();

        assert_eq!(fx.node_count(), 5);
        assert_eq!(fx.view.clusters().len(), 2);
        assert!(fx.view.layout_strategy().is_some_and(|s| s.is_remote()));

        let surface = fx.view.surface();
        let first = &surface.nodes()[0];
        assert_eq!((first.x, first.y), (180.0, 290.0));
        drop(surface);

        // Nodes resolve to the input issues, labels and all.
        for id in 1..=5 {
            let issue = fx.view.issue(IssueId(id)).unwrap();
            assert_eq!(*issue, example_issues()[(id - 1) as usize]);
        }
    }

    #[test]
    fn test_remote_failure_falls_back() {
        let mut fx = Fixture::shown(true);
        fx.transport.respond(0, Err(LayoutError::Status(503)));
        fx.runtime.run();

        assert_eq!(fx.node_count(), 6);
        assert_eq!(
            fx.view.layout_strategy(),
            Some(LayoutStrategy::Local {
                reason: FallbackReason::RemoteFailed(LayoutError::Status(503))
            })
        );
    }

    #[test]
    fn test_remote_timeout_falls_back() {
        let mut fx = Fixture::shown(true);
        fx.runtime.advance(4_999.0);
        assert_eq!(fx.node_count(), 0);

        fx.runtime.advance(1.0);
        assert_eq!(fx.node_count(), 6);
        assert!(fx.transport.is_cancelled(0));
        assert!(matches!(
            fx.view.layout_strategy(),
            Some(LayoutStrategy::Local {
                reason: FallbackReason::RemoteFailed(LayoutError::Timeout(_))
            })
        ));
    }

    #[test]
    fn test_superseded_request_has_no_effect() {
        let mut fx = Fixture::shown(true);
        assert_eq!(fx.transport.request_count(), 1);

        let first_three: Vec<Issue> = example_issues().into_iter().take(3).collect();
        fx.view.rebuild(first_three, 800.0, 600.0).unwrap();
        fx.runtime.run();
        assert!(fx.transport.is_cancelled(0));

        let late = decode_response(&remote_response_json()).unwrap();
        assert!(!fx.transport.respond(0, Ok(late)));
        fx.runtime.run();
        assert_eq!(fx.node_count(), 0);

        fx.runtime.advance(100.0);
        assert_eq!(fx.transport.request_count(), 2);
        fx.transport.respond(1, Err(LayoutError::Transport("offline".into())));
        fx.runtime.run();

        assert_eq!(fx.node_count(), 3);
        assert_eq!(fx.view.clusters().len(), 1);
    }

    #[test]
    fn test_zoom_animates_per_frame() {
        let mut fx = Fixture::shown(false);
        fx.view.zoom_in();
        assert!(fx.view.is_animating());

        fx.runtime.advance(16.0);
        let k = fx.view.surface().transform().k;
        assert!(k > 1.0 && k < 1.5, "first frame scale {k}");

        fx.runtime.advance(400.0);
        assert!(!fx.view.is_animating());
        assert!((fx.view.transform().k - 1.5).abs() < 1e-9);
        assert_eq!(fx.view.surface().transform(), fx.view.transform());
    }

    #[test]
    fn test_focus_and_background_click() {
        let mut fx = Fixture::shown(false);
        assert!(fx.view.focus_cluster("bug"));
        assert_eq!(fx.view.selected_cluster().as_deref(), Some("bug"));
        assert_eq!(fx.view.surface().highlighted(), Some("bug"));
        fx.runtime.advance(1_000.0);
        assert!(fx.view.transform().k > 1.0);

        let sink = fx.sink();
        sink(SceneEvent::BackgroundClick);
        assert_eq!(fx.view.selected_cluster(), None);
        assert_eq!(fx.view.surface().highlighted(), None);
        fx.runtime.advance(1_000.0);
        assert_eq!(fx.view.transform(), ViewTransform::IDENTITY);

        assert!(!fx.view.focus_cluster("question"));
    }

    #[test]
    fn test_badge_click_and_legend_toggle() {
        let mut fx = Fixture::shown(false);
        let sink = fx.sink();
        sink(SceneEvent::ClusterClick("docs".into()));
        assert_eq!(fx.view.selected_cluster().as_deref(), Some("docs"));

        assert!(fx.view.toggle_legend("docs"));
        assert_eq!(fx.view.selected_cluster(), None);
        fx.runtime.advance(1_000.0);
        assert_eq!(fx.view.transform(), ViewTransform::IDENTITY);
    }

    #[test]
    fn test_drag_and_wheel_stop_animation() {
        let mut fx = Fixture::shown(false);
        fx.view.zoom_in();
        let sink = fx.sink();
        sink(SceneEvent::Pan { dx: 20.0, dy: 10.0 });
        assert!(!fx.view.is_animating());
        assert_eq!(fx.view.surface().transform(), ViewTransform::new(20.0, 10.0, 1.0));

        sink(SceneEvent::Zoom {
            factor: 2.0,
            x: 0.0,
            y: 0.0,
        });
        assert_eq!(fx.view.transform(), ViewTransform::new(40.0, 20.0, 2.0));
        fx.runtime.advance(1_000.0);
        assert_eq!(fx.view.transform(), ViewTransform::new(40.0, 20.0, 2.0));
    }

    #[test]
    fn test_hover_shows_and_hides_tooltip() {
        let mut fx = Fixture::shown(false);
        let position = fx
            .view
            .cluster_data()
            .members("Unlabeled")
            .next()
            .and_then(|n| n.position)
            .unwrap();

        fx.view.dispatch(SceneEvent::PointerMove {
            x: position.x,
            y: position.y,
        });
        let tooltip = fx.view.surface().tooltip().cloned().unwrap();
        assert_eq!(tooltip.node, NodeId(6));
        assert_eq!(tooltip.x, (position.x + 15.0).min(800.0 - 280.0));

        fx.view.dispatch(SceneEvent::PointerMove { x: -50.0, y: -50.0 });
        assert!(fx.view.surface().tooltip().is_none());

        fx.view.dispatch(SceneEvent::PointerMove {
            x: position.x,
            y: position.y,
        });
        fx.view.dispatch(SceneEvent::PointerLeave);
        assert!(fx.view.surface().tooltip().is_none());
        fx.runtime.run();
    }

    #[test]
    fn test_hover_follows_view_transform() {
        let mut fx = Fixture::shown(false);
        let position = fx
            .view
            .cluster_data()
            .members("Unlabeled")
            .next()
            .and_then(|n| n.position)
            .unwrap();

        fx.view.dispatch(SceneEvent::Pan { dx: 100.0, dy: 0.0 });
        fx.view.dispatch(SceneEvent::PointerMove {
            x: position.x,
            y: position.y,
        });
        assert!(fx.view.surface().tooltip().is_none());

        fx.view.dispatch(SceneEvent::PointerMove {
            x: position.x + 100.0,
            y: position.y,
        });
        assert!(fx.view.surface().tooltip().is_some());
        fx.runtime.run();
    }

    #[test]
    fn test_rebuild_resets_camera() {
        let mut fx = Fixture::shown(false);
        fx.view.focus_cluster("bug");
        fx.runtime.advance(100.0);
        assert!(fx.view.is_animating());

        let mut issues = example_issues();
        issues.push(issue(7, Some(("question", "#d876e3"))));
        fx.view.rebuild(issues, 800.0, 600.0).unwrap();
        fx.runtime.advance(100.0);

        assert!(!fx.view.is_animating());
        assert_eq!(fx.view.transform(), ViewTransform::IDENTITY);
        assert_eq!(fx.view.selected_cluster(), None);
        assert_eq!(fx.view.clusters().len(), 4);
    }

    #[test]
    fn test_dispose_cancels_pending_work() {
        let mut fx = Fixture::shown(true);
        fx.view.zoom_in();
        fx.view.dispose();
        fx.runtime.run();

        assert!(fx.transport.is_cancelled(0));
        assert!(!fx.view.is_animating());
        assert_eq!(fx.view.surface().calls().last(), Some(&DrawCall::Clear));
        assert_eq!(
            fx.view.rebuild(example_issues(), 800.0, 600.0),
            Err(ViewError::Disposed)
        );

        let calls = fx.view.surface().calls().len();
        fx.view.zoom_in();
        fx.view.dispatch(SceneEvent::BackgroundClick);
        fx.runtime.advance(10_000.0);
        assert_eq!(fx.view.surface().calls().len(), calls);

        fx.view.dispose();
    }

    #[test]
    fn test_dispose_during_debounce() {
        let mut fx = Fixture::new(true);
        fx.view.rebuild(example_issues(), 800.0, 600.0).unwrap();
        fx.runtime.advance(50.0);
        fx.view.dispose();
        fx.runtime.advance(1_000.0);

        assert_eq!(fx.transport.request_count(), 0);
        assert_eq!(fx.node_count(), 0);
    }

    #[test]
    fn test_drop_releases_view() {
        let mut fx = Fixture::shown(true);
        fx.transport.respond(0, Err(LayoutError::Status(500)));
        fx.runtime.run();
        fx.view.rebuild(example_issues(), 640.0, 480.0).unwrap();
        fx.runtime.advance(100.0);
        assert_eq!(fx.transport.request_count(), 2);

        let sink = fx.sink();
        let Fixture {
            mut runtime,
            transport,
            view,
        } = fx;
        drop(view);
        runtime.run();

        assert!(transport.is_cancelled(1));
        // The sink outlives the view without keeping it alive.
        sink(SceneEvent::BackgroundClick);
    }
}
