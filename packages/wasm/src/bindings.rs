//! JavaScript API.

use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::ViewConfig;
use crate::error::ViewError;
use crate::issue::Issue;
use crate::layout::LayoutTransport;
use crate::lifecycle::LifecycleCoordinator;
use crate::web::{FetchTransport, SvgSurface, WebScheduler};

/// One legend row.
#[derive(Debug, Serialize)]
struct LegendEntry<'a> {
    name: &'a str,
    color: &'a str,
    count: usize,
}

/// A topic cluster view bound to an `<svg>` element.
///
/// ```js
/// const view = new TopicClusterView(svg, { layoutEndpoint: "/api/cluster-layout" });
/// view.rebuild(issues, svg.clientWidth, svg.clientHeight);
/// view.focusCluster("bug");
/// view.dispose();
/// ```
#[wasm_bindgen]
pub struct TopicClusterView {
    inner: LifecycleCoordinator<SvgSurface>,
}

#[wasm_bindgen]
impl TopicClusterView {
    /// Create a view drawing into `svg`.
    ///
    /// `config` is optional: `{ layoutEndpoint?, remoteTimeoutMs?, debounceMs? }`.
    /// Without `layoutEndpoint` every layout is computed locally.
    #[wasm_bindgen(constructor)]
    pub fn new(svg: Element, config: JsValue) -> Result<TopicClusterView, JsError> {
        let config: ViewConfig = if config.is_undefined() || config.is_null() {
            ViewConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| ViewError::InvalidConfig(e.to_string()))?
        };
        let surface = SvgSurface::new(svg)
            .map_err(|e| ViewError::InvalidConfig(format!("unusable svg element: {e:?}")))?;
        let transport = config
            .endpoint()
            .map(|url| Rc::new(FetchTransport::new(url)) as Rc<dyn LayoutTransport>);

        Ok(Self {
            inner: LifecycleCoordinator::new(surface, Rc::new(WebScheduler::new()), &config, transport),
        })
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Schedule a rebuild for a new issue list or viewport size.
    pub fn rebuild(&mut self, issues: JsValue, width: f64, height: f64) -> Result<(), JsError> {
        let issues: Vec<Issue> = serde_wasm_bindgen::from_value(issues)
            .map_err(|e| ViewError::InvalidIssues(e.to_string()))?;
        self.inner.rebuild(issues, width, height)?;
        Ok(())
    }

    // =========================================================================
    // Camera
    // =========================================================================

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) {
        self.inner.zoom_in();
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) {
        self.inner.zoom_out();
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&self) {
        self.inner.reset_view();
    }

    /// Returns false if no cluster with that name is shown.
    #[wasm_bindgen(js_name = focusCluster)]
    pub fn focus_cluster(&self, name: &str) -> bool {
        self.inner.focus_cluster(name)
    }

    /// Legend click: focus, or reset when the cluster is already selected.
    #[wasm_bindgen(js_name = toggleLegend)]
    pub fn toggle_legend(&self, name: &str) -> bool {
        self.inner.toggle_legend(name)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[wasm_bindgen(js_name = selectedCluster)]
    pub fn selected_cluster(&self) -> Option<String> {
        self.inner.selected_cluster()
    }

    /// Current view transform as `{ x, y, k }`.
    pub fn transform(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.transform())?)
    }

    /// Legend entries `[{ name, color, count }]` in display order.
    pub fn clusters(&self) -> Result<JsValue, JsError> {
        let clusters = self.inner.clusters();
        let legend: Vec<LegendEntry<'_>> = clusters
            .iter()
            .map(|cluster| LegendEntry {
                name: &cluster.name,
                color: &cluster.color,
                count: cluster.count,
            })
            .collect();
        Ok(serde_wasm_bindgen::to_value(&legend)?)
    }

    /// How the shown layout was computed, e.g. `"remote (120 ms)"`.
    #[wasm_bindgen(js_name = layoutStrategy)]
    pub fn layout_strategy(&self) -> Option<String> {
        self.inner.layout_strategy().map(|strategy| strategy.to_string())
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Cancel pending work, remove listeners and clear the svg.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }
}
