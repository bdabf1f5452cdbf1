//! Topic Cluster - WASM Module
//!
//! Groups issues into label clusters, lays them out in 2D and renders them as
//! a pannable, zoomable SVG scene. Compiled to WebAssembly, it exposes
//! [`TopicClusterView`](bindings::TopicClusterView) to JavaScript; on native
//! targets the same pipeline runs headless against any [`RenderSurface`].
//!
//! # Architecture
//!
//! - `issue`: the issue contract and an id-keyed issue index
//! - `cluster`: clustering by first label, capped at [`MAX_NODES`]
//! - `layout`: remote layout with timeout, local ring layout as fallback
//! - `spatial`: R-tree index for hover hit testing
//! - `scene`: renderer and the drawing-surface abstraction
//! - `interaction`: view transform, zoom/focus/reset, tooltip placement
//! - `lifecycle`: debounced rebuilds, cancellation and teardown
//! - `web`: SVG surface, fetch transport and browser scheduler (wasm32 only)

pub mod cluster;
pub mod config;
pub mod error;
pub mod interaction;
pub mod issue;
pub mod layout;
pub mod lifecycle;
pub mod scene;
pub mod spatial;

#[cfg(target_arch = "wasm32")]
pub mod bindings;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod testing;

pub use cluster::{cluster, Cluster, ClusterData, ClusterNode, NodeId, Point, MAX_NODES};
pub use config::ViewConfig;
pub use error::{LayoutError, ViewError};
pub use interaction::{InteractionController, ViewTransform};
pub use issue::{Issue, IssueId, IssueIndex};
pub use layout::{
    compute_local_layout, LayoutComputer, LayoutOutcome, LayoutStrategy, LayoutTransport,
    LocalLayoutConfig,
};
pub use lifecycle::{LifecycleCoordinator, Scheduler};
pub use scene::{RecordingSurface, RenderSurface, SceneEvent, SceneRenderer};

/// Initialize the WASM module: console logging and the panic hook.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
}
