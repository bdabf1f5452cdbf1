//! Pan, zoom, focus and hover for the rendered scene.

mod controller;
mod transform;
mod transition;

pub use controller::{
    HoverHit, InteractionController, FOCUS_DURATION_MS, FOCUS_PADDING, RESET_DURATION_MS,
    TOOLTIP_HEIGHT, TOOLTIP_OFFSET, TOOLTIP_WIDTH, ZOOM_DURATION_MS, ZOOM_STEP,
};
pub use transform::{Bounds, ScaleExtent, ViewTransform, SCALE_EXTENT};
pub use transition::Transition;
