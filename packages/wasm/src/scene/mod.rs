//! Scene rendering.
//!
//! [`SceneRenderer`] turns positioned cluster data into draw calls on a
//! [`RenderSurface`]. The browser surface draws SVG; [`RecordingSurface`]
//! keeps a call log instead.

mod recording;
mod render;
mod surface;

pub use recording::{DrawCall, RecordingSurface};
pub use render::{RenderedScene, SceneRenderer};
pub use surface::{
    badge_name, ClusterBadge, EventSink, NodeGlyph, RenderSurface, SceneEvent, Tooltip,
    BADGE_NAME_LIMIT, BADGE_OFFSET_Y,
};
