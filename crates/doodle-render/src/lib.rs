//! Doodle Render Library
//!
//! Hand-drawn rendering of a Doodle scene onto any [`Surface`]. Geometry is
//! generated once per element and cached until its shape or style changes.

mod cache;
pub mod freehand;
mod recording;
mod renderer;
pub mod rough;
mod shape;
mod surface;

pub use cache::{CacheStats, ShapeCache};
pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{
    DARK_BACKGROUND, FrameStats, LIGHT_BACKGROUND, LINE_HEIGHT, RenderContext, RenderResult,
    Renderer, RendererError, SELECTION_COLOR, SketchRenderer, resolve_color,
};
pub use rough::{HandDrawn, RoughGenerator, RoughOptions};
pub use shape::{ShapeGeometry, build_geometry};
pub use surface::{Surface, stroke_style};
