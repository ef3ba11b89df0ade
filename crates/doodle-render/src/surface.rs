//! Drawing surface abstraction.
//!
//! The pipeline only talks to a [`Surface`]; backends decide how paths and
//! text become pixels (or commands, or markup).

use kurbo::{BezPath, Point, Size, Stroke, Vec2};
use peniko::Color;

/// A 2D drawing target with a canvas-style transform stack.
///
/// Transforms compose in call order: `scale(2.0)` followed by
/// `translate((10, 0))` maps local `(0, 0)` to device `(20, 0)`.
pub trait Surface {
    /// Device size in pixels.
    fn size(&self) -> Size;

    /// Fill the whole device with `color`, ignoring the current transform.
    fn clear(&mut self, color: Color);

    /// Push the current transform.
    fn save(&mut self);

    /// Pop the transform pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    fn scale(&mut self, factor: f64);

    fn translate(&mut self, offset: Vec2);

    fn fill_path(&mut self, path: &BezPath, color: Color);

    /// Stroke `path`. Width and dash lengths are in local units.
    fn stroke_path(&mut self, path: &BezPath, color: Color, stroke: &Stroke);

    /// Extent of a single line of text.
    fn measure_text(&mut self, text: &str, font_size: f64) -> Size;

    /// Draw a single line of text with its top-left corner at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color);
}

/// Stroke of `width` with an optional dash pattern.
pub fn stroke_style(width: f64, dashes: Option<[f64; 2]>) -> Stroke {
    let stroke = Stroke::new(width);
    match dashes {
        Some(pattern) => stroke.with_dashes(0.0, pattern),
        None => stroke,
    }
}
