//! A surface that records draw calls instead of rasterizing them.
//!
//! Used by the headless binary and by tests. Every recorded command carries
//! the transform that was current when it was issued.

use crate::surface::Surface;
use kurbo::{Affine, BezPath, Point, Size, Stroke, Vec2};
use peniko::Color;

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f64 = 0.6;

#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    FillPath {
        path: BezPath,
        color: Color,
        transform: Affine,
    },
    StrokePath {
        path: BezPath,
        color: Color,
        stroke: Stroke,
        transform: Affine,
    },
    Text {
        text: String,
        origin: Point,
        font_size: f64,
        color: Color,
        transform: Affine,
    },
}

impl DrawCommand {
    pub fn transform(&self) -> Affine {
        match self {
            DrawCommand::Clear { .. } => Affine::IDENTITY,
            DrawCommand::FillPath { transform, .. }
            | DrawCommand::StrokePath { transform, .. }
            | DrawCommand::Text { transform, .. } => *transform,
        }
    }
}

pub struct RecordingSurface {
    size: Size,
    transform: Affine,
    stack: Vec<Affine>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            transform: Affine::IDENTITY,
            stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the surface empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Current transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Depth of the save stack; zero after a balanced frame.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { color });
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(transform) => self.transform = transform,
            None => log::warn!("RecordingSurface::restore without matching save"),
        }
    }

    fn scale(&mut self, factor: f64) {
        self.transform *= Affine::scale(factor);
    }

    fn translate(&mut self, offset: Vec2) {
        self.transform *= Affine::translate(offset);
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            color,
            transform: self.transform,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            color,
            stroke: stroke.clone(),
            transform: self.transform,
        });
    }

    fn measure_text(&mut self, text: &str, font_size: f64) -> Size {
        Size::new(
            text.chars().count() as f64 * font_size * GLYPH_ADVANCE,
            font_size,
        )
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            font_size,
            color,
            transform: self.transform,
        });
    }
}
