//! Render pipeline.

use crate::cache::{CacheStats, ShapeCache};
use crate::rough::{HandDrawn, RoughGenerator};
use crate::shape::ShapeGeometry;
use crate::surface::{Surface, stroke_style};
use doodle_core::geometry::{CONTROL_POINT_SIZE, control_points, handle_frame, selection_bounds};
use doodle_core::{
    Element, ElementId, ElementKind, ResizeHandle, Scene, SerializableColor, TextAlign,
    TextBaseline,
};
use kurbo::{Circle, Point, Rect, Shape};
use peniko::Color;
use std::collections::HashSet;
use thiserror::Error;

/// Line advance as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.2;

/// Space around text kept clear by its backing rectangle.
const TEXT_BACKING_PADDING: f64 = 4.0;

/// Selection handle edge length in screen pixels.
const HANDLE_SIZE: f64 = 8.0;

/// Dash length of the selection outline in screen pixels.
const SELECTION_DASH: f64 = 5.0;

/// Dash length of the marquee outline in screen pixels.
const MARQUEE_DASH: f64 = 4.0;

pub const LIGHT_BACKGROUND: SerializableColor = SerializableColor::rgb(255, 255, 255);
pub const DARK_BACKGROUND: SerializableColor = SerializableColor::rgb(18, 18, 18);
pub const SELECTION_COLOR: SerializableColor = SerializableColor::rgb(59, 130, 246);

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid surface size {width}x{height}")]
    InvalidSurface { width: f64, height: f64 },
    #[error("Invalid zoom {0}")]
    InvalidZoom(f64),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Swap pure black and pure white in dark mode. Alpha is kept.
pub fn resolve_color(color: SerializableColor, dark_mode: bool) -> SerializableColor {
    if !dark_mode {
        return color;
    }
    match (color.r, color.g, color.b) {
        (0, 0, 0) => SerializableColor::new(255, 255, 255, color.a),
        (255, 255, 255) => SerializableColor::new(0, 0, 0, color.a),
        _ => color,
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    /// Background color.
    pub background_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Marquee in world coordinates.
    pub marquee: Option<Rect>,
    /// Text element open in the host's editor; not painted.
    pub editing_element: Option<ElementId>,
}

impl<'a> RenderContext<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        let background = if scene.app_state().dark_mode {
            DARK_BACKGROUND
        } else {
            LIGHT_BACKGROUND
        };
        Self {
            scene,
            background_color: background.into(),
            selection_color: SELECTION_COLOR.into(),
            marquee: None,
            editing_element: None,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the marquee rectangle.
    pub fn with_marquee(mut self, rect: Option<Rect>) -> Self {
        self.marquee = rect;
        self
    }

    /// Set the element being edited (skipped when drawing).
    pub fn with_editing_element(mut self, id: Option<ElementId>) -> Self {
        self.editing_element = id;
        self
    }

    fn dark_mode(&self) -> bool {
        self.scene.app_state().dark_mode
    }

    fn zoom(&self) -> f64 {
        self.scene.viewport().zoom
    }
}

/// Per-frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub elements: usize,
    pub cache: CacheStats,
    pub pruned: usize,
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Paint a full frame of `ctx` onto `surface`.
    fn render(
        &mut self,
        ctx: &RenderContext<'_>,
        surface: &mut dyn Surface,
    ) -> RenderResult<FrameStats>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext<'_>) -> Color {
        ctx.background_color
    }
}

/// Hand-drawn renderer with a per-element geometry cache.
pub struct SketchRenderer<G: RoughGenerator = HandDrawn> {
    generator: G,
    cache: ShapeCache,
}

impl Default for SketchRenderer<HandDrawn> {
    fn default() -> Self {
        Self::new(HandDrawn::default())
    }
}

impl<G: RoughGenerator> SketchRenderer<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            cache: ShapeCache::new(),
        }
    }

    pub fn cache(&self) -> &ShapeCache {
        &self.cache
    }

    fn render_element(
        &mut self,
        ctx: &RenderContext<'_>,
        element: &Element,
        surface: &mut dyn Surface,
    ) {
        if element.kind == ElementKind::Text {
            self.render_text(ctx, element, surface);
            return;
        }
        let geometry = self.cache.geometry(element, &self.generator);
        let dark = ctx.dark_mode();
        let stroke_color: Color = resolve_color(element.style.stroke_color, dark)
            .with_opacity(element.style.opacity)
            .into();
        let fill_color: Option<Color> = element
            .style
            .background_color
            .map(|c| resolve_color(c, dark).with_opacity(element.style.opacity).into());

        surface.save();
        surface.translate(element.anchor().to_vec2());
        paint_geometry(&geometry, stroke_color, fill_color, element.style.stroke_width, surface);
        surface.restore();
    }

    fn render_text(&self, ctx: &RenderContext<'_>, element: &Element, surface: &mut dyn Surface) {
        let text = element.text_content();
        if text.is_empty() {
            return;
        }
        let font_size = element.font_size;
        let line_height = font_size * LINE_HEIGHT;
        let lines: Vec<&str> = text.split('\n').collect();
        let widths: Vec<f64> = lines
            .iter()
            .map(|line| surface.measure_text(line, font_size).width)
            .collect();
        let block_width = widths.iter().copied().fold(0.0, f64::max);
        let block_height = lines.len() as f64 * line_height;

        let left = match element.text_align {
            TextAlign::Left => element.x,
            TextAlign::Center => element.x - block_width / 2.0,
            TextAlign::Right => element.x - block_width,
        };
        let top = match element.text_baseline {
            TextBaseline::Top => element.y,
            TextBaseline::Middle => element.y - block_height / 2.0,
            TextBaseline::Bottom => element.y - block_height,
        };

        if let Some(backing) = backing_color(ctx, element) {
            let rect = Rect::new(left, top, left + block_width, top + block_height)
                .inflate(TEXT_BACKING_PADDING, TEXT_BACKING_PADDING);
            surface.fill_path(&rect.to_path(0.1), backing);
        }

        let color: Color = resolve_color(element.style.stroke_color, ctx.dark_mode())
            .with_opacity(element.style.opacity)
            .into();
        for (i, (line, width)) in lines.iter().zip(&widths).enumerate() {
            let x = match element.text_align {
                TextAlign::Left => element.x,
                TextAlign::Center => element.x - width / 2.0,
                TextAlign::Right => element.x - width,
            };
            let origin = Point::new(x, top + i as f64 * line_height);
            surface.fill_text(line, origin, font_size, color);
        }
    }

    fn render_selection(&self, ctx: &RenderContext<'_>, surface: &mut dyn Surface) {
        let scene = ctx.scene;
        let selected: Vec<&Element> = scene.selected_elements().collect();
        if selected.is_empty() {
            return;
        }
        let zoom = ctx.zoom();
        let outline = stroke_style(1.0 / zoom, None);

        if let [single] = selected.as_slice() {
            if single.kind.is_linear() {
                if let Some(points) = control_points(single) {
                    let radius = CONTROL_POINT_SIZE / zoom / 2.0;
                    for (_, center) in points {
                        let path = Circle::new(center, radius).to_path(0.1);
                        surface.fill_path(&path, Color::WHITE);
                        surface.stroke_path(&path, ctx.selection_color, &outline);
                    }
                }
                return;
            }
        }

        let Some(bounds) = selection_bounds(selected.iter().copied()) else {
            return;
        };
        let frame = handle_frame(bounds, zoom);
        let dash = SELECTION_DASH / zoom;
        surface.stroke_path(
            &frame.to_path(0.1),
            ctx.selection_color,
            &stroke_style(1.0 / zoom, Some([dash, dash])),
        );

        let half = HANDLE_SIZE / zoom / 2.0;
        for handle in ResizeHandle::ALL {
            let center = handle.position(frame);
            let square = Rect::from_center_size(center, (half * 2.0, half * 2.0)).to_path(0.1);
            surface.fill_path(&square, Color::WHITE);
            surface.stroke_path(&square, ctx.selection_color, &outline);
        }
    }

    fn render_marquee(&self, ctx: &RenderContext<'_>, surface: &mut dyn Surface) {
        let Some(rect) = ctx.marquee else {
            return;
        };
        let zoom = ctx.zoom();
        let path = rect.abs().to_path(0.1);
        let fill: Color = SerializableColor::from(ctx.selection_color)
            .with_opacity(0.1)
            .into();
        let dash = MARQUEE_DASH / zoom;
        surface.fill_path(&path, fill);
        surface.stroke_path(
            &path,
            ctx.selection_color,
            &stroke_style(1.0 / zoom, Some([dash, dash])),
        );
    }
}

fn paint_geometry(
    geometry: &ShapeGeometry,
    stroke_color: Color,
    fill_color: Option<Color>,
    stroke_width: f64,
    surface: &mut dyn Surface,
) {
    if let (Some(fill), Some(color)) = (&geometry.fill, fill_color) {
        surface.fill_path(fill, color);
    }
    let stroke = stroke_style(stroke_width, None);
    for path in &geometry.strokes {
        surface.stroke_path(path, stroke_color, &stroke);
    }
    for path in &geometry.solids {
        surface.fill_path(path, stroke_color);
    }
}

/// Opaque color behind container-bound text. `None` for free text or when
/// the container is gone.
fn backing_color(ctx: &RenderContext<'_>, element: &Element) -> Option<Color> {
    let container = ctx.scene.element(element.container_element_id?)?;
    if element.on_container_border {
        return Some(ctx.background_color);
    }
    Some(match container.style.background_color {
        Some(color) => SerializableColor {
            a: 255,
            ..resolve_color(color, ctx.dark_mode())
        }
        .into(),
        None => ctx.background_color,
    })
}

impl<G: RoughGenerator> Renderer for SketchRenderer<G> {
    fn render(
        &mut self,
        ctx: &RenderContext<'_>,
        surface: &mut dyn Surface,
    ) -> RenderResult<FrameStats> {
        let size = surface.size();
        if !(size.width.is_finite() && size.height.is_finite())
            || size.width <= 0.0
            || size.height <= 0.0
        {
            return Err(RendererError::InvalidSurface {
                width: size.width,
                height: size.height,
            });
        }
        let zoom = ctx.zoom();
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(RendererError::InvalidZoom(zoom));
        }

        surface.clear(self.background_color(ctx));
        surface.save();
        // screen = world * zoom + scroll
        surface.scale(zoom);
        surface.translate(ctx.scene.viewport().scroll / zoom);

        let mut drawn = 0;
        for element in ctx.scene.elements() {
            if ctx.editing_element == Some(element.id) {
                continue;
            }
            self.render_element(ctx, element, surface);
            drawn += 1;
        }

        self.render_selection(ctx, surface);
        self.render_marquee(ctx, surface);
        surface.restore();

        let live: HashSet<ElementId> = ctx.scene.elements().iter().map(|e| e.id).collect();
        let pruned = self.cache.retain_live(&live);
        let stats = FrameStats {
            elements: drawn,
            cache: self.cache.take_stats(),
            pruned,
        };
        log::trace!(
            "Rendered {} elements (cache hits {}, misses {}, pruned {})",
            stats.elements,
            stats.cache.hits,
            stats.cache.misses,
            stats.pruned
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use doodle_core::{ElementStyle, StylePatch};
    use kurbo::{PathEl, Size, Vec2};
    use std::rc::Rc;

    fn surface() -> RecordingSurface {
        RecordingSurface::new(Size::new(800.0, 600.0))
    }

    fn clean_style() -> ElementStyle {
        ElementStyle {
            roughness: 0.0,
            ..ElementStyle::default()
        }
    }

    fn is_dashed(command: &DrawCommand) -> bool {
        matches!(command, DrawCommand::StrokePath { stroke, .. } if !stroke.dash_pattern.is_empty())
    }

    fn rect(style: ElementStyle) -> Element {
        Element::from_rect(
            ElementKind::Rectangle,
            Rect::new(5.0, 5.0, 15.0, 15.0),
            style,
        )
    }

    fn color_of(color: Color) -> SerializableColor {
        SerializableColor::from(color)
    }

    fn fills(surface: &RecordingSurface) -> Vec<(Color, &kurbo::BezPath)> {
        surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillPath { color, path, .. } => Some((*color, path)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_world_to_screen_transform() {
        let mut scene = Scene::new();
        scene.set_zoom(2.0);
        scene.set_scroll(10.0, 20.0);
        scene.add_element(rect(clean_style()));

        let mut renderer = SketchRenderer::default();
        let mut surface = surface();
        let stats = renderer.render(&RenderContext::new(&scene), &mut surface).unwrap();
        assert_eq!(stats.elements, 1);
        assert_eq!(surface.depth(), 0);

        let (path, transform) = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::StrokePath {
                    path, transform, ..
                } => Some((path.clone(), *transform)),
                _ => None,
            })
            .unwrap();
        let Some(PathEl::MoveTo(start)) = path.elements().first().copied() else {
            panic!("stroke must start with a move");
        };
        let screen = transform * start;
        assert!((screen.x - 20.0).abs() < 1e-9);
        assert!((screen.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_clear_uses_mode_background() {
        let mut scene = Scene::new();
        let mut renderer = SketchRenderer::default();
        let mut surface = surface();

        renderer.render(&RenderContext::new(&scene), &mut surface).unwrap();
        let DrawCommand::Clear { color } = &surface.commands()[0] else {
            panic!("frame must start with a clear");
        };
        assert_eq!(color_of(*color), LIGHT_BACKGROUND);

        scene.set_dark_mode(true);
        renderer.render(&RenderContext::new(&scene), &mut surface).unwrap();
        let DrawCommand::Clear { color } = &surface.commands()[0] else {
            panic!("frame must start with a clear");
        };
        assert_eq!(color_of(*color), DARK_BACKGROUND);
    }

    #[test]
    fn test_dark_mode_swaps_black_stroke() {
        assert_eq!(
            resolve_color(SerializableColor::black(), true),
            SerializableColor::white()
        );
        assert_eq!(
            resolve_color(SerializableColor::white(), true),
            SerializableColor::black()
        );
        let red = SerializableColor::rgb(224, 49, 49);
        assert_eq!(resolve_color(red, true), red);
        assert_eq!(
            resolve_color(SerializableColor::black(), false),
            SerializableColor::black()
        );

        let mut scene = Scene::new();
        scene.set_dark_mode(true);
        scene.add_element(rect(clean_style()));
        let mut surface = surface();
        SketchRenderer::default()
            .render(&RenderContext::new(&scene), &mut surface)
            .unwrap();
        let stroke = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::StrokePath { color, .. } => Some(*color),
                _ => None,
            })
            .unwrap();
        assert_eq!(color_of(stroke), SerializableColor::white());
    }

    #[test]
    fn test_arrow_paints_head_with_stroke_color() {
        let mut scene = Scene::new();
        scene.add_element(Element::segment(
            ElementKind::Arrow,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            clean_style(),
        ));
        let mut surface = surface();
        SketchRenderer::default()
            .render(&RenderContext::new(&scene), &mut surface)
            .unwrap();
        let fills = fills(&surface);
        assert_eq!(fills.len(), 1);
        assert_eq!(color_of(fills[0].0), SerializableColor::black());
    }

    #[test]
    fn test_container_text_gets_backing() {
        let mut scene = Scene::new();
        let container = rect(ElementStyle {
            background_color: Some(SerializableColor::rgb(255, 0, 0)),
            ..clean_style()
        });
        let mut label = Element::text(
            Point::new(10.0, 10.0),
            TextAlign::Center,
            TextBaseline::Middle,
            clean_style(),
        );
        label.text = Some("Hi".to_string());
        label.container_element_id = Some(container.id);
        scene.add_element(container);
        scene.add_element(label);

        let mut surface = surface();
        SketchRenderer::default()
            .render(&RenderContext::new(&scene), &mut surface)
            .unwrap();

        let commands = surface.commands();
        let text_index = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Text { .. }))
            .unwrap();
        let DrawCommand::FillPath { color, path, .. } = &commands[text_index - 1] else {
            panic!("backing must be painted right before the text");
        };
        assert_eq!(color_of(*color), SerializableColor::rgb(255, 0, 0));
        // "Hi" at 20px: 24 wide, 24 tall, centered on the anchor, padded by 4.
        assert_eq!(path.bounding_box(), Rect::new(-6.0, -6.0, 26.0, 26.0));

        let DrawCommand::Text { origin, .. } = &commands[text_index] else {
            unreachable!();
        };
        assert_eq!(*origin, Point::new(-2.0, -2.0));
    }

    #[test]
    fn test_backing_ignores_container_opacity() {
        let mut scene = Scene::new();
        let container = rect(ElementStyle {
            background_color: Some(SerializableColor::new(0, 128, 0, 100)),
            opacity: 0.4,
            ..clean_style()
        });
        let mut label = Element::text(
            Point::new(10.0, 10.0),
            TextAlign::Center,
            TextBaseline::Middle,
            clean_style(),
        );
        label.text = Some("ok".to_string());
        label.container_element_id = Some(container.id);
        scene.add_element(container);
        scene.add_element(label);

        let mut surface = surface();
        SketchRenderer::default()
            .render(&RenderContext::new(&scene), &mut surface)
            .unwrap();
        let backing = fills(&surface).last().map(|(color, _)| *color).unwrap();
        assert_eq!(color_of(backing), SerializableColor::rgb(0, 128, 0));
    }

    #[test]
    fn test_border_text_uses_canvas_background() {
        let mut scene = Scene::new();
        let container = rect(ElementStyle {
            background_color: Some(SerializableColor::rgb(255, 0, 0)),
            ..clean_style()
        });
        let mut label = Element::text(
            Point::new(5.0, 10.0),
            TextAlign::Center,
            TextBaseline::Middle,
            clean_style(),
        );
        label.text = Some("edge".to_string());
        label.container_element_id = Some(container.id);
        label.on_container_border = true;
        scene.add_element(container);
        scene.add_element(label);

        let mut surface = surface();
        SketchRenderer::default()
            .render(&RenderContext::new(&scene), &mut surface)
            .unwrap();
        let backing = fills(&surface).last().map(|(color, _)| *color).unwrap();
        assert_eq!(color_of(backing), LIGHT_BACKGROUND);
    }

    #[test]
    fn test_free_text_lines() {
        let mut scene = Scene::new();
        let mut text = Element::text(
            Point::new(0.0, 0.0),
            TextAlign::Left,
            TextBaseline::Top,
            clean_style(),
        );
        text.text = Some("one\ntwo".to_string());
        scene.add_element(text);

        let mut surface = surface();
        SketchRenderer::default()
            .render(&RenderContext::new(&scene), &mut surface)
            .unwrap();
        let origins: Vec<Point> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { origin, .. } => Some(*origin),
                _ => None,
            })
            .collect();
        assert_eq!(origins, vec![Point::new(0.0, 0.0), Point::new(0.0, 24.0)]);
        assert!(fills(&surface).is_empty());
    }

    #[test]
    fn test_selection_frame_and_handles() {
        let mut scene = Scene::new();
        let element = rect(clean_style());
        let id = element.id;
        scene.add_element(element);
        scene.set_selection([id]);

        let mut surface = surface();
        SketchRenderer::default()
            .render(&RenderContext::new(&scene), &mut surface)
            .unwrap();

        let dashed = surface
            .commands()
            .iter()
            .filter(|c| is_dashed(c))
            .count();
        assert_eq!(dashed, 1);
        let white = fills(&surface)
            .iter()
            .filter(|(color, _)| color_of(*color) == SerializableColor::white())
            .count();
        assert_eq!(white, 8);
    }

    #[test]
    fn test_single_line_selection_shows_control_points() {
        let mut scene = Scene::new();
        let line = Element::segment(
            ElementKind::Line,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            clean_style(),
        );
        let id = line.id;
        scene.add_element(line);
        scene.set_selection([id]);

        let mut surface = surface();
        SketchRenderer::default()
            .render(&RenderContext::new(&scene), &mut surface)
            .unwrap();
        let handles = fills(&surface);
        assert_eq!(handles.len(), 3);
        let centers: Vec<Point> = handles
            .iter()
            .map(|(_, path)| path.bounding_box().center())
            .collect();
        assert!((centers[1] - Point::new(50.0, 0.0)).hypot() < 1e-6);
        assert!(!surface.commands().iter().any(is_dashed));
    }

    #[test]
    fn test_handles_keep_screen_size() {
        let mut scene = Scene::new();
        let element = rect(clean_style());
        let id = element.id;
        scene.add_element(element);
        scene.set_selection([id]);
        scene.set_zoom(4.0);

        let mut surface = surface();
        SketchRenderer::default()
            .render(&RenderContext::new(&scene), &mut surface)
            .unwrap();
        let handle = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillPath { path, transform, color }
                    if color_of(*color) == SerializableColor::white() =>
                {
                    Some(transform.transform_rect_bbox(path.bounding_box()))
                }
                _ => None,
            })
            .unwrap();
        assert!((handle.width() - HANDLE_SIZE).abs() < 1e-9);
    }

    #[test]
    fn test_marquee_is_drawn() {
        let scene = Scene::new();
        let mut surface = surface();
        let ctx = RenderContext::new(&scene).with_marquee(Some(Rect::new(50.0, 50.0, 10.0, 10.0)));
        SketchRenderer::default().render(&ctx, &mut surface).unwrap();

        let fills = fills(&surface);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].1.bounding_box(), Rect::new(10.0, 10.0, 50.0, 50.0));
        assert!(color_of(fills[0].0).a < 255);
    }

    #[test]
    fn test_cache_reused_across_moves_and_invalidated_on_restyle() {
        let mut scene = Scene::new();
        let element = rect(ElementStyle::default());
        let id = element.id;
        scene.add_element(element);
        let mut renderer = SketchRenderer::default();
        let mut surface = surface();

        renderer.render(&RenderContext::new(&scene), &mut surface).unwrap();
        let first = renderer.cache().get(id).unwrap();

        scene.modify_element(id, |e| e.translate(Vec2::new(40.0, 0.0)));
        let stats = renderer.render(&RenderContext::new(&scene), &mut surface).unwrap();
        assert_eq!(stats.cache.hits, 1);
        assert!(Rc::ptr_eq(&first, &renderer.cache().get(id).unwrap()));

        scene.set_selection([id]);
        assert!(scene.set_selected_style(&StylePatch::default().stroke_width(5.0)));
        renderer.render(&RenderContext::new(&scene), &mut surface).unwrap();
        assert!(!Rc::ptr_eq(&first, &renderer.cache().get(id).unwrap()));
    }

    #[test]
    fn test_deleted_elements_are_pruned() {
        let mut scene = Scene::new();
        let element = rect(ElementStyle::default());
        let id = element.id;
        scene.add_element(element);
        let mut renderer = SketchRenderer::default();
        let mut surface = surface();
        renderer.render(&RenderContext::new(&scene), &mut surface).unwrap();
        assert_eq!(renderer.cache().len(), 1);

        scene.remove_element(id);
        let stats = renderer.render(&RenderContext::new(&scene), &mut surface).unwrap();
        assert_eq!(stats.pruned, 1);
        assert!(renderer.cache().is_empty());
    }

    #[test]
    fn test_editing_element_is_skipped() {
        let mut scene = Scene::new();
        let mut text =
            Element::text(Point::ZERO, TextAlign::Left, TextBaseline::Top, clean_style());
        text.text = Some("draft".to_string());
        let id = text.id;
        scene.add_element(text);

        let mut surface = surface();
        let ctx = RenderContext::new(&scene).with_editing_element(Some(id));
        let stats = SketchRenderer::default().render(&ctx, &mut surface).unwrap();
        assert_eq!(stats.elements, 0);
        assert_eq!(surface.commands().len(), 1);
    }

    #[test]
    fn test_empty_surface_is_rejected() {
        let scene = Scene::new();
        let mut surface = RecordingSurface::new(Size::ZERO);
        let result = SketchRenderer::default().render(&RenderContext::new(&scene), &mut surface);
        assert!(matches!(result, Err(RendererError::InvalidSurface { .. })));
    }
}
