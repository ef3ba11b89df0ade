//! Text placement.
//!
//! The tool only creates an empty text element and asks the host to open an
//! editor over it; typing happens outside the core.

use super::{Tool, ToolContext};
use crate::element::{Element, ElementId, ElementKind, TextAlign, TextBaseline};
use crate::geometry::{self, BORDER_THRESHOLD, CursorIcon};
use crate::scene::Scene;
use kurbo::Point;

/// Gap between a container's top edge and top-aligned text.
const TOP_PADDING: f64 = 10.0;

#[derive(Debug, Clone, Default)]
pub struct TextTool;

impl TextTool {
    pub fn new() -> Self {
        Self
    }
}

/// Where new text goes for a click at `point`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub at: Point,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub container: Option<ElementId>,
    pub on_border: bool,
}

impl TextPlacement {
    fn free(at: Point) -> Self {
        Self {
            at,
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
            container: None,
            on_border: false,
        }
    }
}

fn accepts_border_text(kind: ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Rectangle
            | ElementKind::Diamond
            | ElementKind::Circle
            | ElementKind::Line
            | ElementKind::Arrow
    )
}

/// Topmost border under `point`, unless a shape above it covers the point.
fn border_at(point: Point, elements: &[Element]) -> Option<&Element> {
    for el in elements.iter().rev() {
        if accepts_border_text(el.kind) && geometry::point_on_border(point, el, BORDER_THRESHOLD) {
            return Some(el);
        }
        if geometry::point_in_element(point, el) {
            return None;
        }
    }
    None
}

/// Resolve the placement of text clicked at world `point`.
pub fn text_placement(point: Point, elements: &[Element]) -> TextPlacement {
    if let Some(container) = border_at(point, elements) {
        return TextPlacement {
            at: point,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
            container: Some(container.id),
            on_border: true,
        };
    }

    match geometry::element_at_position(point, elements) {
        Some(shape) if matches!(shape.kind, ElementKind::Rectangle | ElementKind::Circle) => {
            let rect = shape.box_rect();
            let center = rect.center();
            let top_third = point.y - rect.y0 < rect.height() / 3.0;
            let (y, baseline) = if top_third {
                (rect.y0 + TOP_PADDING, TextBaseline::Top)
            } else {
                (center.y, TextBaseline::Middle)
            };
            TextPlacement {
                at: Point::new(center.x, y),
                align: TextAlign::Center,
                baseline,
                container: Some(shape.id),
                on_border: false,
            }
        }
        _ => TextPlacement::free(point),
    }
}

impl Tool for TextTool {
    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>) {
        let placement = text_placement(ctx.point, ctx.scene.elements());
        let style = ctx.scene.app_state().current_style.reseeded();
        let mut element = Element::text(placement.at, placement.align, placement.baseline, style);
        element.container_element_id = placement.container;
        element.on_container_border = placement.on_border;
        let id = element.id;

        ctx.scene.add_to_history();
        ctx.scene.add_element(element);
        log::debug!("text {} placed at {:?} in {:?}", id, placement.at, placement.container);
        ctx.request_text_edit(id);
    }

    fn on_pointer_move(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn on_pointer_up(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn is_active(&self) -> bool {
        false
    }

    fn reset(&mut self) {}

    fn cursor(&self, _scene: &Scene, _point: Point) -> CursorIcon {
        CursorIcon::Text
    }
}
