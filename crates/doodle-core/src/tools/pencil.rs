//! Freehand drawing.

use super::{Tool, ToolContext, ToolKind};
use crate::element::{Element, ElementId, ElementKind};
use crate::geometry::CursorIcon;
use crate::scene::Scene;
use kurbo::Point;

#[derive(Debug, Clone, Default)]
pub struct PencilTool {
    current: Option<ElementId>,
}

impl PencilTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for PencilTool {
    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>) {
        let style = ctx.scene.app_state().current_style.reseeded();
        let element = Element::new(ElementKind::Pencil, ctx.point, style);
        self.current = Some(element.id);

        ctx.scene.add_to_history();
        ctx.scene.add_element(element);
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(id) = self.current else {
            return;
        };
        let point = ctx.point;
        ctx.scene.modify_element(id, |el| el.points.push(point));
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(id) = self.current.take() else {
            return;
        };
        if let Some(el) = ctx.scene.element(id) {
            log::debug!("pencil stroke {} with {} points", id, el.points.len());
            ctx.scene.set_selection([id]);
        }
        ctx.scene.set_tool(ToolKind::Selection);
    }

    fn is_active(&self) -> bool {
        self.current.is_some()
    }

    fn reset(&mut self) {
        self.current = None;
    }

    fn cursor(&self, _scene: &Scene, _point: Point) -> CursorIcon {
        CursorIcon::Crosshair
    }
}
