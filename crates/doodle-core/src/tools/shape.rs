//! Drag-to-draw tool for rectangles, circles, diamonds, lines and arrows.

use super::{Tool, ToolContext, ToolKind};
use crate::element::{Element, ElementId, ElementKind};
use crate::geometry::CursorIcon;
use crate::scene::Scene;
use kurbo::Point;

#[derive(Debug, Clone)]
pub struct ShapeTool {
    kind: ElementKind,
    /// Element being drawn and the drag origin.
    current: Option<(ElementId, Point)>,
}

impl ShapeTool {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            current: None,
        }
    }

    pub fn element_kind(&self) -> ElementKind {
        self.kind
    }

    pub fn tool_kind(&self) -> ToolKind {
        match self.kind {
            ElementKind::Rectangle => ToolKind::Rectangle,
            ElementKind::Circle => ToolKind::Circle,
            ElementKind::Diamond => ToolKind::Diamond,
            ElementKind::Line => ToolKind::Line,
            ElementKind::Arrow => ToolKind::Arrow,
            ElementKind::Pencil => ToolKind::Pencil,
            ElementKind::Text => ToolKind::Text,
        }
    }

    pub fn current_element(&self) -> Option<ElementId> {
        self.current.map(|(id, _)| id)
    }
}

impl Tool for ShapeTool {
    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>) {
        let style = ctx.scene.app_state().current_style.reseeded();
        let element = Element::new(self.kind, ctx.point, style);
        self.current = Some((element.id, ctx.point));

        ctx.scene.add_to_history();
        log::debug!("drawing {:?} {} at {:?}", self.kind, element.id, ctx.point);
        ctx.scene.add_element(element);
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>) {
        let Some((id, start)) = self.current else {
            return;
        };
        let cursor = ctx.point;
        if self.kind.is_linear() {
            ctx.scene.modify_element(id, |el| {
                el.points = vec![start, cursor];
                el.sync_anchor();
            });
        } else {
            ctx.scene.modify_element(id, |el| {
                el.width = cursor.x - start.x;
                el.height = cursor.y - start.y;
            });
        }
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>) {
        let Some((id, _)) = self.current.take() else {
            return;
        };
        if self.kind.is_box_shape() {
            ctx.scene.modify_element(id, Element::normalize);
        }
        if ctx.scene.element(id).is_some() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn drag(tool: &mut ShapeTool, scene: &mut Scene, from: (f64, f64), to: (f64, f64)) {
        let mut ctx = ToolContext::new(scene, Point::new(from.0, from.1), Modifiers::NONE);
        tool.on_pointer_down(&mut ctx);
        let mut ctx = ToolContext::new(scene, Point::new(to.0, to.1), Modifiers::NONE);
        tool.on_pointer_move(&mut ctx);
        tool.on_pointer_up(&mut ctx);
    }

    #[test]
    fn test_up_left_drag_is_normalized() {
        let mut scene = Scene::new();
        let mut tool = ShapeTool::new(ElementKind::Rectangle);
        drag(&mut tool, &mut scene, (100.0, 100.0), (50.0, 50.0));

        let el = &scene.elements()[0];
        assert_eq!((el.x, el.y, el.width, el.height), (50.0, 50.0, 50.0, 50.0));
        assert_eq!(scene.selection(), &[el.id]);
        assert_eq!(scene.tool(), ToolKind::Selection);
    }

    #[test]
    fn test_extent_stays_signed_while_dragging() {
        let mut scene = Scene::new();
        let mut tool = ShapeTool::new(ElementKind::Diamond);
        let mut ctx = ToolContext::new(&mut scene, Point::new(100.0, 100.0), Modifiers::NONE);
        tool.on_pointer_down(&mut ctx);
        let mut ctx = ToolContext::new(&mut scene, Point::new(40.0, 130.0), Modifiers::NONE);
        tool.on_pointer_move(&mut ctx);

        let el = &scene.elements()[0];
        assert_eq!((el.width, el.height), (-60.0, 30.0));
    }

    #[test]
    fn test_line_points_are_start_and_cursor() {
        let mut scene = Scene::new();
        let mut tool = ShapeTool::new(ElementKind::Arrow);
        let mut ctx = ToolContext::new(&mut scene, Point::new(10.0, 10.0), Modifiers::NONE);
        tool.on_pointer_down(&mut ctx);
        assert_eq!(ctx.scene.elements()[0].points, vec![Point::new(10.0, 10.0)]);

        for x in [20.0, 40.0, 80.0] {
            let mut ctx = ToolContext::new(&mut scene, Point::new(x, 30.0), Modifiers::NONE);
            tool.on_pointer_move(&mut ctx);
        }
        let mut ctx = ToolContext::new(&mut scene, Point::new(80.0, 30.0), Modifiers::NONE);
        tool.on_pointer_up(&mut ctx);

        let el = &scene.elements()[0];
        assert_eq!(el.points, vec![Point::new(10.0, 10.0), Point::new(80.0, 30.0)]);
        assert_eq!(el.anchor(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_one_history_entry_per_shape() {
        let mut scene = Scene::new();
        let mut tool = ShapeTool::new(ElementKind::Circle);
        drag(&mut tool, &mut scene, (0.0, 0.0), (30.0, 30.0));
        drag(&mut tool, &mut scene, (50.0, 50.0), (80.0, 80.0));
        assert_eq!(scene.history().undo_depth(), 2);

        scene.undo();
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut scene = Scene::new();
        let mut tool = ShapeTool::new(ElementKind::Rectangle);
        let mut ctx = ToolContext::new(&mut scene, Point::new(10.0, 10.0), Modifiers::NONE);
        tool.on_pointer_move(&mut ctx);
        tool.on_pointer_up(&mut ctx);
        assert!(scene.is_empty());
    }
}
