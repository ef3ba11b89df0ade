//! Per-tool pointer state machines.
//!
//! Each tool implements [`Tool`] against a [`ToolContext`] that carries the
//! cursor position and mutable access to the [`Scene`]. Tools keep only their
//! own gesture state; elements always live in the scene.

mod hand;
mod pencil;
mod selection;
mod shape;
mod text;

pub use hand::HandTool;
pub use pencil::PencilTool;
pub use selection::{SelectionMode, SelectionTool};
pub use shape::ShapeTool;
pub use text::TextTool;

use crate::element::{ElementId, ElementKind};
use crate::geometry::CursorIcon;
use crate::input::Modifiers;
use crate::scene::Scene;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Selection,
    Rectangle,
    Circle,
    Diamond,
    Line,
    Arrow,
    Pencil,
    Text,
    Hand,
}

impl ToolKind {
    /// Element kind drawn by a shape tool.
    pub fn shape_kind(self) -> Option<ElementKind> {
        match self {
            ToolKind::Rectangle => Some(ElementKind::Rectangle),
            ToolKind::Circle => Some(ElementKind::Circle),
            ToolKind::Diamond => Some(ElementKind::Diamond),
            ToolKind::Line => Some(ElementKind::Line),
            ToolKind::Arrow => Some(ElementKind::Arrow),
            _ => None,
        }
    }
}

/// Request for the host to open a text editor over a new text element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextEditRequest {
    pub element_id: ElementId,
    /// Element anchor in screen pixels.
    pub screen_position: Point,
}

/// What a tool sees during one pointer event.
pub struct ToolContext<'a> {
    pub scene: &'a mut Scene,
    /// Cursor in world coordinates.
    pub point: Point,
    /// Cursor in screen pixels.
    pub screen_point: Point,
    pub modifiers: Modifiers,
    text_edit: Option<TextEditRequest>,
}

impl<'a> ToolContext<'a> {
    pub fn new(scene: &'a mut Scene, screen_point: Point, modifiers: Modifiers) -> Self {
        let point = scene.viewport().screen_to_world(screen_point);
        Self {
            scene,
            point,
            screen_point,
            modifiers,
            text_edit: None,
        }
    }

    /// Ask the host to start editing `element_id` at its on-screen anchor.
    pub fn request_text_edit(&mut self, element_id: ElementId) {
        let Some(element) = self.scene.element(element_id) else {
            return;
        };
        let screen_position = self.scene.viewport().world_to_screen(element.anchor());
        self.text_edit = Some(TextEditRequest {
            element_id,
            screen_position,
        });
    }

    pub fn take_text_edit(&mut self) -> Option<TextEditRequest> {
        self.text_edit.take()
    }

    pub fn zoom(&self) -> f64 {
        self.scene.viewport().zoom
    }
}

/// Uniform pointer contract shared by every tool.
pub trait Tool {
    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>);

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>);

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>);

    /// A gesture is in progress.
    fn is_active(&self) -> bool;

    /// Drop gesture state without touching the scene.
    fn reset(&mut self);

    /// Cursor for a hover at world `point`.
    fn cursor(&self, _scene: &Scene, _point: Point) -> CursorIcon {
        CursorIcon::Default
    }
}

/// The tool currently bound to `AppState.tool`.
#[derive(Debug, Clone)]
pub enum ActiveTool {
    Selection(SelectionTool),
    Shape(ShapeTool),
    Pencil(PencilTool),
    Text(TextTool),
    Hand(HandTool),
}

impl ActiveTool {
    pub fn for_kind(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Selection => ActiveTool::Selection(SelectionTool::new()),
            ToolKind::Pencil => ActiveTool::Pencil(PencilTool::new()),
            ToolKind::Text => ActiveTool::Text(TextTool::new()),
            ToolKind::Hand => ActiveTool::Hand(HandTool::new()),
            ToolKind::Rectangle
            | ToolKind::Circle
            | ToolKind::Diamond
            | ToolKind::Line
            | ToolKind::Arrow => match kind.shape_kind() {
                Some(shape) => ActiveTool::Shape(ShapeTool::new(shape)),
                None => ActiveTool::Selection(SelectionTool::new()),
            },
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ActiveTool::Selection(_) => ToolKind::Selection,
            ActiveTool::Shape(tool) => tool.tool_kind(),
            ActiveTool::Pencil(_) => ToolKind::Pencil,
            ActiveTool::Text(_) => ToolKind::Text,
            ActiveTool::Hand(_) => ToolKind::Hand,
        }
    }

    fn as_tool(&self) -> &dyn Tool {
        match self {
            ActiveTool::Selection(tool) => tool,
            ActiveTool::Shape(tool) => tool,
            ActiveTool::Pencil(tool) => tool,
            ActiveTool::Text(tool) => tool,
            ActiveTool::Hand(tool) => tool,
        }
    }

    fn as_tool_mut(&mut self) -> &mut dyn Tool {
        match self {
            ActiveTool::Selection(tool) => tool,
            ActiveTool::Shape(tool) => tool,
            ActiveTool::Pencil(tool) => tool,
            ActiveTool::Text(tool) => tool,
            ActiveTool::Hand(tool) => tool,
        }
    }
}

impl Tool for ActiveTool {
    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>) {
        self.as_tool_mut().on_pointer_down(ctx);
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>) {
        self.as_tool_mut().on_pointer_move(ctx);
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>) {
        self.as_tool_mut().on_pointer_up(ctx);
    }

    fn is_active(&self) -> bool {
        self.as_tool().is_active()
    }

    fn reset(&mut self) {
        self.as_tool_mut().reset();
    }

    fn cursor(&self, scene: &Scene, point: Point) -> CursorIcon {
        self.as_tool().cursor(scene, point)
    }
}

/// Owns the active tool and keeps it in step with `AppState.tool`.
#[derive(Debug, Clone)]
pub struct ToolManager {
    active: ActiveTool,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new(ToolKind::default())
    }
}

impl ToolManager {
    pub fn new(kind: ToolKind) -> Self {
        Self {
            active: ActiveTool::for_kind(kind),
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.active.kind()
    }

    pub fn active(&self) -> &ActiveTool {
        &self.active
    }

    /// Swap in a fresh tool if `kind` differs from the active one.
    pub fn sync(&mut self, kind: ToolKind) {
        if self.active.kind() != kind {
            self.active.reset();
            self.active = ActiveTool::for_kind(kind);
        }
    }

    pub fn pointer_down(&mut self, ctx: &mut ToolContext<'_>) {
        self.sync(ctx.scene.tool());
        self.active.on_pointer_down(ctx);
    }

    pub fn pointer_move(&mut self, ctx: &mut ToolContext<'_>) {
        self.active.on_pointer_move(ctx);
    }

    pub fn pointer_up(&mut self, ctx: &mut ToolContext<'_>) {
        self.active.on_pointer_up(ctx);
        // Tools may switch `AppState.tool` when a gesture finishes.
        self.sync(ctx.scene.tool());
    }

    pub fn is_active(&self) -> bool {
        self.active.is_active()
    }

    pub fn reset(&mut self) {
        self.active.reset();
    }

    pub fn cursor(&self, scene: &Scene, point: Point) -> CursorIcon {
        self.active.cursor(scene, point)
    }

    /// Rubber-band rectangle of an in-progress marquee, normalized.
    pub fn marquee(&self) -> Option<Rect> {
        match &self.active {
            ActiveTool::Selection(tool) => tool.marquee(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(tools: &mut ToolManager, scene: &mut Scene, x: f64, y: f64) {
        let mut ctx = ToolContext::new(scene, Point::new(x, y), Modifiers::NONE);
        tools.pointer_down(&mut ctx);
    }

    fn moved(tools: &mut ToolManager, scene: &mut Scene, x: f64, y: f64) {
        let mut ctx = ToolContext::new(scene, Point::new(x, y), Modifiers::NONE);
        tools.pointer_move(&mut ctx);
    }

    fn up(tools: &mut ToolManager, scene: &mut Scene, x: f64, y: f64) {
        let mut ctx = ToolContext::new(scene, Point::new(x, y), Modifiers::NONE);
        tools.pointer_up(&mut ctx);
    }

    #[test]
    fn test_tool_selection() {
        let mut tools = ToolManager::default();
        assert_eq!(tools.kind(), ToolKind::Selection);

        tools.sync(ToolKind::Arrow);
        assert_eq!(tools.kind(), ToolKind::Arrow);
        assert!(matches!(tools.active(), ActiveTool::Shape(_)));
    }

    #[test]
    fn test_shape_gesture_switches_back_to_selection() {
        let mut scene = Scene::new();
        scene.set_tool(ToolKind::Rectangle);
        let mut tools = ToolManager::new(ToolKind::Rectangle);

        down(&mut tools, &mut scene, 10.0, 10.0);
        assert!(tools.is_active());
        moved(&mut tools, &mut scene, 60.0, 40.0);
        up(&mut tools, &mut scene, 60.0, 40.0);

        assert!(!tools.is_active());
        assert_eq!(scene.tool(), ToolKind::Selection);
        assert_eq!(tools.kind(), ToolKind::Selection);
        assert_eq!(scene.selection(), &[scene.elements()[0].id]);
    }

    #[test]
    fn test_context_maps_screen_to_world() {
        let mut scene = Scene::new();
        scene.set_zoom(2.0);
        scene.set_scroll(100.0, 50.0);
        let ctx = ToolContext::new(&mut scene, Point::new(140.0, 90.0), Modifiers::NONE);
        assert_eq!(ctx.point, Point::new(20.0, 20.0));
    }

    #[test]
    fn test_marquee_only_from_selection_tool() {
        let mut scene = Scene::new();
        let mut tools = ToolManager::default();
        down(&mut tools, &mut scene, 0.0, 0.0);
        moved(&mut tools, &mut scene, 30.0, -20.0);
        assert_eq!(tools.marquee(), Some(Rect::new(0.0, -20.0, 30.0, 0.0)));

        up(&mut tools, &mut scene, 30.0, -20.0);
        assert_eq!(tools.marquee(), None);
    }
}
