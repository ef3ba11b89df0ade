//! Viewport panning.

use super::{Tool, ToolContext};
use crate::geometry::CursorIcon;
use crate::scene::Scene;
use kurbo::Point;

/// Pans by the screen-space pointer delta while the pointer is down.
#[derive(Debug, Clone, Default)]
pub struct HandTool {
    last_screen: Option<Point>,
}

impl HandTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for HandTool {
    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>) {
        self.last_screen = Some(ctx.screen_point);
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(last) = self.last_screen else {
            return;
        };
        ctx.scene.pan(ctx.screen_point - last);
        self.last_screen = Some(ctx.screen_point);
    }

    fn on_pointer_up(&mut self, _ctx: &mut ToolContext<'_>) {
        self.last_screen = None;
    }

    fn is_active(&self) -> bool {
        self.last_screen.is_some()
    }

    fn reset(&mut self) {
        self.last_screen = None;
    }

    fn cursor(&self, _scene: &Scene, _point: Point) -> CursorIcon {
        if self.is_active() {
            CursorIcon::Grabbing
        } else {
            CursorIcon::Grab
        }
    }
}
