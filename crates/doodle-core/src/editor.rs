//! Input dispatch.
//!
//! [`Editor`] owns the scene and the active tool and routes every
//! [`InputEvent`] to exactly one handler. A pointer gesture, a pinch and a
//! wheel step never interleave: while one is in progress the others are
//! ignored.

use crate::config::EditorConfig;
use crate::element::ElementId;
use crate::geometry::CursorIcon;
use crate::history::History;
use crate::input::{InputEvent, KeyCommand, Modifiers};
use crate::scene::{AppState, Scene};
use crate::storage::PersistedState;
use crate::tools::{TextEditRequest, ToolContext, ToolKind, ToolManager};
use crate::viewport::Viewport;
use crate::welcome;
use kurbo::{Point, Rect, Size, Vec2};

/// Gesture currently owning the input stream.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// A tool is handling a pointer drag.
    Pointer { last: Point },
    /// Two-finger pinch; `distance` is the finger spread at the last update.
    Pinch { distance: f64 },
}

/// What the host should do after an event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorResponse {
    /// The frame is stale.
    pub redraw: bool,
    pub cursor: CursorIcon,
    /// Open a text editor for a freshly placed text element.
    pub text_edit: Option<TextEditRequest>,
    /// Persisted state changed (elements or dark mode).
    pub scene_changed: bool,
}

pub struct Editor {
    scene: Scene,
    tools: ToolManager,
    gesture: Gesture,
    text_edit: Option<TextEditRequest>,
    /// Last pointer position in screen pixels.
    hover: Point,
    viewport_size: Size,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let app_state = AppState {
            viewport: Viewport::with_zoom_bounds(config.min_zoom, config.max_zoom),
            current_style: config.default_style.clone(),
            ..AppState::default()
        };
        let scene = Scene::with_parts(app_state, History::with_limit(config.history_limit));
        Self {
            tools: ToolManager::new(scene.tool()),
            scene,
            gesture: Gesture::Idle,
            text_edit: None,
            hover: Point::ZERO,
            viewport_size: Size::ZERO,
            config,
        }
    }

    /// Editor over previously persisted state. Seeds welcome content into an
    /// empty scene when the config asks for it.
    pub fn with_state(config: EditorConfig, state: PersistedState) -> Self {
        let mut editor = Self::new(config);
        editor.scene.set_elements(state.elements);
        editor.scene.set_dark_mode(state.dark_mode);
        if editor.config.seed_initial_content {
            welcome::seed_if_empty(&mut editor.scene);
        }
        editor
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// The open text handoff, if any.
    pub fn text_edit(&self) -> Option<TextEditRequest> {
        self.text_edit
    }

    /// Marquee rectangle to draw, in world coordinates.
    pub fn marquee(&self) -> Option<Rect> {
        self.tools.marquee()
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState::from_scene(&self.scene)
    }

    /// Cursor for the last known pointer position.
    pub fn cursor(&self) -> CursorIcon {
        let world = self.scene.viewport().screen_to_world(self.hover);
        self.tools.cursor(&self.scene, world)
    }

    pub fn handle(&mut self, event: InputEvent) -> EditorResponse {
        let revision = self.scene.revision();
        let mut response = EditorResponse::default();

        match event {
            InputEvent::PointerDown {
                position,
                modifiers,
            } => self.pointer_down(position, modifiers, &mut response),
            InputEvent::PointerMove {
                position,
                modifiers,
            } => self.pointer_move(position, modifiers, &mut response),
            InputEvent::PointerUp {
                position,
                modifiers,
            } => self.pointer_up(position, modifiers, &mut response),
            InputEvent::Wheel {
                position,
                delta,
                modifiers,
            } => self.wheel(position, delta, modifiers, &mut response),
            InputEvent::TouchStart { touches } => self.touch_start(&touches, &mut response),
            InputEvent::TouchMove { touches } => self.touch_move(&touches, &mut response),
            InputEvent::TouchEnd { touches, changed } => {
                self.touch_end(&touches, changed, &mut response)
            }
            InputEvent::Resize { width, height } => {
                self.viewport_size = Size::new(width.max(0.0), height.max(0.0));
                response.redraw = true;
            }
            InputEvent::Key { key, modifiers } => {
                if let Some(command) = KeyCommand::from_shortcut(&key, modifiers) {
                    self.command(command, &mut response);
                }
            }
            InputEvent::Command { command } => self.command(command, &mut response),
            InputEvent::TextChanged {
                id,
                text,
                width,
                height,
            } => {
                response.redraw = self.update_text(id, text, Size::new(width, height));
            }
            InputEvent::TextCommitted => {
                response.redraw = self.finish_text_edit();
            }
        }

        self.tools.sync(self.scene.tool());
        self.scene.set_dragging(self.gesture != Gesture::Idle);
        response.cursor = self.cursor();
        response.scene_changed = self.scene.revision() != revision;
        if response.scene_changed {
            response.redraw = true;
        }
        response
    }

    fn pointer_down(
        &mut self,
        position: Point,
        modifiers: Modifiers,
        response: &mut EditorResponse,
    ) {
        self.hover = position;
        if self.text_edit.is_some() {
            response.redraw = self.finish_text_edit();
            return;
        }
        if self.gesture != Gesture::Idle {
            return;
        }

        let mut ctx = ToolContext::new(&mut self.scene, position, modifiers);
        self.tools.pointer_down(&mut ctx);
        if let Some(request) = ctx.take_text_edit() {
            self.text_edit = Some(request);
            response.text_edit = Some(request);
        }
        if self.tools.is_active() {
            self.gesture = Gesture::Pointer { last: position };
        }
        response.redraw = true;
    }

    fn pointer_move(
        &mut self,
        position: Point,
        modifiers: Modifiers,
        response: &mut EditorResponse,
    ) {
        self.hover = position;
        let Gesture::Pointer { last } = &mut self.gesture else {
            return;
        };
        *last = position;
        let mut ctx = ToolContext::new(&mut self.scene, position, modifiers);
        self.tools.pointer_move(&mut ctx);
        response.redraw = true;
    }

    fn pointer_up(
        &mut self,
        position: Option<Point>,
        modifiers: Modifiers,
        response: &mut EditorResponse,
    ) {
        let Gesture::Pointer { last } = self.gesture else {
            return;
        };
        let position = position.unwrap_or(last);
        self.hover = position;
        self.end_pointer_gesture(position, modifiers);
        response.redraw = true;
    }

    fn end_pointer_gesture(&mut self, position: Point, modifiers: Modifiers) {
        let mut ctx = ToolContext::new(&mut self.scene, position, modifiers);
        self.tools.pointer_up(&mut ctx);
        self.tools.reset();
        self.gesture = Gesture::Idle;
    }

    fn wheel(
        &mut self,
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
        response: &mut EditorResponse,
    ) {
        if self.gesture != Gesture::Idle {
            return;
        }
        self.hover = position;
        if modifiers.command() {
            if delta.y == 0.0 {
                return;
            }
            let step = self.config.wheel_zoom_step;
            let factor = if delta.y > 0.0 { 1.0 - step } else { 1.0 + step };
            self.scene.zoom_at(position, factor);
        } else {
            self.scene.pan(-delta);
        }
        response.redraw = true;
    }

    fn touch_start(&mut self, touches: &[Point], response: &mut EditorResponse) {
        match touches {
            [a, b, ..] => {
                if let Gesture::Pointer { last } = self.gesture {
                    log::debug!("pinch started mid-gesture, committing at {:?}", last);
                    self.end_pointer_gesture(last, Modifiers::NONE);
                }
                self.gesture = Gesture::Pinch {
                    distance: (*a - *b).hypot(),
                };
                response.redraw = true;
            }
            [single] if self.gesture == Gesture::Idle => {
                self.pointer_down(*single, Modifiers::NONE, response);
            }
            _ => {}
        }
    }

    fn touch_move(&mut self, touches: &[Point], response: &mut EditorResponse) {
        match (self.gesture, touches) {
            (Gesture::Pinch { distance }, [a, b, ..]) => {
                let spread = (*a - *b).hypot();
                if distance > f64::EPSILON && spread > f64::EPSILON {
                    self.scene.zoom_at(a.midpoint(*b), spread / distance);
                }
                self.gesture = Gesture::Pinch { distance: spread };
                response.redraw = true;
            }
            (Gesture::Pointer { .. }, [single]) => {
                self.pointer_move(*single, Modifiers::NONE, response);
            }
            _ => {}
        }
    }

    fn touch_end(
        &mut self,
        touches: &[Point],
        changed: Option<Point>,
        response: &mut EditorResponse,
    ) {
        match self.gesture {
            Gesture::Pinch { .. } if touches.len() < 2 => {
                self.gesture = Gesture::Idle;
                response.redraw = true;
            }
            Gesture::Pointer { .. } if touches.is_empty() => {
                self.pointer_up(changed, Modifiers::NONE, response);
            }
            _ => {}
        }
    }

    fn command(&mut self, command: KeyCommand, response: &mut EditorResponse) {
        if command == KeyCommand::Cancel {
            if let Gesture::Pointer { last } = self.gesture {
                self.end_pointer_gesture(last, Modifiers::NONE);
            }
            self.gesture = Gesture::Idle;
            self.finish_text_edit();
            response.redraw = true;
            return;
        }
        if self.gesture != Gesture::Idle {
            log::debug!("ignoring {:?} during a gesture", command);
            return;
        }

        match command {
            KeyCommand::Undo => {
                self.scene.undo();
            }
            KeyCommand::Redo => {
                self.scene.redo();
            }
            KeyCommand::Group => {
                self.scene.group_selection();
            }
            KeyCommand::Ungroup => {
                self.scene.ungroup_selection();
            }
            KeyCommand::Delete => {
                self.scene.delete_selected();
            }
            KeyCommand::SelectAll => self.scene.select_all(),
            KeyCommand::ToggleDarkMode => {
                let dark_mode = !self.scene.app_state().dark_mode;
                self.scene.set_dark_mode(dark_mode);
            }
            KeyCommand::SetTool(tool) => {
                self.scene.set_tool(tool);
                if tool != ToolKind::Selection {
                    self.scene.clear_selection();
                }
            }
            KeyCommand::Cancel => {}
        }
        response.redraw = true;
    }

    /// Live text update from the text-input collaborator. Records no history.
    pub fn update_text(&mut self, id: ElementId, text: String, size: Size) -> bool {
        self.scene.modify_element(id, |el| {
            el.text = Some(text);
            el.width = size.width;
            el.height = size.height;
        })
    }

    /// Close the text handoff. An element left without text is removed.
    pub fn finish_text_edit(&mut self) -> bool {
        let Some(request) = self.text_edit.take() else {
            return false;
        };
        let empty = self
            .scene
            .element(request.element_id)
            .is_some_and(|el| el.text_content().trim().is_empty());
        if empty {
            log::debug!("removing empty text {}", request.element_id);
            self.scene.remove_element(request.element_id);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    fn editor() -> Editor {
        Editor::new(EditorConfig {
            seed_initial_content: false,
            ..EditorConfig::default()
        })
    }

    fn down(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerDown {
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    fn moved(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMove {
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    fn up(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerUp {
            position: Some(Point::new(x, y)),
            modifiers: Modifiers::NONE,
        }
    }

    fn set_tool(tool: ToolKind) -> InputEvent {
        InputEvent::Command {
            command: KeyCommand::SetTool(tool),
        }
    }

    #[test]
    fn test_draw_rectangle_end_to_end() {
        let mut editor = editor();
        editor.handle(set_tool(ToolKind::Rectangle));
        editor.handle(down(100.0, 100.0));
        assert!(editor.scene().app_state().is_dragging);
        editor.handle(moved(70.0, 60.0));
        let response = editor.handle(up(50.0, 50.0));

        assert!(response.scene_changed);
        assert!(!editor.scene().app_state().is_dragging);
        let el = &editor.scene().elements()[0];
        assert_eq!((el.x, el.y, el.width, el.height), (70.0, 60.0, 30.0, 40.0));
        assert_eq!(editor.scene().tool(), ToolKind::Selection);
    }

    #[test]
    fn test_pointer_up_without_position_uses_last() {
        let mut editor = editor();
        editor.handle(set_tool(ToolKind::Line));
        editor.handle(down(0.0, 0.0));
        editor.handle(moved(40.0, 30.0));
        editor.handle(InputEvent::PointerUp {
            position: None,
            modifiers: Modifiers::NONE,
        });

        let el = &editor.scene().elements()[0];
        assert_eq!(el.points, vec![Point::new(0.0, 0.0), Point::new(40.0, 30.0)]);
        assert!(editor.scene().elements().iter().all(|el| el.is_well_formed()));
    }

    #[test]
    fn test_wheel_pans_and_zooms() {
        let mut editor = editor();
        editor.handle(InputEvent::Wheel {
            position: Point::new(0.0, 0.0),
            delta: Vec2::new(10.0, 20.0),
            modifiers: Modifiers::NONE,
        });
        assert_eq!(editor.scene().viewport().scroll, Vec2::new(-10.0, -20.0));

        let anchor = Point::new(200.0, 150.0);
        let world_before = editor.scene().viewport().screen_to_world(anchor);
        editor.handle(InputEvent::Wheel {
            position: anchor,
            delta: Vec2::new(0.0, -1.0),
            modifiers: Modifiers::CTRL,
        });
        let viewport = editor.scene().viewport();
        assert!((viewport.zoom - 1.1).abs() < 1e-9);
        let world_after = viewport.screen_to_world(anchor);
        assert!((world_after - world_before).hypot() < 1e-9);
    }

    #[test]
    fn test_wheel_ignored_during_drag() {
        let mut editor = editor();
        editor.handle(set_tool(ToolKind::Rectangle));
        editor.handle(down(0.0, 0.0));
        editor.handle(InputEvent::Wheel {
            position: Point::ZERO,
            delta: Vec2::new(0.0, 50.0),
            modifiers: Modifiers::NONE,
        });
        assert_eq!(editor.scene().viewport().scroll, Vec2::ZERO);
    }

    #[test]
    fn test_pinch_commits_pointer_gesture() {
        let mut editor = editor();
        editor.handle(set_tool(ToolKind::Pencil));
        editor.handle(InputEvent::TouchStart {
            touches: vec![Point::new(10.0, 10.0)],
        });
        editor.handle(InputEvent::TouchMove {
            touches: vec![Point::new(20.0, 10.0)],
        });
        editor.handle(InputEvent::TouchStart {
            touches: vec![Point::new(20.0, 10.0), Point::new(120.0, 10.0)],
        });

        let stroke = &editor.scene().elements()[0];
        assert_eq!(stroke.kind, ElementKind::Pencil);
        assert_eq!(editor.scene().tool(), ToolKind::Selection);

        editor.handle(InputEvent::TouchMove {
            touches: vec![Point::new(0.0, 10.0), Point::new(200.0, 10.0)],
        });
        assert!((editor.scene().viewport().zoom - 2.0).abs() < 1e-9);
        assert_eq!(editor.scene().elements()[0].points.len(), 2);

        editor.handle(InputEvent::TouchEnd {
            touches: vec![Point::new(0.0, 10.0)],
            changed: Some(Point::new(200.0, 10.0)),
        });
        assert!(!editor.scene().app_state().is_dragging);
    }

    #[test]
    fn test_text_handoff_lifecycle() {
        let mut editor = editor();
        editor.handle(set_tool(ToolKind::Text));
        let response = editor.handle(down(30.0, 40.0));
        let request = response.text_edit.unwrap();
        assert_eq!(request.screen_position, Point::new(30.0, 40.0));

        editor.handle(InputEvent::TextChanged {
            id: request.element_id,
            text: "hello".into(),
            width: 50.0,
            height: 20.0,
        });
        assert_eq!(editor.scene().history().undo_depth(), 1);

        // The next click only closes the handoff.
        editor.handle(down(300.0, 300.0));
        assert!(editor.text_edit().is_none());
        assert_eq!(editor.scene().len(), 1);
        assert_eq!(
            editor.scene().element(request.element_id).unwrap().text_content(),
            "hello"
        );
    }

    #[test]
    fn test_empty_text_is_removed_on_commit() {
        let mut editor = editor();
        editor.handle(set_tool(ToolKind::Text));
        editor.handle(down(30.0, 40.0));
        assert_eq!(editor.scene().len(), 1);

        editor.handle(InputEvent::TextCommitted);
        assert!(editor.scene().is_empty());
        assert!(editor.text_edit().is_none());
    }

    #[test]
    fn test_commands_ignored_mid_gesture() {
        let mut editor = editor();
        editor.handle(set_tool(ToolKind::Rectangle));
        editor.handle(down(0.0, 0.0));
        editor.handle(moved(20.0, 20.0));
        editor.handle(InputEvent::Command {
            command: KeyCommand::Undo,
        });
        assert_eq!(editor.scene().len(), 1);

        editor.handle(InputEvent::Key {
            key: "Escape".into(),
            modifiers: Modifiers::NONE,
        });
        assert!(!editor.scene().app_state().is_dragging);
        assert_eq!(editor.scene().elements()[0].width, 20.0);

        editor.handle(InputEvent::Key {
            key: "z".into(),
            modifiers: Modifiers::CTRL,
        });
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn test_toggle_dark_mode_changes_scene() {
        let mut editor = editor();
        let response = editor.handle(InputEvent::Command {
            command: KeyCommand::ToggleDarkMode,
        });
        assert!(response.scene_changed);
        assert!(editor.persisted_state().dark_mode);
    }

    #[test]
    fn test_with_state_seeds_empty_scene() {
        let editor = Editor::with_state(EditorConfig::default(), PersistedState::default());
        assert!(!editor.scene().is_empty());
        assert!(!editor.scene().can_undo());

        let config = EditorConfig {
            seed_initial_content: false,
            ..EditorConfig::default()
        };
        let editor = Editor::with_state(config, PersistedState::default());
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn test_resize_records_viewport_size() {
        let mut editor = editor();
        let response = editor.handle(InputEvent::Resize {
            width: 800.0,
            height: 600.0,
        });
        assert!(response.redraw);
        assert!(!response.scene_changed);
        assert_eq!(editor.viewport_size(), Size::new(800.0, 600.0));
    }
}
