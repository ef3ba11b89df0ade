//! Selection tool: control-point edits, resize, drag-move and marquee.
//!
//! The mode is picked once on pointer-down and held until pointer-up.

use super::{Tool, ToolContext};
use crate::element::{Element, ElementId, ElementKind, TextAlign, TextBaseline};
use crate::geometry::{
    self, ControlPoint, CursorIcon, ResizeHandle, line_control_point, resize_handle_at,
    selection_bounds,
};
use crate::scene::Scene;
use kurbo::{Point, Rect, Vec2};

/// Signed `(x, y, width, height)` box tracked during a resize.
type Frame = (f64, f64, f64, f64);

#[derive(Debug, Clone, Default)]
pub enum SelectionMode {
    #[default]
    Idle,
    /// Dragging a start, middle or end point of a single line/arrow.
    ControlPoint { id: ElementId, point: ControlPoint },
    /// Dragging a resize handle. `original` is `None` for multi-element
    /// selections, which do not resize.
    Resize {
        handle: ResizeHandle,
        original: Option<Box<Element>>,
        frame: Frame,
    },
    /// Moving the selection. History is recorded on the first move.
    Drag { snapshotted: bool },
    Marquee { origin: Point, current: Point },
}

#[derive(Debug, Clone, Default)]
pub struct SelectionTool {
    mode: SelectionMode,
    last: Point,
}

impl SelectionTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &SelectionMode {
        &self.mode
    }

    /// Normalized marquee rectangle while rubber-band selecting.
    pub fn marquee(&self) -> Option<Rect> {
        match self.mode {
            SelectionMode::Marquee { origin, current } => Some(Rect::from_points(origin, current)),
            _ => None,
        }
    }

    fn begin(&mut self, ctx: &mut ToolContext<'_>) -> SelectionMode {
        let point = ctx.point;
        let zoom = ctx.zoom();
        let selected: Vec<&Element> = ctx.scene.selected_elements().collect();

        if let [single] = selected.as_slice() {
            if single.kind.is_linear() {
                if let Some(cp) = line_control_point(point, single, zoom) {
                    let id = single.id;
                    ctx.scene.add_to_history();
                    return SelectionMode::ControlPoint { id, point: cp };
                }
            }
        }

        if !selected.iter().all(|el| el.kind.is_linear()) {
            let handle = selection_bounds(selected.iter().copied())
                .and_then(|bounds| resize_handle_at(point, bounds, zoom).map(|h| (h, bounds)));
            if let Some((handle, bounds)) = handle {
                let original = match selected.as_slice() {
                    [single] => Some(Box::new((*single).clone())),
                    _ => None,
                };
                if original.is_some() {
                    ctx.scene.add_to_history();
                }
                return SelectionMode::Resize {
                    handle,
                    original,
                    frame: (bounds.x0, bounds.y0, bounds.width(), bounds.height()),
                };
            }
        }

        let hit = geometry::element_at_position(point, ctx.scene.elements())
            .map(|el| (el.id, el.group_id));
        if let Some((id, group_id)) = hit {
            let picked = match group_id {
                Some(group_id) => ctx.scene.group_members(group_id),
                None => vec![id],
            };
            if ctx.modifiers.shift {
                let mut union = ctx.scene.selection().to_vec();
                union.extend(picked);
                ctx.scene.set_selection(union);
            } else if !ctx.scene.app_state().is_selected(id) {
                ctx.scene.set_selection(picked);
            }
            return SelectionMode::Drag { snapshotted: false };
        }

        ctx.scene.clear_selection();
        SelectionMode::Marquee {
            origin: point,
            current: point,
        }
    }
}

/// Refit `original` into the signed `frame`.
fn fit_to_frame(element: &mut Element, original: &Element, frame: Frame) {
    let (x, y, w, h) = frame;
    match original.kind {
        ElementKind::Rectangle | ElementKind::Circle | ElementKind::Diamond => {
            element.x = x;
            element.y = y;
            element.width = w;
            element.height = h;
        }
        ElementKind::Pencil | ElementKind::Line | ElementKind::Arrow => {
            let old = original.bounds();
            let scale = |extent: f64, old_extent: f64| {
                if old_extent.abs() > f64::EPSILON {
                    extent / old_extent
                } else {
                    1.0
                }
            };
            let sx = scale(w, old.width());
            let sy = scale(h, old.height());
            element.points = original
                .points
                .iter()
                .map(|p| Point::new(x + (p.x - old.x0) * sx, y + (p.y - old.y0) * sy))
                .collect();
            element.sync_anchor();
        }
        ElementKind::Text => {
            let rect = Rect::new(x, y, x + w, y + h).abs();
            element.width = rect.width();
            element.height = rect.height();
            element.x = match original.text_align {
                TextAlign::Left => rect.x0,
                TextAlign::Center => rect.center().x,
                TextAlign::Right => rect.x1,
            };
            element.y = match original.text_baseline {
                TextBaseline::Top => rect.y0,
                TextBaseline::Middle => rect.center().y,
                TextBaseline::Bottom => rect.y1,
            };
        }
    }
}

fn move_control_point(element: &mut Element, point: ControlPoint, delta: Vec2) {
    match point {
        ControlPoint::Start => {
            if let Some(first) = element.points.first_mut() {
                *first += delta;
            }
            element.sync_anchor();
        }
        ControlPoint::End => {
            if let Some(last) = element.points.last_mut() {
                *last += delta;
            }
        }
        ControlPoint::Middle => element.translate(delta),
    }
}

impl Tool for SelectionTool {
    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>) {
        self.last = ctx.point;
        self.mode = self.begin(ctx);
        log::debug!("selection gesture: {:?}", self.mode);
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>) {
        let point = ctx.point;
        let delta = point - self.last;
        self.last = point;

        match &mut self.mode {
            SelectionMode::Idle => {}
            SelectionMode::ControlPoint { id, point: cp } => {
                let cp = *cp;
                ctx.scene
                    .modify_element(*id, |el| move_control_point(el, cp, delta));
            }
            SelectionMode::Resize {
                handle,
                original,
                frame,
            } => {
                let Some(original) = original else {
                    return;
                };
                *frame = handle.apply(*frame, delta);
                let frame = *frame;
                ctx.scene
                    .modify_element(original.id, |el| fit_to_frame(el, original, frame));
            }
            SelectionMode::Drag { snapshotted } => {
                if !*snapshotted {
                    ctx.scene.add_to_history();
                    *snapshotted = true;
                }
                let selection = ctx.scene.selection().to_vec();
                for id in selection {
                    ctx.scene.modify_element(id, |el| el.translate(delta));
                }
            }
            SelectionMode::Marquee { current, .. } => *current = point,
        }
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>) {
        match std::mem::take(&mut self.mode) {
            SelectionMode::Marquee { origin, current } => {
                let marquee = Rect::from_points(origin, current);
                let picked: Vec<ElementId> = ctx
                    .scene
                    .elements()
                    .iter()
                    .filter(|el| geometry::rects_overlap(marquee, el.bounds()))
                    .map(|el| el.id)
                    .collect();
                log::debug!("marquee {:?} picked {} elements", marquee, picked.len());
                ctx.scene.set_selection(picked);
            }
            SelectionMode::Resize {
                original: Some(original),
                ..
            } => {
                ctx.scene.modify_element(original.id, Element::normalize);
            }
            _ => {}
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self.mode, SelectionMode::Idle)
    }

    fn reset(&mut self) {
        self.mode = SelectionMode::Idle;
    }

    fn cursor(&self, scene: &Scene, point: Point) -> CursorIcon {
        let zoom = scene.app_state().zoom();
        let selected: Vec<&Element> = scene.selected_elements().collect();

        if let [single] = selected.as_slice() {
            if single.kind.is_linear() {
                match line_control_point(point, single, zoom) {
                    Some(ControlPoint::Middle) => return CursorIcon::Move,
                    Some(_) => return CursorIcon::Crosshair,
                    None => {}
                }
            }
        }
        if !selected.iter().all(|el| el.kind.is_linear()) {
            let handle = selection_bounds(selected.iter().copied())
                .and_then(|bounds| resize_handle_at(point, bounds, zoom));
            if let Some(handle) = handle {
                return handle.cursor();
            }
        }
        if geometry::element_at_position(point, scene.elements()).is_some() {
            return CursorIcon::Move;
        }
        CursorIcon::Default
    }
}
