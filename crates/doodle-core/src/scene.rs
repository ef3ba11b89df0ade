//! The scene store: elements, app state, and history.
//!
//! Every mutation goes through a method on [`Scene`]. Updates addressed to an
//! id that is not present are ignored, so stale references (for example a
//! selection that survived an undo) never fail.

use crate::element::{Element, ElementId, ElementPatch, ElementStyle, GroupId, StylePatch};
use crate::history::History;
use crate::tools::ToolKind;
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};
use uuid::Uuid;

/// Viewport and interaction state.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub tool: ToolKind,
    /// Selected ids, without duplicates. The first entry is the primary.
    pub selection: Vec<ElementId>,
    pub viewport: Viewport,
    /// A pointer gesture is in progress.
    pub is_dragging: bool,
    pub dark_mode: bool,
    /// Style given to newly created elements (reseeded per element).
    pub current_style: ElementStyle,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            tool: ToolKind::Selection,
            selection: Vec::new(),
            viewport: Viewport::default(),
            is_dragging: false,
            dark_mode: false,
            current_style: ElementStyle::default(),
        }
    }
}

impl AppState {
    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: Vec<Element>,
    app_state: AppState,
    history: History,
    /// Bumped whenever persisted state (elements or dark mode) changes.
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parts(app_state: AppState, history: History) -> Self {
        Self {
            elements: Vec::new(),
            app_state,
            history,
            revision: 0,
        }
    }

    // --- queries ---

    /// Elements in paint order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn app_state(&self) -> &AppState {
        &self.app_state
    }

    pub fn tool(&self) -> ToolKind {
        self.app_state.tool
    }

    pub fn selection(&self) -> &[ElementId] {
        &self.app_state.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.app_state.viewport
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Selected elements that still exist, in paint order.
    pub fn selected_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(|el| self.app_state.selection.contains(&el.id))
    }

    /// Ids of every element sharing `group_id`.
    pub fn group_members(&self, group_id: GroupId) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|el| el.group_id == Some(group_id))
            .map(|el| el.id)
            .collect()
    }

    // --- app state ---

    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.app_state.tool != tool {
            log::debug!("tool: {:?} -> {:?}", self.app_state.tool, tool);
        }
        self.app_state.tool = tool;
    }

    /// Replace the selection, dropping duplicate ids.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        let mut selection: Vec<ElementId> = Vec::new();
        for id in ids {
            if !selection.contains(&id) {
                selection.push(id);
            }
        }
        self.app_state.selection = selection;
    }

    pub fn clear_selection(&mut self) {
        self.app_state.selection.clear();
    }

    /// Set the zoom, clamped to the viewport's limits.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.app_state.viewport.set_zoom(zoom);
    }

    pub fn set_scroll(&mut self, x: f64, y: f64) {
        self.app_state.viewport.set_scroll(Vec2::new(x, y));
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.app_state.viewport.pan(delta);
    }

    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        self.app_state.viewport.zoom_at(screen_point, factor);
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.app_state.is_dragging = dragging;
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        if self.app_state.dark_mode != dark_mode {
            self.app_state.dark_mode = dark_mode;
            self.touch();
        }
    }

    pub fn set_current_style(&mut self, style: ElementStyle) {
        self.app_state.current_style = style;
    }

    // --- elements ---

    /// Append an element on top. Does not record history.
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
        self.touch();
    }

    /// Merge `patch` into the element with `id`. Returns false if no such element.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        self.modify_element(id, |el| patch.apply(el))
    }

    /// Mutate the element with `id` in place and bump its version.
    pub fn modify_element(&mut self, id: ElementId, f: impl FnOnce(&mut Element)) -> bool {
        let Some(element) = self.elements.iter_mut().find(|el| el.id == id) else {
            return false;
        };
        f(element);
        element.bump_version();
        self.touch();
        true
    }

    /// Remove the element with `id`; it also leaves the selection.
    ///
    /// Text bound to it keeps its `container_element_id` and renders as free text.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|el| el.id == id)?;
        self.app_state.selection.retain(|&sel| sel != id);
        self.touch();
        Some(self.elements.remove(index))
    }

    pub fn clear_elements(&mut self) {
        self.elements.clear();
        self.app_state.selection.clear();
        self.touch();
    }

    /// Replace all elements. Does not record history.
    pub fn set_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        self.prune_selection();
        self.touch();
    }

    // --- history ---

    /// Snapshot the current elements before a gesture's first mutation.
    pub fn add_to_history(&mut self) {
        self.history.record(&self.elements);
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.elements) {
            return false;
        }
        log::debug!("undo ({} left)", self.history.undo_depth());
        self.prune_selection();
        self.touch();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.elements) {
            return false;
        }
        log::debug!("redo ({} left)", self.history.redo_depth());
        self.prune_selection();
        self.touch();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- selection-wide commands ---

    pub fn select_all(&mut self) {
        self.app_state.selection = self.elements.iter().map(|el| el.id).collect();
    }

    /// Delete every selected element as one undoable step.
    pub fn delete_selected(&mut self) -> usize {
        if self.selected_elements().next().is_none() {
            return 0;
        }
        self.add_to_history();
        let selection = std::mem::take(&mut self.app_state.selection);
        let before = self.elements.len();
        self.elements.retain(|el| !selection.contains(&el.id));
        self.touch();
        before - self.elements.len()
    }

    /// Give every selected element one fresh group id.
    ///
    /// Needs at least two selected elements.
    pub fn group_selection(&mut self) -> Option<GroupId> {
        if self.selected_elements().count() < 2 {
            return None;
        }
        self.add_to_history();
        let group_id = Uuid::new_v4();
        let selection = self.app_state.selection.clone();
        for id in selection {
            self.modify_element(id, |el| el.group_id = Some(group_id));
        }
        log::debug!("grouped selection as {group_id}");
        Some(group_id)
    }

    /// Clear the group id of every selected element.
    pub fn ungroup_selection(&mut self) -> bool {
        if !self.selected_elements().any(|el| el.group_id.is_some()) {
            return false;
        }
        self.add_to_history();
        let selection = self.app_state.selection.clone();
        for id in selection {
            self.modify_element(id, |el| el.group_id = None);
        }
        true
    }

    /// Apply a style edit to every selected element as one undoable step.
    pub fn set_selected_style(&mut self, patch: &StylePatch) -> bool {
        if patch.is_empty() || self.selected_elements().next().is_none() {
            return false;
        }
        self.add_to_history();
        let selection = self.app_state.selection.clone();
        for id in selection {
            self.modify_element(id, |el| patch.apply(&mut el.style));
        }
        patch.apply(&mut self.app_state.current_style);
        true
    }

    fn prune_selection(&mut self) {
        let elements = &self.elements;
        self.app_state
            .selection
            .retain(|id| elements.iter().any(|el| el.id == *id));
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use kurbo::Rect;

    fn rect_element(x: f64) -> Element {
        Element::from_rect(
            ElementKind::Rectangle,
            Rect::new(x, 0.0, x + 10.0, 10.0),
            ElementStyle::default(),
        )
    }

    #[test]
    fn test_update_bumps_version() {
        let mut scene = Scene::new();
        let el = rect_element(0.0);
        let id = el.id;
        scene.add_element(el);

        assert!(scene.update_element(id, &ElementPatch::new().size(50.0, 60.0)));
        let updated = scene.element(id).unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!((updated.width, updated.height), (50.0, 60.0));
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut scene = Scene::new();
        scene.add_element(rect_element(0.0));
        let before = scene.elements().to_vec();

        assert!(!scene.update_element(Uuid::new_v4(), &ElementPatch::new().size(1.0, 1.0)));
        assert!(scene.remove_element(Uuid::new_v4()).is_none());
        assert_eq!(scene.elements(), before.as_slice());
    }

    #[test]
    fn test_undo_redo_inverse() {
        let mut scene = Scene::new();
        for i in 0..3 {
            scene.add_to_history();
            scene.add_element(rect_element(i as f64 * 20.0));
        }
        let first = scene.elements()[0].id;
        scene.add_to_history();
        scene.update_element(first, &ElementPatch::new().position(Point::new(5.0, 5.0)));
        let final_state = scene.elements().to_vec();

        for _ in 0..4 {
            assert!(scene.undo());
        }
        assert!(scene.is_empty());
        assert!(!scene.undo());

        for _ in 0..4 {
            assert!(scene.redo());
        }
        assert_eq!(scene.elements(), final_state.as_slice());
        assert!(!scene.redo());
    }

    #[test]
    fn test_new_action_after_undo_clears_future() {
        let mut scene = Scene::new();
        scene.add_to_history();
        scene.add_element(rect_element(0.0));
        scene.undo();
        assert!(scene.can_redo());

        scene.add_to_history();
        assert!(!scene.can_redo());
    }

    #[test]
    fn test_selection_dedup_and_prune() {
        let mut scene = Scene::new();
        let el = rect_element(0.0);
        let id = el.id;
        scene.add_to_history();
        scene.add_element(el);
        scene.set_selection([id, id]);
        assert_eq!(scene.selection(), &[id]);

        scene.undo();
        assert!(scene.selection().is_empty());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut scene = Scene::new();
        scene.set_zoom(50.0);
        assert_eq!(scene.viewport().zoom, 5.0);
        scene.set_zoom(0.0);
        assert_eq!(scene.viewport().zoom, 0.1);
    }

    #[test]
    fn test_group_selection() {
        let mut scene = Scene::new();
        let a = rect_element(0.0);
        let b = rect_element(20.0);
        let (a_id, b_id) = (a.id, b.id);
        scene.add_element(a);
        scene.add_element(b);

        scene.set_selection([a_id]);
        assert!(scene.group_selection().is_none());

        scene.set_selection([a_id, b_id]);
        let group = scene.group_selection().unwrap();
        assert_eq!(scene.group_members(group), vec![a_id, b_id]);
        assert!(scene.can_undo());

        assert!(scene.ungroup_selection());
        assert!(scene.element(a_id).unwrap().group_id.is_none());
    }

    #[test]
    fn test_delete_selected_is_undoable() {
        let mut scene = Scene::new();
        let a = rect_element(0.0);
        let a_id = a.id;
        scene.add_element(a);
        scene.add_element(rect_element(20.0));
        scene.set_selection([a_id]);

        assert_eq!(scene.delete_selected(), 1);
        assert_eq!(scene.len(), 1);
        assert!(scene.selection().is_empty());

        scene.undo();
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_set_selected_style() {
        let mut scene = Scene::new();
        let a = rect_element(0.0);
        let a_id = a.id;
        scene.add_element(a);

        let patch = StylePatch::default().stroke_width(8.0);
        assert!(!scene.set_selected_style(&patch));

        scene.set_selection([a_id]);
        assert!(scene.set_selected_style(&patch));
        assert_eq!(scene.element(a_id).unwrap().style.stroke_width, 8.0);
        assert_eq!(scene.history().undo_depth(), 1);
    }

    #[test]
    fn test_revision_tracks_persisted_changes() {
        let mut scene = Scene::new();
        let start = scene.revision();
        scene.set_tool(ToolKind::Pencil);
        scene.set_zoom(2.0);
        assert_eq!(scene.revision(), start);

        scene.set_dark_mode(true);
        assert_ne!(scene.revision(), start);
    }
}
