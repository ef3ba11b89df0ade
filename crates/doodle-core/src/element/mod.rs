//! The element model: every object drawn on the canvas.

mod style;

pub use style::{
    ElementStyle, ParseColorError, SerializableColor, StylePatch, TRANSPARENT, generate_seed,
};

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Identifier shared by the members of a group.
pub type GroupId = Uuid;

/// Font size used for text elements.
pub const DEFAULT_FONT_SIZE: f64 = 20.0;

/// Discriminant of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Circle,
    Diamond,
    Line,
    Arrow,
    Pencil,
    Text,
}

impl ElementKind {
    /// Line or arrow: a segment between the first and last point.
    pub fn is_linear(self) -> bool {
        matches!(self, ElementKind::Line | ElementKind::Arrow)
    }

    /// Geometry lives in `points` rather than `width`/`height`.
    pub fn is_point_based(self) -> bool {
        matches!(
            self,
            ElementKind::Line | ElementKind::Arrow | ElementKind::Pencil
        )
    }

    /// Shapes whose extent is normalized on commit.
    pub fn is_box_shape(self) -> bool {
        matches!(
            self,
            ElementKind::Rectangle | ElementKind::Circle | ElementKind::Diamond
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// A drawn object.
///
/// `(x, y)` is the anchor. Box shapes extend by a signed `width`/`height`;
/// point-based shapes keep their anchor on the first point. Text is laid out
/// around the anchor according to `text_align` and `text_baseline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(flatten)]
    pub style: ElementStyle,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub text_baseline: TextBaseline,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Shape this text is bound to. Lookup key only; the container may be gone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_element_id: Option<ElementId>,
    #[serde(default)]
    pub on_container_border: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Bumped on every mutation.
    #[serde(default)]
    pub version: u64,
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

impl Element {
    /// Create a zero-extent element at `at`.
    ///
    /// Point-based kinds start with a single point.
    pub fn new(kind: ElementKind, at: Point, style: ElementStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x: at.x,
            y: at.y,
            width: 0.0,
            height: 0.0,
            style,
            points: if kind.is_point_based() {
                vec![at]
            } else {
                Vec::new()
            },
            text: if kind == ElementKind::Text {
                Some(String::new())
            } else {
                None
            },
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            font_size: DEFAULT_FONT_SIZE,
            container_element_id: None,
            on_container_border: false,
            group_id: None,
            version: 1,
        }
    }

    /// Create a box shape covering `rect`.
    pub fn from_rect(kind: ElementKind, rect: Rect, style: ElementStyle) -> Self {
        let mut element = Self::new(kind, rect.origin(), style);
        element.width = rect.width();
        element.height = rect.height();
        element
    }

    /// Create a line or arrow from `start` to `end`.
    pub fn segment(kind: ElementKind, start: Point, end: Point, style: ElementStyle) -> Self {
        let mut element = Self::new(kind, start, style);
        element.points = vec![start, end];
        element
    }

    /// Create an empty text element anchored at `at`.
    pub fn text(at: Point, align: TextAlign, baseline: TextBaseline, style: ElementStyle) -> Self {
        let mut element = Self::new(ElementKind::Text, at, style);
        element.text_align = align;
        element.text_baseline = baseline;
        element
    }

    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn first_point(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Normalized rectangle from the signed `x/y/width/height` fields.
    pub fn box_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    /// Normalized world-space bounds.
    pub fn bounds(&self) -> Rect {
        match self.kind {
            ElementKind::Line | ElementKind::Arrow | ElementKind::Pencil => {
                points_bounds(&self.points)
                    .unwrap_or_else(|| Rect::from_origin_size(self.anchor(), Size::ZERO))
            }
            ElementKind::Text => self.text_bounds(),
            _ => self.box_rect(),
        }
    }

    fn text_bounds(&self) -> Rect {
        let width = self.width.abs();
        let height = self.height.abs();
        let left = match self.text_align {
            TextAlign::Left => self.x,
            TextAlign::Center => self.x - width / 2.0,
            TextAlign::Right => self.x - width,
        };
        let top = match self.text_baseline {
            TextBaseline::Top => self.y,
            TextBaseline::Middle => self.y - height / 2.0,
            TextBaseline::Bottom => self.y - height,
        };
        Rect::new(left, top, left + width, top + height)
    }

    /// Move the anchor and every point by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
        for point in &mut self.points {
            *point += delta;
        }
    }

    /// Rewrite box extents to a top-left origin with non-negative size.
    pub fn normalize(&mut self) {
        if !self.kind.is_box_shape() {
            return;
        }
        let rect = self.box_rect();
        self.x = rect.x0;
        self.y = rect.y0;
        self.width = rect.width();
        self.height = rect.height();
    }

    /// Keep the anchor on the first point for point-based kinds.
    pub(crate) fn sync_anchor(&mut self) {
        if let Some(first) = self.first_point() {
            self.x = first.x;
            self.y = first.y;
        }
    }

    /// Offset of `point` from the anchor.
    pub fn offset_from_anchor(&self, point: Point) -> Vec2 {
        point - self.anchor()
    }

    pub fn text_content(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub(crate) fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Structurally valid for its kind.
    pub fn is_well_formed(&self) -> bool {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.points.iter().all(|p| p.x.is_finite() && p.y.is_finite());
        let points_ok = match self.kind {
            ElementKind::Line | ElementKind::Arrow => self.points.len() >= 2,
            ElementKind::Pencil => !self.points.is_empty(),
            _ => true,
        };
        finite && points_ok
    }
}

/// Bounding box of a point list.
pub fn points_bounds(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p)),
    )
}

/// Partial element update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub points: Option<Vec<Point>>,
    pub text: Option<String>,
    pub group_id: Option<Option<GroupId>>,
    pub style: StylePatch,
}

impl ElementPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, at: Point) -> Self {
        self.x = Some(at.x);
        self.y = Some(at.y);
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn points(mut self, points: Vec<Point>) -> Self {
        self.points = Some(points);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn group(mut self, group_id: Option<GroupId>) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn style(mut self, style: StylePatch) -> Self {
        self.style = style;
        self
    }

    /// Merge into `element`. Does not touch `version`.
    pub fn apply(&self, element: &mut Element) {
        if let Some(x) = self.x {
            element.x = x;
        }
        if let Some(y) = self.y {
            element.y = y;
        }
        if let Some(width) = self.width {
            element.width = width;
        }
        if let Some(height) = self.height {
            element.height = height;
        }
        if let Some(points) = &self.points {
            element.points = points.clone();
        }
        if let Some(text) = &self.text {
            element.text = Some(text.clone());
        }
        if let Some(group_id) = self.group_id {
            element.group_id = group_id;
        }
        self.style.apply(&mut element.style);
    }
}
