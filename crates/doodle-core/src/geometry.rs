//! Hit-testing, bounds, and handle detection.
//!
//! Everything here is a pure function of its inputs. Distances are in world
//! units unless a `zoom` parameter is taken, in which case the tolerance is a
//! constant screen-space size divided by the zoom.

use crate::element::{Element, ElementKind};
use kurbo::{Point, Rect, Vec2};

/// Distance under which a point counts as touching a stroke.
pub const HIT_THRESHOLD: f64 = 10.0;
/// Padding added around box shapes for interior hits.
pub const HIT_PADDING: f64 = 10.0;
/// Default distance for border proximity tests.
pub const BORDER_THRESHOLD: f64 = 20.0;
/// Gap between the selection bounds and the resize handles, in screen pixels.
pub const SELECTION_MARGIN: f64 = 8.0;
/// Side of a resize handle's hit square, in screen pixels.
pub const HANDLE_HIT_SIZE: f64 = 20.0;
/// Diameter of a line control point, in screen pixels.
pub const CONTROL_POINT_SIZE: f64 = 10.0;

/// Distance from a point to the segment a→b.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Whether `point` hits the element.
pub fn point_in_element(point: Point, element: &Element) -> bool {
    match element.kind {
        ElementKind::Line | ElementKind::Arrow => {
            let (Some(start), Some(end)) = (element.first_point(), element.last_point()) else {
                return false;
            };
            if element.points.len() < 2 {
                return false;
            }
            point_to_segment_dist(point, start, end) < HIT_THRESHOLD
        }
        ElementKind::Pencil => match element.points.as_slice() {
            [] => false,
            [only] => (point - *only).hypot() < HIT_THRESHOLD,
            points => point_to_polyline_dist(point, points) < HIT_THRESHOLD,
        },
        ElementKind::Rectangle | ElementKind::Text => {
            let rect = element.bounds().inflate(HIT_PADDING, HIT_PADDING);
            rect.x0 <= point.x && point.x <= rect.x1 && rect.y0 <= point.y && point.y <= rect.y1
        }
        ElementKind::Circle => {
            let rect = element.bounds();
            let padded = rect.inflate(HIT_PADDING, HIT_PADDING);
            if !(padded.x0 <= point.x
                && point.x <= padded.x1
                && padded.y0 <= point.y
                && point.y <= padded.y1)
            {
                return false;
            }
            let center = rect.center();
            let a = rect.width() / 2.0 + HIT_PADDING;
            let b = rect.height() / 2.0 + HIT_PADDING;
            let d = point - center;
            (d.x * d.x) / (a * a) + (d.y * d.y) / (b * b) <= 1.0
        }
        ElementKind::Diamond => {
            let rect = element.bounds();
            let center = rect.center();
            let a = rect.width() / 2.0 + HIT_PADDING;
            let b = rect.height() / 2.0 + HIT_PADDING;
            let d = point - center;
            d.x.abs() / a + d.y.abs() / b <= 1.0
        }
    }
}

/// Whether `point` lies within `threshold` of the element's outline.
pub fn point_on_border(point: Point, element: &Element, threshold: f64) -> bool {
    match element.kind {
        ElementKind::Rectangle | ElementKind::Diamond => {
            let r = element.bounds();
            let within_y = point.y >= r.y0 - threshold && point.y <= r.y1 + threshold;
            let within_x = point.x >= r.x0 - threshold && point.x <= r.x1 + threshold;
            let on_left = (point.x - r.x0).abs() < threshold && within_y;
            let on_right = (point.x - r.x1).abs() < threshold && within_y;
            let on_top = (point.y - r.y0).abs() < threshold && within_x;
            let on_bottom = (point.y - r.y1).abs() < threshold && within_x;
            on_left || on_right || on_top || on_bottom
        }
        ElementKind::Circle => {
            let r = element.bounds();
            let rx = r.width() / 2.0;
            let ry = r.height() / 2.0;
            if rx <= f64::EPSILON || ry <= f64::EPSILON {
                return false;
            }
            let d = point - r.center();
            let normalized = ((d.x / rx).powi(2) + (d.y / ry).powi(2)).sqrt();
            (normalized - 1.0).abs() < threshold / rx.min(ry)
        }
        ElementKind::Line | ElementKind::Arrow => point_in_element(point, element),
        ElementKind::Pencil | ElementKind::Text => false,
    }
}

/// Topmost element under `point`, scanning back to front.
pub fn element_at_position(point: Point, elements: &[Element]) -> Option<&Element> {
    elements.iter().rev().find(|el| point_in_element(point, el))
}

/// Union of the normalized bounds of `elements`, or `None` when empty.
pub fn selection_bounds<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Rect> {
    elements
        .into_iter()
        .map(Element::bounds)
        .reduce(|acc, r| acc.union(r))
}

/// Half-open AABB overlap.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// One of the eight resize handles around a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl ResizeHandle {
    /// Hit-test order.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::North,
        ResizeHandle::NorthEast,
        ResizeHandle::East,
        ResizeHandle::SouthEast,
        ResizeHandle::South,
        ResizeHandle::SouthWest,
        ResizeHandle::West,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ResizeHandle::NorthWest => "nw",
            ResizeHandle::North => "n",
            ResizeHandle::NorthEast => "ne",
            ResizeHandle::East => "e",
            ResizeHandle::SouthEast => "se",
            ResizeHandle::South => "s",
            ResizeHandle::SouthWest => "sw",
            ResizeHandle::West => "w",
        }
    }

    fn moves_north(self) -> bool {
        matches!(
            self,
            ResizeHandle::North | ResizeHandle::NorthEast | ResizeHandle::NorthWest
        )
    }

    fn moves_south(self) -> bool {
        matches!(
            self,
            ResizeHandle::South | ResizeHandle::SouthEast | ResizeHandle::SouthWest
        )
    }

    fn moves_east(self) -> bool {
        matches!(
            self,
            ResizeHandle::East | ResizeHandle::NorthEast | ResizeHandle::SouthEast
        )
    }

    fn moves_west(self) -> bool {
        matches!(
            self,
            ResizeHandle::West | ResizeHandle::NorthWest | ResizeHandle::SouthWest
        )
    }

    /// Handle center on `rect`.
    pub fn position(self, rect: Rect) -> Point {
        let cx = (rect.x0 + rect.x1) / 2.0;
        let cy = (rect.y0 + rect.y1) / 2.0;
        match self {
            ResizeHandle::NorthWest => Point::new(rect.x0, rect.y0),
            ResizeHandle::North => Point::new(cx, rect.y0),
            ResizeHandle::NorthEast => Point::new(rect.x1, rect.y0),
            ResizeHandle::East => Point::new(rect.x1, cy),
            ResizeHandle::SouthEast => Point::new(rect.x1, rect.y1),
            ResizeHandle::South => Point::new(cx, rect.y1),
            ResizeHandle::SouthWest => Point::new(rect.x0, rect.y1),
            ResizeHandle::West => Point::new(rect.x0, cy),
        }
    }

    /// Apply a cursor delta to a signed `(x, y, width, height)` box.
    ///
    /// East/south edges grow the extent; west/north edges move the origin and
    /// shrink the extent by the same amount.
    pub fn apply(self, (x, y, w, h): (f64, f64, f64, f64), delta: Vec2) -> (f64, f64, f64, f64) {
        let (mut x, mut y, mut w, mut h) = (x, y, w, h);
        if self.moves_east() {
            w += delta.x;
        }
        if self.moves_west() {
            x += delta.x;
            w -= delta.x;
        }
        if self.moves_south() {
            h += delta.y;
        }
        if self.moves_north() {
            y += delta.y;
            h -= delta.y;
        }
        (x, y, w, h)
    }

    pub fn cursor(self) -> CursorIcon {
        cursor_for_handle(self)
    }
}

/// Selection bounds expanded by the zoom-scaled handle margin.
pub fn handle_frame(bounds: Rect, zoom: f64) -> Rect {
    let margin = SELECTION_MARGIN / zoom;
    bounds.inflate(margin, margin)
}

/// Resize handle under `point` for a selection with `bounds`, if any.
pub fn resize_handle_at(point: Point, bounds: Rect, zoom: f64) -> Option<ResizeHandle> {
    let frame = handle_frame(bounds, zoom);
    let half = HANDLE_HIT_SIZE / zoom / 2.0;
    ResizeHandle::ALL.into_iter().find(|handle| {
        let center = handle.position(frame);
        (point.x - center.x).abs() <= half && (point.y - center.y).abs() <= half
    })
}

/// Pointer cursor to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    Move,
    Crosshair,
    Text,
    Grab,
    Grabbing,
    NsResize,
    EwResize,
    NwseResize,
    NeswResize,
}

impl CursorIcon {
    /// CSS cursor name.
    pub fn name(self) -> &'static str {
        match self {
            CursorIcon::Default => "default",
            CursorIcon::Move => "move",
            CursorIcon::Crosshair => "crosshair",
            CursorIcon::Text => "text",
            CursorIcon::Grab => "grab",
            CursorIcon::Grabbing => "grabbing",
            CursorIcon::NsResize => "ns-resize",
            CursorIcon::EwResize => "ew-resize",
            CursorIcon::NwseResize => "nwse-resize",
            CursorIcon::NeswResize => "nesw-resize",
        }
    }
}

pub fn cursor_for_handle(handle: ResizeHandle) -> CursorIcon {
    match handle {
        ResizeHandle::North | ResizeHandle::South => CursorIcon::NsResize,
        ResizeHandle::East | ResizeHandle::West => CursorIcon::EwResize,
        ResizeHandle::NorthWest | ResizeHandle::SouthEast => CursorIcon::NwseResize,
        ResizeHandle::NorthEast | ResizeHandle::SouthWest => CursorIcon::NeswResize,
    }
}

/// Control points on a line or arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlPoint {
    Start,
    Middle,
    End,
}

/// The three control point positions of a segment element.
pub fn control_points(element: &Element) -> Option<[(ControlPoint, Point); 3]> {
    if element.points.len() < 2 {
        return None;
    }
    let start = element.first_point()?;
    let end = element.last_point()?;
    Some([
        (ControlPoint::Start, start),
        (ControlPoint::Middle, start.midpoint(end)),
        (ControlPoint::End, end),
    ])
}

/// Control point of a line/arrow under `point`.
///
/// Endpoints win over the middle; between two endpoints in reach, the nearer one.
pub fn line_control_point(point: Point, element: &Element, zoom: f64) -> Option<ControlPoint> {
    let radius = CONTROL_POINT_SIZE / zoom / 2.0;
    let in_reach: Vec<(ControlPoint, f64)> = control_points(element)?
        .into_iter()
        .map(|(kind, center)| (kind, (point - center).hypot()))
        .filter(|(_, dist)| *dist < radius)
        .collect();
    in_reach
        .iter()
        .filter(|(kind, _)| *kind != ControlPoint::Middle)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .or_else(|| in_reach.first())
        .map(|(kind, _)| *kind)
}
