//! Element geometry in anchor-local coordinates.
//!
//! Paths are built relative to the element anchor so a moved element can
//! reuse them under a translated surface.

use crate::freehand::{self, FreehandOptions};
use crate::rough::{RoughGenerator, RoughOptions};
use doodle_core::{Element, ElementKind};
use kurbo::{BezPath, Ellipse, Point, Rect, Shape, Vec2};
use std::f64::consts::PI;

/// Half-angle between the arrow shaft and each barb.
const ARROWHEAD_ANGLE: f64 = PI / 6.0;

/// Arrowhead length never drops below this.
const MIN_ARROWHEAD_LENGTH: f64 = 10.0;

/// Generated paths for one element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeGeometry {
    /// Region painted with the background color.
    pub fill: Option<BezPath>,
    /// Outline passes painted with the stroke color.
    pub strokes: Vec<BezPath>,
    /// Regions filled with the stroke color: arrowheads and freehand outlines.
    pub solids: Vec<BezPath>,
}

impl ShapeGeometry {
    pub fn is_empty(&self) -> bool {
        self.fill.is_none() && self.strokes.is_empty() && self.solids.is_empty()
    }
}

/// Closed polyline through `points`, returning to the first point with a
/// real segment so the closing edge jitters like the others.
fn polygon(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((&first, rest)) = points.split_first() {
        path.move_to(first);
        for &p in rest {
            path.line_to(p);
        }
        path.line_to(first);
    }
    path
}

fn diamond(rect: Rect) -> [Point; 4] {
    let center = rect.center();
    [
        Point::new(center.x, rect.y0),
        Point::new(rect.x1, center.y),
        Point::new(center.x, rect.y1),
        Point::new(rect.x0, center.y),
    ]
}

/// Filled triangle with its tip at `end`, pointing away from `start`.
pub fn arrowhead(start: Point, end: Point, stroke_width: f64) -> Option<BezPath> {
    let shaft = end - start;
    if shaft.hypot() < 1e-6 {
        return None;
    }
    let length = MIN_ARROWHEAD_LENGTH.max(stroke_width * 5.0);
    let back = shaft.atan2() + PI;
    let left = end + Vec2::from_angle(back - ARROWHEAD_ANGLE) * length;
    let right = end + Vec2::from_angle(back + ARROWHEAD_ANGLE) * length;

    let mut path = BezPath::new();
    path.move_to(end);
    path.line_to(left);
    path.line_to(right);
    path.close_path();
    Some(path)
}

fn outline_geometry(
    outline: BezPath,
    element: &Element,
    generator: &dyn RoughGenerator,
) -> ShapeGeometry {
    let options = RoughOptions {
        roughness: element.style.roughness,
        seed: element.style.seed,
    };
    ShapeGeometry {
        fill: element
            .style
            .background_color
            .map(|_| generator.fill(&outline, &options)),
        strokes: generator.strokes(&outline, &options),
        solids: Vec::new(),
    }
}

/// Build the paths for `element`. Text has no path geometry.
pub fn build_geometry(element: &Element, generator: &dyn RoughGenerator) -> ShapeGeometry {
    let local_rect = Rect::new(0.0, 0.0, element.width, element.height).abs();
    match element.kind {
        ElementKind::Rectangle => {
            let corners = [
                Point::new(local_rect.x0, local_rect.y0),
                Point::new(local_rect.x1, local_rect.y0),
                Point::new(local_rect.x1, local_rect.y1),
                Point::new(local_rect.x0, local_rect.y1),
            ];
            outline_geometry(polygon(&corners), element, generator)
        }
        ElementKind::Diamond => {
            outline_geometry(polygon(&diamond(local_rect)), element, generator)
        }
        ElementKind::Circle => {
            let path = Ellipse::from_rect(local_rect).to_path(0.1);
            outline_geometry(path, element, generator)
        }
        ElementKind::Line | ElementKind::Arrow => {
            let (Some(first), Some(last)) = (element.first_point(), element.last_point()) else {
                return ShapeGeometry::default();
            };
            let start = Point::ZERO + element.offset_from_anchor(first);
            let end = Point::ZERO + element.offset_from_anchor(last);

            let mut segment = BezPath::new();
            segment.move_to(start);
            segment.line_to(end);
            let options = RoughOptions {
                roughness: element.style.roughness,
                seed: element.style.seed,
            };
            let solids = if element.kind == ElementKind::Arrow {
                arrowhead(start, end, element.style.stroke_width)
                    .into_iter()
                    .collect()
            } else {
                Vec::new()
            };
            ShapeGeometry {
                fill: None,
                strokes: generator.strokes(&segment, &options),
                solids,
            }
        }
        ElementKind::Pencil => {
            let local: Vec<Point> = element
                .points
                .iter()
                .map(|p| Point::ZERO + element.offset_from_anchor(*p))
                .collect();
            let options = FreehandOptions::for_stroke_width(element.style.stroke_width);
            let polygon = freehand::outline(&local, &options);
            if polygon.is_empty() {
                return ShapeGeometry::default();
            }
            ShapeGeometry {
                fill: None,
                strokes: Vec::new(),
                solids: vec![freehand::outline_path(&polygon)],
            }
        }
        ElementKind::Text => ShapeGeometry::default(),
    }
}
