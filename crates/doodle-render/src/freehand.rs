//! Variable-width outlines for freehand strokes.
//!
//! Input points carry no pressure. Pressure is simulated from pointer speed:
//! fast segments get thinner, slow ones thicker. The result is a closed
//! polygon meant to be filled, not stroked.

use kurbo::{BezPath, Point, Vec2};
use std::f64::consts::PI;

/// How fast simulated pressure follows the speed of the stroke.
const PRESSURE_RATE: f64 = 0.275;

/// Segments per round cap.
const CAP_STEPS: usize = 8;

/// Outline parameters. All factors are in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreehandOptions {
    /// Base diameter of the stroke.
    pub size: f64,
    /// How much simulated pressure changes the width.
    pub thinning: f64,
    /// Minimum spacing between outline samples, relative to `size`.
    pub smoothing: f64,
    /// How strongly the input is pulled toward the previous point.
    pub streamline: f64,
}

impl FreehandOptions {
    /// Options for a pencil stroke of the given stroke width.
    pub fn for_stroke_width(stroke_width: f64) -> Self {
        Self {
            size: stroke_width * 2.0,
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
        }
    }

    fn radius(&self, pressure: f64) -> f64 {
        self.size * (0.5 - self.thinning * (0.5 - pressure)) / 2.0
    }
}

/// Sample along the streamlined input with its simulated pressure.
struct StrokePoint {
    point: Point,
    pressure: f64,
}

fn stroke_points(input: &[Point], options: &FreehandOptions) -> Vec<StrokePoint> {
    let t = 0.15 + (1.0 - options.streamline) * 0.85;
    let mut out: Vec<StrokePoint> = Vec::with_capacity(input.len());
    let mut pressure = 0.5;

    for &raw in input {
        let Some(prev) = out.last() else {
            out.push(StrokePoint {
                point: raw,
                pressure,
            });
            continue;
        };
        let point = prev.point.lerp(raw, t);
        let distance = (point - prev.point).hypot();
        if distance < 1e-6 {
            continue;
        }
        let speed = (distance / options.size.max(1e-6)).min(1.0);
        let target = 1.0 - speed;
        pressure = (pressure + (target - pressure) * speed * PRESSURE_RATE).clamp(0.0, 1.0);
        out.push(StrokePoint { point, pressure });
    }

    // The streamlined tail lags the pointer; finish on the real last point.
    if out.len() > 1 {
        if let (Some(last), Some(&real)) = (out.last_mut(), input.last()) {
            last.point = real;
        }
    }
    out
}

fn unit_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.hypot();
    if len > 1e-9 { v / len } else { fallback }
}

fn arc(center: Point, radius: f64, start_angle: f64, sweep: f64, out: &mut Vec<Point>) {
    for step in 1..CAP_STEPS {
        let angle = start_angle + sweep * step as f64 / CAP_STEPS as f64;
        out.push(center + Vec2::from_angle(angle) * radius);
    }
}

/// Closed outline polygon around `input`. Empty for empty input.
pub fn outline(input: &[Point], options: &FreehandOptions) -> Vec<Point> {
    let samples = stroke_points(input, options);
    let Some(first) = samples.first() else {
        return Vec::new();
    };

    if samples.len() == 1 {
        let radius = options.radius(first.pressure).max(0.5);
        let mut dot = Vec::with_capacity(CAP_STEPS * 2);
        for step in 0..CAP_STEPS * 2 {
            let angle = 2.0 * PI * step as f64 / (CAP_STEPS * 2) as f64;
            dot.push(first.point + Vec2::from_angle(angle) * radius);
        }
        return dot;
    }

    let min_spacing = (options.size * options.smoothing).powi(2);
    let mut left: Vec<Point> = Vec::with_capacity(samples.len());
    let mut right: Vec<Point> = Vec::with_capacity(samples.len());
    let mut direction = Vec2::new(1.0, 0.0);

    let last_index = samples.len() - 1;
    for (i, sample) in samples.iter().enumerate() {
        let toward = if i < last_index {
            samples[i + 1].point - sample.point
        } else {
            sample.point - samples[i - 1].point
        };
        direction = unit_or(toward, direction);
        let normal = Vec2::new(-direction.y, direction.x) * options.radius(sample.pressure);
        let l = sample.point + normal;
        let r = sample.point - normal;

        let keep = i == 0
            || i == last_index
            || left
                .last()
                .is_none_or(|prev| (l - *prev).hypot2() > min_spacing);
        if keep {
            left.push(l);
            right.push(r);
        }
    }

    let start = &samples[0];
    let end = &samples[last_index];
    let start_dir = unit_or(samples[1].point - start.point, Vec2::new(1.0, 0.0));
    let end_dir = direction;

    let mut polygon = Vec::with_capacity(left.len() + right.len() + CAP_STEPS * 2);
    polygon.extend(left.iter().copied());
    // End cap sweeps from the left side around the tip to the right side.
    arc(
        end.point,
        options.radius(end.pressure),
        end_dir.angle() + PI / 2.0,
        -PI,
        &mut polygon,
    );
    polygon.extend(right.iter().rev().copied());
    arc(
        start.point,
        options.radius(start.pressure),
        start_dir.angle() - PI / 2.0,
        -PI,
        &mut polygon,
    );
    polygon
}

/// Smooth closed path through an outline polygon, using each vertex as the
/// control point of a quadratic ending at the midpoint to the next vertex.
pub fn outline_path(polygon: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(&first) = polygon.first() else {
        return path;
    };
    path.move_to(first);
    for (i, &p) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        path.quad_to(p, p.midpoint(next));
    }
    path.close_path();
    path
}
