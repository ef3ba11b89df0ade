//! Hand-drawn path generation.
//!
//! Each line segment becomes a slightly bowed quadratic whose endpoints
//! overshoot, and every outline is stroked twice with different random
//! streams, which gives the sketchy double-line look. Randomness is derived
//! from the element's seed only, so the same element jitters identically on
//! every frame.

use kurbo::{BezPath, PathEl, Point, Vec2};

/// Seed offset between two stroke passes; a large prime gives unrelated streams.
const PASS_SEED_STRIDE: u32 = 99991;

/// Fill regions jitter less than their outlines.
const FILL_ROUGHNESS_FACTOR: f64 = 0.3;

/// Parameters for one generated outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoughOptions {
    pub roughness: f64,
    pub seed: u32,
}

/// Turns clean geometry into hand-drawn geometry.
pub trait RoughGenerator {
    /// Stroke passes for `path`, drawn on top of each other.
    fn strokes(&self, path: &BezPath, options: &RoughOptions) -> Vec<BezPath>;

    /// Region to paint with the background color.
    fn fill(&self, path: &BezPath, options: &RoughOptions) -> BezPath;
}

/// Default generator: bowed, overshooting segments in a fixed number of passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandDrawn {
    pub passes: u32,
}

impl Default for HandDrawn {
    fn default() -> Self {
        Self { passes: 2 }
    }
}

impl RoughGenerator for HandDrawn {
    fn strokes(&self, path: &BezPath, options: &RoughOptions) -> Vec<BezPath> {
        if options.roughness <= 0.0 {
            return vec![path.clone()];
        }
        (0..self.passes.max(1))
            .map(|pass| jitter_path(path, options.roughness, options.seed, pass))
            .collect()
    }

    fn fill(&self, path: &BezPath, options: &RoughOptions) -> BezPath {
        if options.roughness <= 0.0 {
            return path.clone();
        }
        jitter_path(path, options.roughness * FILL_ROUGHNESS_FACTOR, options.seed, 0)
    }
}

/// xorshift32.
struct SeededRng {
    state: u32,
}

impl SeededRng {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform in [-1, 1].
    fn next_signed(&mut self) -> f64 {
        (self.next_u32() as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    fn offset(&mut self, amount: f64) -> f64 {
        self.next_signed() * amount
    }

    fn wobble(&mut self, p: Point, amount: f64) -> Point {
        Point::new(p.x + self.offset(amount), p.y + self.offset(amount))
    }
}

/// One jittered copy of `path`.
pub fn jitter_path(path: &BezPath, roughness: f64, seed: u32, pass: u32) -> BezPath {
    let max_offset = roughness * 2.0;
    let mut rng = SeededRng::new(seed.wrapping_add(pass.wrapping_mul(PASS_SEED_STRIDE)));

    let mut result = BezPath::new();
    let mut last = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                result.move_to(rng.wobble(p, max_offset));
                last = p;
            }
            PathEl::LineTo(p) => {
                let delta = p - last;
                let len = delta.hypot();
                let bow = rng.offset(roughness * roughness * len / 200.0);
                let normal = if len > 1e-3 {
                    Vec2::new(-delta.y, delta.x) / len
                } else {
                    Vec2::ZERO
                };
                let control = last.midpoint(p) + normal * bow;
                result.quad_to(control, rng.wobble(p, max_offset));
                last = p;
            }
            PathEl::QuadTo(p1, p2) => {
                result.quad_to(rng.wobble(p1, max_offset * 0.7), rng.wobble(p2, max_offset));
                last = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                result.curve_to(
                    rng.wobble(p1, max_offset * 0.5),
                    rng.wobble(p2, max_offset * 0.5),
                    rng.wobble(p3, max_offset),
                );
                last = p3;
            }
            PathEl::ClosePath => result.close_path(),
        }
    }
    result
}
