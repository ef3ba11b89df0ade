//! Viewport zoom/scroll and the screen <-> world mapping.
//!
//! A world point `(wx, wy)` lands on screen at `(wx * zoom + scroll.x, wy * zoom + scroll.y)`:
//! scale first, then translate by a scroll expressed in screen pixels.

use kurbo::{Affine, Point, Vec2};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// `value` limited to `[MIN_ZOOM, MAX_ZOOM]`; `fallback` when it is not a number.
fn bound_zoom(value: f64, fallback: f64) -> f64 {
    let bounded = if value.is_nan() {
        fallback
    } else {
        value.clamp(MIN_ZOOM, MAX_ZOOM)
    };
    if bounded != value {
        log::warn!("zoom bound {} out of range, using {}", value, bounded);
    }
    bounded
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    /// Translation applied after scaling, in screen pixels.
    pub scroll: Vec2,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            scroll: Vec2::ZERO,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport with custom zoom limits, narrowed to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn with_zoom_bounds(min_zoom: f64, max_zoom: f64) -> Self {
        let lower = bound_zoom(min_zoom, MIN_ZOOM);
        let upper = bound_zoom(max_zoom, MAX_ZOOM);
        let (min_zoom, max_zoom) = if lower <= upper {
            (lower, upper)
        } else {
            log::warn!("min zoom {} exceeds max zoom {}, swapping", lower, upper);
            (upper, lower)
        };
        Self {
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    /// World -> screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.scroll) * Affine::scale(self.zoom)
    }

    /// Screen -> world transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.scroll)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Set the zoom level, clamped to the allowed range. Scroll is untouched.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.clamp_zoom(zoom);
    }

    pub fn set_scroll(&mut self, scroll: Vec2) {
        self.scroll = scroll;
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.scroll += delta;
    }

    /// Multiply the zoom by `factor`, keeping the world point under `screen_point` fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = self.clamp_zoom(self.zoom * factor);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;
        self.scroll = screen_point.to_vec2() - world_point.to_vec2() * new_zoom;
    }

    /// Reset to 100% with no scroll.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.scroll = Vec2::ZERO;
    }
}
