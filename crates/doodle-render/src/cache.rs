//! Per-element cache of generated geometry.
//!
//! Geometry is stored relative to the element anchor, so a pure move hits the
//! cache. An entry is rebuilt when anything the paths depend on changes:
//! style, box size, or for point-based kinds the point count, the first and
//! last offsets from the anchor, and the extent of the points.

use crate::rough::RoughGenerator;
use crate::shape::{ShapeGeometry, build_geometry};
use doodle_core::{Element, ElementId, ElementKind, ElementStyle};
use kurbo::{Size, Vec2};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Everything the cached geometry was generated from.
#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    kind: ElementKind,
    style: ElementStyle,
    width: f64,
    height: f64,
    point_count: usize,
    first_offset: Vec2,
    last_offset: Vec2,
    extent: Size,
}

impl CacheKey {
    fn of(element: &Element) -> Self {
        let offset = |p: Option<kurbo::Point>| {
            p.map(|p| element.offset_from_anchor(p))
                .unwrap_or(Vec2::ZERO)
        };
        let (width, height, extent) = if element.kind.is_point_based() {
            (0.0, 0.0, element.bounds().size())
        } else {
            (element.width, element.height, Size::ZERO)
        };
        Self {
            kind: element.kind,
            style: element.style.clone(),
            width,
            height,
            point_count: element.points.len(),
            first_offset: offset(element.first_point()),
            last_offset: offset(element.last_point()),
            extent,
        }
    }
}

struct CacheEntry {
    key: CacheKey,
    geometry: Rc<ShapeGeometry>,
}

/// Hit and miss counts since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

#[derive(Default)]
pub struct ShapeCache {
    entries: HashMap<ElementId, CacheEntry>,
    stats: CacheStats,
}

impl ShapeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached geometry for `element`, regenerating it if stale.
    pub fn geometry(
        &mut self,
        element: &Element,
        generator: &dyn RoughGenerator,
    ) -> Rc<ShapeGeometry> {
        let key = CacheKey::of(element);
        if let Some(entry) = self.entries.get(&element.id) {
            if entry.key == key {
                self.stats.hits += 1;
                return Rc::clone(&entry.geometry);
            }
        }
        self.stats.misses += 1;
        let geometry = Rc::new(build_geometry(element, generator));
        self.entries.insert(
            element.id,
            CacheEntry {
                key,
                geometry: Rc::clone(&geometry),
            },
        );
        geometry
    }

    /// Geometry currently cached for `id`, without validating it.
    pub fn get(&self, id: ElementId) -> Option<Rc<ShapeGeometry>> {
        self.entries.get(&id).map(|entry| Rc::clone(&entry.geometry))
    }

    /// Drop entries for elements that no longer exist.
    pub fn retain_live(&mut self, live: &HashSet<ElementId>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, _| live.contains(id));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Return the counters and start a new period.
    pub fn take_stats(&mut self) -> CacheStats {
        std::mem::take(&mut self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rough::HandDrawn;
    use doodle_core::{ElementStyle, StylePatch};
    use kurbo::{Point, Rect};

    fn rect_element() -> Element {
        Element::from_rect(
            ElementKind::Rectangle,
            Rect::new(0.0, 0.0, 40.0, 20.0),
            ElementStyle::default(),
        )
    }

    #[test]
    fn test_move_reuses_geometry() {
        let generator = HandDrawn::default();
        let mut cache = ShapeCache::new();
        let mut element = rect_element();

        let first = cache.geometry(&element, &generator);
        element.translate(Vec2::new(100.0, 50.0));
        let second = cache.geometry(&element, &generator);

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_resize_and_restyle_invalidate() {
        let generator = HandDrawn::default();
        let mut cache = ShapeCache::new();
        let mut element = rect_element();

        let first = cache.geometry(&element, &generator);
        element.width = 60.0;
        let resized = cache.geometry(&element, &generator);
        assert!(!Rc::ptr_eq(&first, &resized));

        StylePatch::default()
            .stroke_width(6.0)
            .apply(&mut element.style);
        let restyled = cache.geometry(&element, &generator);
        assert!(!Rc::ptr_eq(&resized, &restyled));
    }

    #[test]
    fn test_line_endpoint_edit_invalidates() {
        let generator = HandDrawn::default();
        let mut cache = ShapeCache::new();
        let mut line = Element::segment(
            ElementKind::Line,
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            ElementStyle::default(),
        );

        let first = cache.geometry(&line, &generator);
        line.translate(Vec2::new(5.0, 5.0));
        assert!(Rc::ptr_eq(&first, &cache.geometry(&line, &generator)));

        line.points[1] = Point::new(80.0, 30.0);
        assert!(!Rc::ptr_eq(&first, &cache.geometry(&line, &generator)));
    }

    #[test]
    fn test_retain_live() {
        let generator = HandDrawn::default();
        let mut cache = ShapeCache::new();
        let a = rect_element();
        let b = rect_element();
        cache.geometry(&a, &generator);
        cache.geometry(&b, &generator);

        let live: HashSet<ElementId> = [a.id].into_iter().collect();
        assert_eq!(cache.retain_live(&live), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(a.id).is_some());
        assert!(cache.get(b.id).is_none());
    }
}
