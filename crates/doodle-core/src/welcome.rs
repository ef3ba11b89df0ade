//! Content installed into an empty scene on first start.

use crate::element::{
    DEFAULT_FONT_SIZE, Element, ElementKind, ElementStyle, TextAlign, TextBaseline,
};
use crate::scene::Scene;
use kurbo::{Point, Rect};

/// Rough text extent until the host reports a measured size.
fn estimate_text_size(text: &str, font_size: f64) -> (f64, f64) {
    let lines: Vec<&str> = text.lines().collect();
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = longest as f64 * font_size * 0.6;
    let height = lines.len().max(1) as f64 * font_size * 1.2;
    (width, height)
}

fn label(at: Point, text: &str, container: Option<&Element>, style: &ElementStyle) -> Element {
    let (align, baseline) = if container.is_some() {
        (TextAlign::Center, TextBaseline::Middle)
    } else {
        (TextAlign::Left, TextBaseline::Top)
    };
    let mut element = Element::text(at, align, baseline, style.reseeded());
    let (width, height) = estimate_text_size(text, DEFAULT_FONT_SIZE);
    element.text = Some(text.to_string());
    element.width = width;
    element.height = height;
    element.container_element_id = container.map(|c| c.id);
    element
}

/// A framed title, a tagline and an arrow pointing at the frame.
pub fn welcome_elements(style: &ElementStyle) -> Vec<Element> {
    let frame = Element::from_rect(
        ElementKind::Rectangle,
        Rect::new(120.0, 100.0, 420.0, 220.0),
        style.reseeded(),
    );
    let title = label(frame.box_rect().center(), "Doodle", Some(&frame), style);
    let tagline = label(
        Point::new(120.0, 250.0),
        "Sketch. Plan. Iterate.\nPick a tool and drag on the canvas.",
        None,
        style,
    );
    let arrow = Element::segment(
        ElementKind::Arrow,
        Point::new(560.0, 330.0),
        Point::new(440.0, 200.0),
        style.reseeded(),
    );
    vec![frame, title, tagline, arrow]
}

/// Install the welcome content when the scene is empty. Records no history.
pub fn seed_if_empty(scene: &mut Scene) -> bool {
    if !scene.is_empty() {
        return false;
    }
    let elements = welcome_elements(&scene.app_state().current_style);
    log::info!("Seeding empty scene with {} welcome elements", elements.len());
    scene.set_elements(elements);
    true
}
