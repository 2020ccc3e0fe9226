//! Parallax - Pointer-driven drift for `[data-parallax]` elements
//!
//! Each element's `data-parallax` attribute is a speed factor. On pointer
//! move every element is translated by
//! `((viewport_w - x * speed) / 100, (viewport_h - y * speed) / 100)`.

use crate::config::number_or;
use crate::page::Page;
use crate::types::{ElementId, Viewport};

pub const PARALLAX_ATTRIBUTE: &str = "data-parallax";
pub const PARALLAX_SELECTOR: &str = "[data-parallax]";

/// Speed factor from a `data-parallax` value. Missing or malformed values
/// give 1.0.
pub fn parallax_speed(value: Option<&str>) -> f64 {
    number_or(PARALLAX_ATTRIBUTE, value, 1.0)
}

/// Translation for a pointer at (`x`, `y`).
pub fn parallax_offset(viewport: Viewport, x: f64, y: f64, speed: f64) -> (f64, f64) {
    (
        (viewport.width - x * speed) / 100.0,
        (viewport.height - y * speed) / 100.0,
    )
}

/// The page's parallax elements with their parsed speeds.
#[derive(Debug, Default)]
pub struct ParallaxLayer {
    elements: Vec<(ElementId, f64)>,
}

impl ParallaxLayer {
    pub fn scan(page: &dyn Page) -> Self {
        let elements = page
            .query_all(PARALLAX_SELECTOR)
            .into_iter()
            .map(|el| {
                let speed = parallax_speed(page.attribute(el, PARALLAX_ATTRIBUTE).as_deref());
                (el, speed)
            })
            .collect();
        Self { elements }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Move every element for a pointer at (`x`, `y`).
    pub fn pointer_move(&self, page: &dyn Page, x: f64, y: f64) {
        let viewport = page.viewport();
        for &(element, speed) in &self.elements {
            let (dx, dy) = parallax_offset(viewport, x, y, speed);
            page.set_style(element, "transform", &format!("translate({dx}px, {dy}px)"));
        }
    }
}
