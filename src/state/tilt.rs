//! Tilt Module - 3D tilt of cards under the pointer
//!
//! Each card rotates toward the pointer: one degree per 10px of distance
//! from its center. Leaving the card flattens it again.

use crate::page::Page;
use crate::types::{ElementId, Rect};

pub const TILT_SELECTOR: &str = ".research-card, .member-card, .publication-item";
pub const FLAT_TRANSFORM: &str = "perspective(1000px) rotateX(0) rotateY(0)";

/// `(rotate_x, rotate_y)` in degrees for a pointer at viewport (`x`, `y`)
/// over a card occupying `rect`.
pub fn tilt_angles(rect: Rect, x: f64, y: f64) -> (f64, f64) {
    let local_x = x - rect.left();
    let local_y = y - rect.top();
    let rotate_x = (local_y - rect.height / 2.0) / 10.0;
    let rotate_y = (rect.width / 2.0 - local_x) / 10.0;
    (rotate_x, rotate_y)
}

pub fn tilt_transform(rotate_x: f64, rotate_y: f64) -> String {
    format!("perspective(1000px) rotateX({rotate_x}deg) rotateY({rotate_y}deg)")
}

/// The tiltable cards found at mount.
#[derive(Debug, Default)]
pub struct TiltCards {
    cards: Vec<ElementId>,
}

impl TiltCards {
    pub fn scan(page: &dyn Page) -> Self {
        Self {
            cards: page.query_all(TILT_SELECTOR),
        }
    }

    pub fn cards(&self) -> &[ElementId] {
        &self.cards
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.cards.contains(&element)
    }

    /// Tilt `card` toward the pointer. Returns false for non-cards.
    pub fn pointer_move(&self, page: &dyn Page, card: ElementId, x: f64, y: f64) -> bool {
        if !self.contains(card) {
            return false;
        }
        let Some(rect) = page.bounding_rect(card) else {
            return false;
        };
        let (rotate_x, rotate_y) = tilt_angles(rect, x, y);
        page.set_style(card, "transform", &tilt_transform(rotate_x, rotate_y));
        true
    }

    /// Flatten `card`. Returns false for non-cards.
    pub fn pointer_leave(&self, page: &dyn Page, card: ElementId) -> bool {
        if !self.contains(card) {
            return false;
        }
        page.set_style(card, "transform", FLAT_TRANSFORM);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ElementSpec, MemoryPage};

    #[test]
    fn test_angles_from_center() {
        let rect = Rect::new(100.0, 50.0, 200.0, 100.0);
        assert_eq!(tilt_angles(rect, 200.0, 100.0), (0.0, 0.0));
        // Top-left corner tips the card back and to the left.
        assert_eq!(tilt_angles(rect, 100.0, 50.0), (-5.0, 10.0));
    }

    #[test]
    fn test_move_and_leave() {
        let page = MemoryPage::new(1000.0, 800.0);
        let card = page.append_to_body(ElementSpec::new("div").class("research-card").height(100.0));
        let plain = page.append_to_body(ElementSpec::new("div").height(100.0));
        let tilt = TiltCards::scan(&page);
        assert_eq!(tilt.cards(), &[card]);

        // Card spans 0..1000 x 0..100; pointer at its right edge, top row.
        assert!(tilt.pointer_move(&page, card, 1000.0, 0.0));
        assert_eq!(
            page.style(card, "transform").as_deref(),
            Some("perspective(1000px) rotateX(-5deg) rotateY(-50deg)")
        );

        assert!(tilt.pointer_leave(&page, card));
        assert_eq!(page.style(card, "transform").as_deref(), Some(FLAT_TRANSFORM));

        assert!(!tilt.pointer_move(&page, plain, 10.0, 10.0));
        assert_eq!(page.style(plain, "transform"), None);
    }
}
