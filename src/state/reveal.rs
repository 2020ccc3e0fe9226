//! Reveal Module - One-shot scroll reveal
//!
//! Registered elements start hidden (transparent, pushed down) and settle into
//! place the first time they become sufficiently visible. A revealed element
//! never hides again; an element that never becomes visible stays hidden,
//! which is a valid end state.
//!
//! # Example
//!
//! ```ignore
//! use spark_page::state::reveal::RevealScheduler;
//!
//! let mut reveal = RevealScheduler::new(RevealStyle::from_config(&config));
//! reveal.register(&page, card);
//! // ...visibility event arrives...
//! reveal.on_visibility(&page, VisibilityEvent { element: card, visible: true });
//! assert!(reveal.is_revealed(card));
//! ```

use crate::config::PageConfig;
use crate::page::Page;
use crate::types::{ElementId, VisibilityEvent};

/// Hidden-state presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealStyle {
    /// Initial downward offset in pixels.
    pub offset: f64,
    /// CSS `transition` value.
    pub transition: String,
}

impl Default for RevealStyle {
    fn default() -> Self {
        Self::from_config(&PageConfig::default())
    }
}

impl RevealStyle {
    pub fn from_config(config: &PageConfig) -> Self {
        Self {
            offset: config.reveal_offset,
            transition: config.reveal_transition(),
        }
    }

    fn apply_hidden(&self, page: &dyn Page, element: ElementId) {
        page.set_style(element, "opacity", "0");
        page.set_style(element, "transform", &format!("translateY({}px)", self.offset));
        page.set_style(element, "transition", &self.transition);
    }

    fn apply_shown(&self, page: &dyn Page, element: ElementId) {
        page.set_style(element, "opacity", "1");
        page.set_style(element, "transform", "translateY(0)");
    }
}

/// An element under reveal control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedElement {
    pub element: ElementId,
    pub revealed: bool,
}

/// Tracks which registered elements have been revealed.
#[derive(Debug, Default)]
pub struct RevealScheduler {
    style: RevealStyle,
    observed: Vec<ObservedElement>,
}

impl RevealScheduler {
    pub fn new(style: RevealStyle) -> Self {
        Self {
            style,
            observed: Vec::new(),
        }
    }

    /// Hide `element` and start tracking it.
    ///
    /// Registering twice is a no-op; a revealed element is never re-hidden.
    pub fn register(&mut self, page: &dyn Page, element: ElementId) {
        if self.observed.iter().any(|o| o.element == element) {
            return;
        }
        self.style.apply_hidden(page, element);
        self.observed.push(ObservedElement {
            element,
            revealed: false,
        });
    }

    /// Handle a visibility crossing. Returns true if this event revealed the
    /// element.
    pub fn on_visibility(&mut self, page: &dyn Page, event: VisibilityEvent) -> bool {
        if !event.visible {
            return false;
        }
        let Some(observed) = self.observed.iter_mut().find(|o| o.element == event.element) else {
            return false;
        };
        if observed.revealed {
            return false;
        }

        self.style.apply_shown(page, event.element);
        observed.revealed = true;
        tracing::trace!(element = %event.element, "revealed");
        true
    }

    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.observed
            .iter()
            .any(|o| o.element == element && o.revealed)
    }

    pub fn is_registered(&self, element: ElementId) -> bool {
        self.observed.iter().any(|o| o.element == element)
    }

    pub fn revealed_count(&self) -> usize {
        self.observed.iter().filter(|o| o.revealed).count()
    }

    pub fn observed(&self) -> &[ObservedElement] {
        &self.observed
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ElementSpec, MemoryPage};

    fn setup() -> (MemoryPage, ElementId, RevealScheduler) {
        let page = MemoryPage::new(1000.0, 800.0);
        let card = page.append_to_body(ElementSpec::new("div").class("research-card").height(200.0));
        (page, card, RevealScheduler::default())
    }

    fn shown(element: ElementId) -> VisibilityEvent {
        VisibilityEvent { element, visible: true }
    }

    fn hidden(element: ElementId) -> VisibilityEvent {
        VisibilityEvent { element, visible: false }
    }

    #[test]
    fn test_register_applies_hidden_style() {
        let (page, card, mut reveal) = setup();
        reveal.register(&page, card);

        assert_eq!(page.style(card, "opacity").as_deref(), Some("0"));
        assert_eq!(page.style(card, "transform").as_deref(), Some("translateY(20px)"));
        assert_eq!(page.style(card, "transition").as_deref(), Some("all 0.6s ease-out"));
        assert!(!reveal.is_revealed(card));
    }

    #[test]
    fn test_first_visible_event_reveals() {
        let (page, card, mut reveal) = setup();
        reveal.register(&page, card);

        assert!(reveal.on_visibility(&page, shown(card)));
        assert!(reveal.is_revealed(card));
        assert_eq!(page.style(card, "opacity").as_deref(), Some("1"));
        assert_eq!(page.style(card, "transform").as_deref(), Some("translateY(0)"));
    }

    #[test]
    fn test_reveal_is_one_shot() {
        let (page, card, mut reveal) = setup();
        reveal.register(&page, card);

        assert!(reveal.on_visibility(&page, shown(card)));
        assert!(!reveal.on_visibility(&page, hidden(card)));
        assert!(!reveal.on_visibility(&page, shown(card)));
        assert!(reveal.is_revealed(card));
        assert_eq!(page.style(card, "opacity").as_deref(), Some("1"));

        // Registering again must not re-hide.
        reveal.register(&page, card);
        assert_eq!(page.style(card, "opacity").as_deref(), Some("1"));
        assert_eq!(reveal.revealed_count(), 1);
    }

    #[test]
    fn test_hidden_event_before_reveal_is_ignored() {
        let (page, card, mut reveal) = setup();
        reveal.register(&page, card);
        assert!(!reveal.on_visibility(&page, hidden(card)));
        assert!(!reveal.is_revealed(card));
    }

    #[test]
    fn test_unregistered_element_ignored() {
        let (page, card, mut reveal) = setup();
        assert!(!reveal.on_visibility(&page, shown(card)));
        assert_eq!(page.style(card, "opacity"), None);
    }

    #[test]
    fn test_custom_offset() {
        let (page, card, _) = setup();
        let config = PageConfig::default().with_reveal_offset(30.0);
        let mut reveal = RevealScheduler::new(RevealStyle::from_config(&config));
        reveal.register(&page, card);
        assert_eq!(page.style(card, "transform").as_deref(), Some("translateY(30px)"));
    }
}
