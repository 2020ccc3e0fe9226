//! Page Module - The document capability the coordinator runs against
//!
//! Everything the coordinator reads or writes goes through [`Page`]. The
//! methods take `&self` because the live DOM is shared mutable state; the
//! in-memory implementation uses interior mutability to match.
//!
//! - [`MemoryPage`] - in-memory document with taffy block layout
//! - `WebPage` - `web-sys` binding to the browser document (feature `web`)
//!
//! Lookups return `Option`: an absent node is the only failure the
//! coordinator expects, and callers skip on `None`.

mod memory;
mod selector;
#[cfg(feature = "web")]
pub mod web;

pub use memory::{ElementSpec, MemoryPage};
pub use selector::{Selector, SelectorTarget};

use crate::error::{PageError, Result};
use crate::types::{ElementId, Rect, SectionDescriptor, Viewport};

/// Document access used by every presenter.
pub trait Page {
    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// Descendants of `root` matching `selector`, in document order.
    fn query_within(&self, root: ElementId, selector: &str) -> Vec<ElementId>;

    /// First element matching `selector`.
    fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    /// Element whose `id` attribute equals `id`.
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// The element's non-empty `id` attribute.
    fn element_id(&self, element: ElementId) -> Option<String> {
        self.attribute(element, "id").filter(|id| !id.is_empty())
    }

    /// Distance from the document top to the element's top edge.
    fn offset_top(&self, element: ElementId) -> Option<f64>;

    fn offset_height(&self, element: ElementId) -> Option<f64>;

    /// Viewport-relative box.
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    fn viewport(&self) -> Viewport;

    /// Current vertical scroll offset.
    fn scroll_offset(&self) -> f64;

    fn scroll_to(&self, top: f64, smooth: bool);

    fn style(&self, element: ElementId, property: &str) -> Option<String>;

    fn set_style(&self, element: ElementId, property: &str, value: &str);

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    fn set_class(&self, element: ElementId, class: &str, enabled: bool);

    fn set_text(&self, element: ElementId, text: &str);

    /// Move keyboard focus to `element`.
    fn focus(&self, element: ElementId);
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Selector for the sections that drive active-link highlighting.
pub const SECTION_SELECTOR: &str = "section[id]";

/// Read the live layout of every `section[id]`, in document order.
///
/// Sections that have no layout (detached, hidden) are skipped.
pub fn section_layout(page: &dyn Page) -> Vec<SectionDescriptor> {
    page.query_all(SECTION_SELECTOR)
        .into_iter()
        .filter_map(|el| {
            let id = page.element_id(el)?;
            let top = page.offset_top(el)?;
            let height = page.offset_height(el).unwrap_or(0.0);
            Some(SectionDescriptor::new(id, top, height))
        })
        .collect()
}

/// Look up a required element by id.
pub fn require_id(page: &dyn Page, id: &str) -> Result<ElementId> {
    page.element_by_id(id)
        .ok_or_else(|| PageError::missing(format!("#{id}")))
}

/// Look up a required element by selector.
pub fn require(page: &dyn Page, selector: &str) -> Result<ElementId> {
    page.query(selector)
        .ok_or_else(|| PageError::missing(selector))
}
