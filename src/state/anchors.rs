//! Anchors - In-page links and section toggling
//!
//! `#fragment` links scroll their target section to the top of the viewport
//! with smooth behavior. A bare `#` and fragments naming no element are left
//! alone, and the browser default is not prevented for them.
//!
//! # Example
//!
//! ```ignore
//! use spark_page::state::anchors;
//!
//! if anchors::handles(&href) {
//!     anchors::smooth_scroll_to(&page, &href)?;
//! }
//! ```

use super::nav::fragment_target;
use crate::error::{PageError, Result};
use crate::page::{require_id, Page};
use crate::types::ElementId;

/// Class applied to sections hidden by [`toggle_sections`].
pub const HIDDEN_CLASS: &str = "hidden";

/// Whether a click on a link with this `href` is taken over.
pub fn handles(href: &str) -> bool {
    fragment_target(href).is_some()
}

/// Smoothly scroll the element named by `href` to the viewport top.
///
/// Returns the element scrolled to.
pub fn smooth_scroll_to(page: &dyn Page, href: &str) -> Result<ElementId> {
    let id = fragment_target(href).ok_or_else(|| PageError::InvalidAttribute {
        name: "href".to_string(),
        value: href.to_string(),
    })?;
    let target = require_id(page, id)?;
    scroll_into_view(page, target)?;
    Ok(target)
}

/// Smoothly scroll `element` to the viewport top.
pub fn scroll_into_view(page: &dyn Page, element: ElementId) -> Result<()> {
    let top = page
        .offset_top(element)
        .ok_or(PageError::StaleElement(element))?;
    tracing::debug!(%element, top, "scrolling into view");
    page.scroll_to(top, true);
    Ok(())
}

/// Show the section with `section_id` and hide every other `section`.
///
/// Returns the number of sections hidden.
pub fn toggle_sections(page: &dyn Page, section_id: &str) -> usize {
    let mut hidden = 0;
    for section in page.query_all("section") {
        let matches = page.element_id(section).as_deref() == Some(section_id);
        page.set_class(section, HIDDEN_CLASS, !matches);
        if !matches {
            hidden += 1;
        }
    }
    hidden
}

// =============================================================================
// Tests
// =============================================================================
