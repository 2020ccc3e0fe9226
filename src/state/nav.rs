//! Nav Highlighter - Active navigation link
//!
//! Each nav anchor is parsed once into a [`NavLink`] (element + target section
//! id from its `#fragment`). The active flag is never stored: every update
//! recomputes it from the active section id. At most one link is active; when
//! several links point at the same section the first in document order wins.

use crate::page::Page;
use crate::types::ElementId;

/// Class marking the active link.
pub const ACTIVE_CLASS: &str = "active";

/// A navigation anchor and the section it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub element: ElementId,
    /// `None` for links without an in-page fragment (`#`, external URLs).
    pub target: Option<String>,
}

/// Section id named by an `href`, if it is a non-empty in-page fragment.
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

impl NavLink {
    pub fn parse(page: &dyn Page, element: ElementId) -> Self {
        let target = page
            .attribute(element, "href")
            .and_then(|href| fragment_target(&href).map(str::to_string));
        Self { element, target }
    }
}

/// Highlights the nav link matching the active section.
#[derive(Debug, Default)]
pub struct NavHighlighter {
    links: Vec<NavLink>,
    active: Option<ElementId>,
}

impl NavHighlighter {
    pub fn new(links: Vec<NavLink>) -> Self {
        Self {
            links,
            active: None,
        }
    }

    /// Parse every element matching `selector`.
    pub fn scan(page: &dyn Page, selector: &str) -> Self {
        let links: Vec<NavLink> = page
            .query_all(selector)
            .into_iter()
            .map(|el| NavLink::parse(page, el))
            .collect();
        tracing::debug!(count = links.len(), "nav links scanned");
        Self::new(links)
    }

    /// Mark the link for `active_section` and clear every other link.
    ///
    /// Returns the element now active, if any.
    pub fn apply(&mut self, page: &dyn Page, active_section: Option<&str>) -> Option<ElementId> {
        let winner = active_section.and_then(|id| {
            self.links
                .iter()
                .find(|link| link.target.as_deref() == Some(id))
                .map(|link| link.element)
        });

        for link in &self.links {
            page.set_class(link.element, ACTIVE_CLASS, Some(link.element) == winner);
        }

        self.active = winner;
        winner
    }

    pub fn active(&self) -> Option<ElementId> {
        self.active
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }
}

// =============================================================================
// Tests
// =============================================================================
