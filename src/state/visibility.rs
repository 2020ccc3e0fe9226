//! Visibility Monitor - Viewport intersection crossings
//!
//! Watches registered elements and reports each time one crosses the
//! "sufficiently visible" line, in either direction.
//!
//! - [`VisibilityMonitor`] - the register/unregister capability
//! - [`PollingMonitor`] - scroll-driven position check, works on any [`Page`]
//! - [`intersection_ratio`] - the geometry shared by both
//!
//! The browser build also has an `IntersectionObserver`-backed monitor in
//! `page::web`. Both behave the same from the caller's side; polling is only
//! as precise as the scroll ticks that drive it.

use crate::config::PageConfig;
use crate::page::Page;
use crate::types::{ElementId, Rect, Viewport, VisibilityEvent};

/// Callback receiving crossings for one element.
pub type VisibilityCallback = Box<dyn FnMut(VisibilityEvent)>;

/// Register/unregister capability over a visibility primitive.
pub trait VisibilityMonitor {
    /// Start watching `element`. Re-registering replaces the callback.
    fn register(&mut self, element: ElementId, callback: VisibilityCallback);

    /// Stop watching `element`. No further events are delivered for it.
    fn unregister(&mut self, element: ElementId);

    fn is_registered(&self, element: ElementId) -> bool;

    /// Re-check positions and deliver crossings; returns the number
    /// delivered. Monitors driven by the host's own observer deliver
    /// asynchronously and keep this default.
    fn poll(&mut self, _page: &dyn Page) -> usize {
        0
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// Visibility rule parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityOptions {
    /// Fraction of the element's area that must intersect the root.
    pub threshold: f64,
    /// Added to the viewport's bottom edge. Negative shrinks the root.
    pub root_margin_bottom: f64,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self::from_config(&PageConfig::default())
    }
}

impl VisibilityOptions {
    pub fn from_config(config: &PageConfig) -> Self {
        Self {
            threshold: config.threshold(),
            root_margin_bottom: config.root_margin_bottom,
        }
    }

    /// Root box the element is intersected with.
    pub fn root(&self, viewport: Viewport) -> Rect {
        let height = (viewport.height + self.root_margin_bottom).max(0.0);
        Rect::new(0.0, 0.0, viewport.width, height)
    }

    /// Is `rect` sufficiently visible inside `viewport`?
    pub fn is_visible(&self, rect: Rect, viewport: Viewport) -> bool {
        match intersection_ratio(rect, self.root(viewport)) {
            Some(ratio) => ratio > 0.0 && ratio >= self.threshold,
            None => false,
        }
    }
}

/// Fraction of `rect`'s area inside `root`, or `None` if they do not touch.
///
/// A zero-area rect counts as fully visible when it lies within the root.
pub fn intersection_ratio(rect: Rect, root: Rect) -> Option<f64> {
    let top = rect.top().max(root.top());
    let bottom = rect.bottom().min(root.bottom());
    let left = rect.left().max(root.left());
    let right = rect.right().min(root.right());

    if bottom < top || right < left {
        return None;
    }

    let area = rect.area();
    if area <= 0.0 {
        return Some(1.0);
    }

    let overlap = (bottom - top) * (right - left);
    if overlap <= 0.0 {
        return None;
    }
    Some((overlap / area).min(1.0))
}

// =============================================================================
// POLLING MONITOR
// =============================================================================

struct Watched {
    element: ElementId,
    visible: bool,
    callback: VisibilityCallback,
}

/// Fallback monitor that re-checks positions on every [`poll`](VisibilityMonitor::poll).
///
/// Every element starts "not visible"; the first poll that finds it visible
/// delivers `visible: true`, and later polls report only changes.
pub struct PollingMonitor {
    options: VisibilityOptions,
    watched: Vec<Watched>,
}

impl PollingMonitor {
    pub fn new(options: VisibilityOptions) -> Self {
        Self {
            options,
            watched: Vec::new(),
        }
    }

    pub fn options(&self) -> VisibilityOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.watched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }
}

impl VisibilityMonitor for PollingMonitor {
    fn register(&mut self, element: ElementId, callback: VisibilityCallback) {
        match self.watched.iter_mut().find(|w| w.element == element) {
            Some(existing) => existing.callback = callback,
            None => self.watched.push(Watched {
                element,
                visible: false,
                callback,
            }),
        }
    }

    fn unregister(&mut self, element: ElementId) {
        self.watched.retain(|w| w.element != element);
    }

    fn is_registered(&self, element: ElementId) -> bool {
        self.watched.iter().any(|w| w.element == element)
    }

    /// Check every registered element and deliver crossings.
    ///
    /// Elements without layout count as not visible. Returns the number of
    /// events delivered.
    fn poll(&mut self, page: &dyn Page) -> usize {
        let viewport = page.viewport();
        let options = self.options;
        let mut delivered = 0;

        for watched in &mut self.watched {
            let visible = page
                .bounding_rect(watched.element)
                .is_some_and(|rect| options.is_visible(rect, viewport));

            if visible != watched.visible {
                watched.visible = visible;
                (watched.callback)(VisibilityEvent {
                    element: watched.element,
                    visible,
                });
                delivered += 1;
            }
        }

        delivered
    }
}

// =============================================================================
// Tests
// =============================================================================
