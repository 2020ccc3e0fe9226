//! Keys Module - Page-level keyboard shortcuts
//!
//! - `Escape` closes the mobile navigation (`#mainNav.active`)
//! - `Ctrl+K` / `Cmd+K` focuses the search input, if the page has one
//!
//! Events are routed once per keydown; the returned [`KeyAction`] tells the
//! host whether the browser default must be prevented.
//!
//! # Example
//!
//! ```ignore
//! use spark_page::state::keys::{self, KeyboardEvent, Modifiers};
//!
//! let action = keys::route(&page, &KeyboardEvent::with_modifiers("k", Modifiers::ctrl()));
//! if action.prevents_default() {
//!     event.prevent_default();
//! }
//! ```

use crate::page::Page;

/// Id of the collapsible navigation.
pub const MAIN_NAV_ID: &str = "mainNav";
/// Class marking the open mobile navigation.
pub const NAV_OPEN_CLASS: &str = "active";
pub const SEARCH_SELECTOR: &str = "input[type=\"search\"]";

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    pub fn meta() -> Self {
        Self { meta: true, ..Self::default() }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keydown event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// DOM key value (e.g. "k", "Escape", "ArrowUp")
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyboardEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::none(),
        }
    }

    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// What a keydown did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Not a page shortcut.
    Ignored,
    /// Escape; `closed` is false when the nav was already closed.
    CloseNav { closed: bool },
    /// Ctrl/Cmd+K; `focused` is false when the page has no search input.
    FocusSearch { focused: bool },
}

impl KeyAction {
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::FocusSearch { .. })
    }
}

// =============================================================================
// ROUTING
// =============================================================================

/// Remove the open class from `#mainNav`. Returns true if it was open.
pub fn close_mobile_nav(page: &dyn Page) -> bool {
    let Some(nav) = page.element_by_id(MAIN_NAV_ID) else {
        return false;
    };
    if !page.has_class(nav, NAV_OPEN_CLASS) {
        return false;
    }
    page.set_class(nav, NAV_OPEN_CLASS, false);
    tracing::debug!("mobile nav closed");
    true
}

/// Handle one keydown.
pub fn route(page: &dyn Page, event: &KeyboardEvent) -> KeyAction {
    if event.key == "Escape" {
        return KeyAction::CloseNav {
            closed: close_mobile_nav(page),
        };
    }

    if event.modifiers.command() && event.key.eq_ignore_ascii_case("k") {
        let search = page.query(SEARCH_SELECTOR);
        if let Some(input) = search {
            page.focus(input);
        }
        return KeyAction::FocusSearch {
            focused: search.is_some(),
        };
    }

    KeyAction::Ignored
}

// =============================================================================
// Tests
// =============================================================================
