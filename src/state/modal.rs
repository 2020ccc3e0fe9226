//! Modal Module - Open and close overlay dialogs by id
//!
//! An open modal is shown as a flex container and locks page scrolling by
//! setting `overflow: hidden` on `body`; closing reverses both.

use crate::page::Page;

pub const OPEN_DISPLAY: &str = "flex";
pub const CLOSED_DISPLAY: &str = "none";

fn lock_body(page: &dyn Page, locked: bool) {
    if let Some(body) = page.query("body") {
        page.set_style(body, "overflow", if locked { "hidden" } else { "auto" });
    }
}

/// Show the modal with id `modal_id`. Returns false if there is none.
pub fn open_modal(page: &dyn Page, modal_id: &str) -> bool {
    let Some(modal) = page.element_by_id(modal_id) else {
        tracing::debug!(modal_id, "no such modal");
        return false;
    };
    page.set_style(modal, "display", OPEN_DISPLAY);
    lock_body(page, true);
    true
}

/// Hide the modal with id `modal_id`. Returns false if there is none.
pub fn close_modal(page: &dyn Page, modal_id: &str) -> bool {
    let Some(modal) = page.element_by_id(modal_id) else {
        tracing::debug!(modal_id, "no such modal");
        return false;
    };
    page.set_style(modal, "display", CLOSED_DISPLAY);
    lock_body(page, false);
    true
}

pub fn is_open(page: &dyn Page, modal_id: &str) -> bool {
    page.element_by_id(modal_id)
        .and_then(|modal| page.style(modal, "display"))
        .as_deref()
        == Some(OPEN_DISPLAY)
}
