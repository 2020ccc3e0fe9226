//! Clipboard Module - Copy text for `[data-copy]` buttons
//!
//! Writes go through a [`ClipboardSink`], which reports the outcome through a
//! completion callback once the write settles. The browser build
//! (`page::web::NavigatorClipboard`) resolves it from the
//! `navigator.clipboard.writeText` promise; everywhere else
//! [`BufferClipboard`] keeps the text in a thread-local buffer and completes
//! at once.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_page::state::clipboard::{self, BufferClipboard};
//! use spark_page::state::notify::NotificationLog;
//!
//! let log = Rc::new(NotificationLog::new());
//! clipboard::copy_to_clipboard(&BufferClipboard, log.clone(), "doi:10.1000/182");
//! assert_eq!(BufferClipboard::contents().as_deref(), Some("doi:10.1000/182"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::notify::{NotificationKind, Notifier};
use crate::error::{PageError, Result};
use crate::page::Page;
use crate::types::ElementId;

/// Attribute holding the text a button copies.
pub const COPY_ATTRIBUTE: &str = "data-copy";
pub const COPIED_MESSAGE: &str = "Copied to clipboard!";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy";

/// Receives the outcome of one clipboard write.
pub type CopyDone = Box<dyn FnOnce(Result<()>)>;

/// Destination for copied text.
pub trait ClipboardSink {
    /// Start writing `text`. `done` runs exactly once with the outcome,
    /// possibly after this call returns.
    fn write_text(&self, text: &str, done: CopyDone);
}

// =============================================================================
// Internal Buffer
// =============================================================================

thread_local! {
    static CLIPBOARD_BUFFER: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Clipboard backed by a thread-local buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferClipboard;

impl BufferClipboard {
    /// The most recently copied text.
    pub fn contents() -> Option<String> {
        CLIPBOARD_BUFFER.with(|buf| buf.borrow().clone())
    }

    pub fn clear() {
        CLIPBOARD_BUFFER.with(|buf| *buf.borrow_mut() = None);
    }
}

impl ClipboardSink for BufferClipboard {
    /// Empty text is rejected and leaves the buffer untouched.
    fn write_text(&self, text: &str, done: CopyDone) {
        if text.is_empty() {
            done(Err(PageError::Clipboard("nothing to copy".to_string())));
            return;
        }
        CLIPBOARD_BUFFER.with(|buf| *buf.borrow_mut() = Some(text.to_string()));
        done(Ok(()));
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Copy `text` and tell the user how it went once the write settles.
pub fn copy_to_clipboard(sink: &dyn ClipboardSink, notifier: Rc<dyn Notifier>, text: &str) {
    sink.write_text(
        text,
        Box::new(move |outcome| match outcome {
            Ok(()) => notifier.notify(COPIED_MESSAGE, NotificationKind::Success),
            Err(err) => {
                tracing::warn!(%err, "failed to copy");
                notifier.notify(COPY_FAILED_MESSAGE, NotificationKind::Error);
            }
        }),
    );
}

/// Copy the `data-copy` text of a clicked button.
///
/// Returns false when `button` carries no `data-copy` attribute.
pub fn copy_from_button(
    page: &dyn Page,
    sink: &dyn ClipboardSink,
    notifier: Rc<dyn Notifier>,
    button: ElementId,
) -> bool {
    let Some(text) = page.attribute(button, COPY_ATTRIBUTE) else {
        return false;
    };
    copy_to_clipboard(sink, notifier, &text);
    true
}

// =============================================================================
// Tests
// =============================================================================
