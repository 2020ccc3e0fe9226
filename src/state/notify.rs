//! Notify Module - Transient user notifications
//!
//! The page shows short toasts ("Copied to clipboard!", form errors). The
//! presentation belongs to the host; this module only defines the seam and a
//! recorder for tests and headless runs.

use std::cell::RefCell;
use std::fmt;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Error,
}

impl NotificationKind {
    /// Toast background color.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Info => "#3b82f6",
            Self::Success => "#22c55e",
            Self::Error => "#ef4444",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        })
    }
}

/// Shows a notification to the user.
pub trait Notifier {
    fn notify(&self, message: &str, kind: NotificationKind);
}

/// Keeps every notification in order.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: RefCell<Vec<(String, NotificationKind)>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(String, NotificationKind)> {
        self.entries.borrow().clone()
    }

    pub fn last(&self) -> Option<(String, NotificationKind)> {
        self.entries.borrow().last().cloned()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, message: &str, kind: NotificationKind) {
        tracing::info!(%kind, message, "notification");
        self.entries.borrow_mut().push((message.to_string(), kind));
    }
}
