//! Error types for spark-page.
//!
//! Event entry points never surface these: a failed lookup is logged at
//! `debug` and the operation is skipped. They exist so the internals can use
//! `?` instead of nested `if let`.

use thiserror::Error;

use crate::types::ElementId;

/// Result type for spark-page operations.
pub type Result<T> = std::result::Result<T, PageError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PageError {
    /// An element the operation expected is not on the page.
    #[error("element not found: {0}")]
    MissingElement(String),

    /// A handle no longer refers to a live element.
    #[error("stale element handle {0}")]
    StaleElement(ElementId),

    /// An attribute held a value that could not be interpreted.
    #[error("invalid value {value:?} for attribute {name}")]
    InvalidAttribute { name: String, value: String },

    /// A CSS selector outside the supported subset.
    #[error("unsupported selector: {0:?}")]
    InvalidSelector(String),

    /// The in-memory layout engine failed.
    #[error("layout failed: {0}")]
    Layout(String),

    /// A collaborator refused the input.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Clipboard write failed.
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    /// The host environment (browser) reported an error.
    #[error("host error: {0}")]
    Host(String),
}

impl PageError {
    pub fn missing(what: impl Into<String>) -> Self {
        Self::MissingElement(what.into())
    }
}
