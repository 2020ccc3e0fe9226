//! # spark-page
//!
//! Scroll-driven behavior for a single-page site, on a reactive core.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! Everything the page does is a function of a few raw inputs (scroll
//! offset, viewport size, element visibility). Those inputs are reduced into
//! one `ScrollState` signal, and a single presenter effect writes the
//! result back to the document:
//! ```text
//! scroll event → Debouncer → ScrollReducer → ScrollState signal → tier / active deriveds → presenter effect
//! visibility   → VisibilityMonitor → RevealScheduler
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (ElementId, ScrollState, HeaderTier, etc.)
//! - [`page`] - The `Page` document capability, in-memory and browser
//! - [`scheduler`] - Timers and animation frames behind a trait
//! - [`state`] - Reveal, scroll reduction, presenters, interactions
//! - [`pipeline`] - Deriveds and the mount lifecycle

pub mod config;
pub mod error;
pub mod page;
pub mod pipeline;
pub mod scheduler;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::PageConfig;
pub use error::{PageError, Result};

pub use page::{section_layout, ElementSpec, MemoryPage, Page, Selector};

pub use scheduler::{ManualScheduler, Scheduler, Task, TaskId};

pub use pipeline::{mount, mount_polling, unmount, Collaborators, MountHandle};

pub use state::{
    Debouncer, HeaderPresenter, NavHighlighter, NavLink, PollingMonitor, RevealScheduler,
    RevealStyle, ScrollReducer, ScrollThresholds, Timing, VisibilityCallback, VisibilityMonitor,
    VisibilityOptions,
};
