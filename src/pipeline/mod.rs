//! Reactive Pipeline
//!
//! Connects raw page events to the presenters.
//!
//! # Pipeline Architecture
//!
//! ```text
//! on_scroll → Debouncer → ScrollReducer → ScrollState signal → tierDerived / activeDerived → presenter effect
//! ```
//!
//! ## Data Flow
//!
//! 1. **ScrollReducer** - Pure fold of scroll samples and section layout
//! 2. **tierDerived** / **activeDerived** - Header tier and active section id
//! 3. **presenter effect** - The only writer of header styles and nav classes
//!
//! Reveal runs beside the pipeline: the visibility monitor is polled (or
//! called back by the browser) and flips elements once.

pub mod mount;
pub mod scroll_derived;

// Re-exports
pub use mount::{mount, mount_polling, unmount, Collaborators, MountHandle};
pub use scroll_derived::{create_active_section_derived, create_tier_derived};
