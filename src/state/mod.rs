//! State Module - Page behavior systems
//!
//! Each system owns one concern and talks to the document only through
//! [`Page`](crate::page::Page):
//!
//! - **Visibility** - Viewport intersection crossings, polling monitor
//! - **Reveal** - One-shot fade-in of cards as they scroll into view
//! - **Scroll** - Pure reducer from scroll samples to [`ScrollState`](crate::types::ScrollState)
//! - **Header** / **Nav** - Presenters for the sticky header and active link
//! - **Throttle** - Debounce on a timer or the next animation frame
//! - **Anchors**, **Dropdown**, **Keys**, **Modal** - Navigation interactions
//! - **Counter**, **Parallax**, **Tilt** - Decorative animation
//! - **Clipboard**, **Forms**, **Notify** - Collaborator seams

pub mod anchors;
pub mod clipboard;
pub mod counter;
pub mod dropdown;
pub mod forms;
pub mod header;
pub mod keys;
pub mod modal;
pub mod nav;
pub mod notify;
pub mod parallax;
pub mod reveal;
pub mod scroll;
pub mod throttle;
pub mod tilt;
pub mod visibility;

pub use header::HeaderPresenter;
pub use nav::{NavHighlighter, NavLink};
pub use reveal::{RevealScheduler, RevealStyle};
pub use scroll::{ScrollReducer, ScrollThresholds};
pub use throttle::{Debouncer, Timing};
pub use visibility::{PollingMonitor, VisibilityCallback, VisibilityMonitor, VisibilityOptions};
