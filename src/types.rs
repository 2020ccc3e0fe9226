//! Core types for spark-page.
//!
//! These types flow from page events through the reducer into the presenters.
//! Nothing here touches the page; everything is plain data.

use std::fmt;
use std::time::Duration;

// =============================================================================
// Element handles
// =============================================================================

/// Opaque handle to a page element.
///
/// Indices are assigned by the [`Page`](crate::page::Page) implementation and
/// stay stable for the lifetime of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl ElementId {
    /// Raw index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Viewport-relative rectangle, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Area in square pixels.
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// Visible viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// =============================================================================
// Scroll
// =============================================================================

/// Vertical scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Toward the top of the document. Also the state before any scroll.
    #[default]
    Up,
    /// Toward the bottom of the document.
    Down,
}

/// One scroll position reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSample {
    /// Pixels from the document top. Never negative.
    pub offset: u32,
    /// Time since page load.
    pub timestamp: Duration,
}

impl ScrollSample {
    pub const fn new(offset: u32, timestamp: Duration) -> Self {
        Self { offset, timestamp }
    }

    /// Build a sample from a raw browser reading.
    ///
    /// Overscroll (negative values) and NaN clamp to 0.
    pub fn from_raw(offset: f64, timestamp: Duration) -> Self {
        let offset = if offset.is_finite() && offset > 0.0 {
            offset.round().min(u32::MAX as f64) as u32
        } else {
            0
        };
        Self { offset, timestamp }
    }
}

/// A section's position in the live layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionDescriptor {
    pub id: String,
    /// Pixels from the document top.
    pub top: f64,
    pub height: f64,
}

impl SectionDescriptor {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }
}

/// Derived scroll state shared by the header presenter and nav highlighter.
///
/// `active_section_id` is always `None` or the id of exactly one section
/// passed to the last reduction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrollState {
    pub offset: u32,
    pub direction: Direction,
    /// Offset is past the background/blur threshold.
    pub past_threshold: bool,
    /// Offset is past the heavier drop-shadow threshold.
    pub past_shadow_threshold: bool,
    pub active_section_id: Option<String>,
}

// =============================================================================
// Header
// =============================================================================

/// Ranked visual treatment of the sticky header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum HeaderTier {
    /// At or near the top: transparent, no shadow.
    #[default]
    Resting,
    /// Past the background threshold, or past the shadow threshold while
    /// scrolling up.
    Elevated,
    /// Past the shadow threshold while scrolling down.
    ScrolledHeavy,
}

impl HeaderTier {
    /// Derive the tier for a scroll state.
    pub fn for_state(state: &ScrollState) -> Self {
        if !state.past_threshold {
            Self::Resting
        } else if state.past_shadow_threshold && state.direction == Direction::Down {
            Self::ScrolledHeavy
        } else {
            Self::Elevated
        }
    }

    /// Style flags applied for this tier.
    pub fn style(self) -> HeaderStyle {
        match self {
            Self::Resting => HeaderStyle::NONE,
            Self::Elevated => HeaderStyle::BACKGROUND | HeaderStyle::BLUR | HeaderStyle::SHADOW,
            Self::ScrolledHeavy => {
                HeaderStyle::BACKGROUND | HeaderStyle::BLUR | HeaderStyle::HEAVY_SHADOW
            }
        }
    }

    /// Class name placed on the header element.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Resting => "header--resting",
            Self::Elevated => "header--elevated",
            Self::ScrolledHeavy => "header--scrolled-heavy",
        }
    }

    pub const ALL: [HeaderTier; 3] = [Self::Resting, Self::Elevated, Self::ScrolledHeavy];
}

bitflags::bitflags! {
    /// Header treatment as a bitfield.
    ///
    /// Combine with bitwise OR: `HeaderStyle::BACKGROUND | HeaderStyle::BLUR`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HeaderStyle: u8 {
        const NONE = 0;
        const BACKGROUND = 1 << 0;
        const BLUR = 1 << 1;
        const SHADOW = 1 << 2;
        const HEAVY_SHADOW = 1 << 3;
    }
}

// =============================================================================
// Visibility
// =============================================================================

/// One visibility crossing for a registered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityEvent {
    pub element: ElementId,
    /// The element is now sufficiently visible.
    pub visible: bool,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn state(offset: u32, direction: Direction) -> ScrollState {
        ScrollState {
            offset,
            direction,
            past_threshold: offset > 50,
            past_shadow_threshold: offset > 100,
            active_section_id: None,
        }
    }

    #[test]
    fn test_sample_clamps_overscroll() {
        let t = Duration::ZERO;
        assert_eq!(ScrollSample::from_raw(-35.0, t).offset, 0);
        assert_eq!(ScrollSample::from_raw(f64::NAN, t).offset, 0);
        assert_eq!(ScrollSample::from_raw(120.4, t).offset, 120);
        assert_eq!(ScrollSample::from_raw(120.6, t).offset, 121);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(HeaderTier::for_state(&state(0, Direction::Down)), HeaderTier::Resting);
        assert_eq!(HeaderTier::for_state(&state(50, Direction::Down)), HeaderTier::Resting);
        assert_eq!(HeaderTier::for_state(&state(51, Direction::Down)), HeaderTier::Elevated);
        assert_eq!(HeaderTier::for_state(&state(100, Direction::Down)), HeaderTier::Elevated);
        assert_eq!(
            HeaderTier::for_state(&state(101, Direction::Down)),
            HeaderTier::ScrolledHeavy
        );
    }

    #[test]
    fn test_tier_downgrades_when_scrolling_up() {
        assert_eq!(HeaderTier::for_state(&state(500, Direction::Up)), HeaderTier::Elevated);
    }

    #[test]
    fn test_tier_styles_are_ranked() {
        assert!(HeaderTier::Resting.style().is_empty());
        assert!(HeaderTier::Elevated.style().contains(HeaderStyle::SHADOW));
        assert!(!HeaderTier::Elevated.style().contains(HeaderStyle::HEAVY_SHADOW));
        assert!(HeaderTier::ScrolledHeavy.style().contains(HeaderStyle::HEAVY_SHADOW));
        assert!(HeaderTier::Resting < HeaderTier::Elevated);
        assert!(HeaderTier::Elevated < HeaderTier::ScrolledHeavy);
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.area(), 5000.0);
    }
}
