//! Page Configuration - Tunable constants for the scroll coordinator
//!
//! Every threshold the coordinator uses lives here with its default.
//! Builder-style setters mirror the props structs elsewhere in the crate.
//!
//! # Example
//!
//! ```ignore
//! use spark_page::config::PageConfig;
//!
//! let config = PageConfig::default()
//!     .with_lookahead(160.0)
//!     .with_scroll_debounce_ms(50);
//! ```

use std::time::Duration;

use crate::error::{PageError, Result};

// =============================================================================
// DEFAULTS
// =============================================================================

/// Fraction of an element's area that must be visible before it reveals.
pub const VISIBILITY_THRESHOLD: f64 = 0.1;

/// Bottom root margin. Negative values shrink the viewport from below.
pub const ROOT_MARGIN_BOTTOM: f64 = -100.0;

/// Initial downward offset of a hidden reveal element.
pub const REVEAL_OFFSET: f64 = 20.0;

/// Reveal transition duration.
pub const REVEAL_DURATION_MS: u64 = 600;

/// Header gets its background and blur past this offset.
pub const BACKGROUND_THRESHOLD: u32 = 50;

/// Header gets its heavy shadow past this offset (when scrolling down).
pub const SHADOW_THRESHOLD: u32 = 100;

/// Active-section lookahead, compensating for the header height.
pub const SECTION_LOOKAHEAD: f64 = 200.0;

pub const SCROLL_DEBOUNCE_MS: u64 = 100;
pub const RESIZE_DEBOUNCE_MS: u64 = 250;

/// Viewports at or below this width use the mobile navigation.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Default class list of elements that reveal on scroll.
pub const REVEAL_SELECTOR: &str =
    ".research-card, .member-card, .publication-item, .news-item, .gallery-item, .alumni-card";

/// Anchors that participate in active-section highlighting.
pub const NAV_LINK_SELECTOR: &str = ".nav-link, .dropdown-item";

// =============================================================================
// CONFIG
// =============================================================================

/// Coordinator configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageConfig {
    pub visibility_threshold: f64,
    pub root_margin_bottom: f64,
    pub reveal_offset: f64,
    pub reveal_duration_ms: u64,
    pub background_threshold: u32,
    pub shadow_threshold: u32,
    pub section_lookahead: f64,
    pub scroll_debounce_ms: u64,
    pub resize_debounce_ms: u64,
    pub mobile_breakpoint: f64,
    /// Coalesce scroll handling to the next animation frame instead of
    /// a timed debounce.
    pub scroll_on_frame: bool,
    /// Hide every other section when a nav anchor is followed.
    pub toggle_sections: bool,
    pub reveal_selector: String,
    pub nav_link_selector: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: VISIBILITY_THRESHOLD,
            root_margin_bottom: ROOT_MARGIN_BOTTOM,
            reveal_offset: REVEAL_OFFSET,
            reveal_duration_ms: REVEAL_DURATION_MS,
            background_threshold: BACKGROUND_THRESHOLD,
            shadow_threshold: SHADOW_THRESHOLD,
            section_lookahead: SECTION_LOOKAHEAD,
            scroll_debounce_ms: SCROLL_DEBOUNCE_MS,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            mobile_breakpoint: MOBILE_BREAKPOINT,
            scroll_on_frame: false,
            toggle_sections: false,
            reveal_selector: REVEAL_SELECTOR.to_string(),
            nav_link_selector: NAV_LINK_SELECTOR.to_string(),
        }
    }
}

impl PageConfig {
    pub fn with_visibility_threshold(mut self, threshold: f64) -> Self {
        self.visibility_threshold = threshold;
        self
    }

    pub fn with_root_margin_bottom(mut self, margin: f64) -> Self {
        self.root_margin_bottom = margin;
        self
    }

    pub fn with_reveal_offset(mut self, offset: f64) -> Self {
        self.reveal_offset = offset;
        self
    }

    pub fn with_lookahead(mut self, lookahead: f64) -> Self {
        self.section_lookahead = lookahead;
        self
    }

    pub fn with_thresholds(mut self, background: u32, shadow: u32) -> Self {
        self.background_threshold = background;
        self.shadow_threshold = shadow;
        self
    }

    pub fn with_scroll_debounce_ms(mut self, ms: u64) -> Self {
        self.scroll_debounce_ms = ms;
        self
    }

    pub fn with_resize_debounce_ms(mut self, ms: u64) -> Self {
        self.resize_debounce_ms = ms;
        self
    }

    pub fn with_scroll_on_frame(mut self, on_frame: bool) -> Self {
        self.scroll_on_frame = on_frame;
        self
    }

    pub fn with_toggle_sections(mut self, toggle: bool) -> Self {
        self.toggle_sections = toggle;
        self
    }

    pub fn with_reveal_selector(mut self, selector: impl Into<String>) -> Self {
        self.reveal_selector = selector.into();
        self
    }

    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Threshold clamped into `0.0..=1.0`.
    pub fn threshold(&self) -> f64 {
        if self.visibility_threshold.is_finite() {
            self.visibility_threshold.clamp(0.0, 1.0)
        } else {
            VISIBILITY_THRESHOLD
        }
    }

    /// CSS transition applied to reveal elements.
    pub fn reveal_transition(&self) -> String {
        let secs = self.reveal_duration_ms as f64 / 1000.0;
        format!("all {secs}s ease-out")
    }
}

// =============================================================================
// ATTRIBUTE PARSING
// =============================================================================

/// Parse a numeric attribute value.
///
/// Surrounding whitespace is ignored. Non-finite values are rejected.
pub fn parse_number(name: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| PageError::InvalidAttribute {
            name: name.to_string(),
            value: value.to_string(),
        })
}

/// Parse a numeric attribute, falling back to `default` when absent or
/// malformed.
pub fn number_or(name: &str, value: Option<&str>, default: f64) -> f64 {
    match value {
        Some(raw) => match parse_number(name, raw) {
            Ok(n) => n,
            Err(err) => {
                tracing::debug!(%err, default, "using default for malformed attribute");
                default
            }
        },
        None => default,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = PageConfig::default();
        assert_eq!(config.visibility_threshold, 0.1);
        assert_eq!(config.root_margin_bottom, -100.0);
        assert_eq!(config.background_threshold, 50);
        assert_eq!(config.shadow_threshold, 100);
        assert_eq!(config.section_lookahead, 200.0);
        assert_eq!(config.scroll_debounce(), Duration::from_millis(100));
        assert_eq!(config.resize_debounce(), Duration::from_millis(250));
    }

    #[test]
    fn test_reveal_transition() {
        assert_eq!(PageConfig::default().reveal_transition(), "all 0.6s ease-out");
    }

    #[test]
    fn test_threshold_clamped() {
        assert_eq!(PageConfig::default().with_visibility_threshold(3.0).threshold(), 1.0);
        assert_eq!(PageConfig::default().with_visibility_threshold(-1.0).threshold(), 0.0);
        assert_eq!(
            PageConfig::default().with_visibility_threshold(f64::NAN).threshold(),
            VISIBILITY_THRESHOLD
        );
    }

    #[test]
    fn test_number_or_falls_back() {
        assert_eq!(number_or("data-parallax", Some(" 2.5 "), 1.0), 2.5);
        assert_eq!(number_or("data-parallax", Some("fast"), 1.0), 1.0);
        assert_eq!(number_or("data-parallax", Some("inf"), 1.0), 1.0);
        assert_eq!(number_or("data-parallax", None, 1.0), 1.0);
    }

    #[test]
    fn test_parse_number_reports_attribute() {
        let err = parse_number("data-parallax", "abc").unwrap_err();
        assert_eq!(
            err,
            PageError::InvalidAttribute {
                name: "data-parallax".into(),
                value: "abc".into()
            }
        );
    }
}
