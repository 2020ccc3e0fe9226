//! Scroll State Module - Pure scroll-state reduction
//!
//! Turns raw scroll samples into the discrete state the presenters consume:
//! - Direction (down / up, unchanged on a tie)
//! - Header thresholds (background at >50px, heavy shadow at >100px)
//! - Active section (last section in document order whose top is at or above
//!   the offset plus a 200px lookahead)
//!
//! The reducer never touches the page. Section layout is read by the caller
//! on every tick and passed in, so content that changes height is never
//! stale.

use crate::config::PageConfig;
use crate::types::{Direction, ScrollSample, ScrollState, SectionDescriptor};

// =============================================================================
// SCROLL CONSTANTS
// =============================================================================

/// Reducer thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollThresholds {
    pub background: u32,
    pub shadow: u32,
    pub lookahead: f64,
}

impl Default for ScrollThresholds {
    fn default() -> Self {
        Self::from_config(&PageConfig::default())
    }
}

impl ScrollThresholds {
    pub fn from_config(config: &PageConfig) -> Self {
        Self {
            background: config.background_threshold,
            shadow: config.shadow_threshold,
            lookahead: config.section_lookahead,
        }
    }
}

// =============================================================================
// ACTIVE SECTION
// =============================================================================

/// Id of the last section (in the given order) whose top is at or above
/// `offset + lookahead`.
pub fn active_section(sections: &[SectionDescriptor], offset: u32, lookahead: f64) -> Option<&str> {
    let line = offset as f64 + lookahead;
    sections
        .iter()
        .rev()
        .find(|s| s.top <= line)
        .map(|s| s.id.as_str())
}

// =============================================================================
// REDUCER
// =============================================================================

/// Owns the scroll state and the previous offset between ticks.
#[derive(Debug, Clone, Default)]
pub struct ScrollReducer {
    thresholds: ScrollThresholds,
    previous_offset: u32,
    state: ScrollState,
}

impl ScrollReducer {
    pub fn new(thresholds: ScrollThresholds) -> Self {
        Self {
            thresholds,
            previous_offset: 0,
            state: ScrollState::default(),
        }
    }

    /// Fold one sample into the state.
    pub fn reduce(&mut self, sample: ScrollSample, sections: &[SectionDescriptor]) -> &ScrollState {
        let offset = sample.offset;

        let direction = if offset > self.previous_offset {
            Direction::Down
        } else if offset < self.previous_offset {
            Direction::Up
        } else {
            self.state.direction
        };

        self.state = ScrollState {
            offset,
            direction,
            past_threshold: offset > self.thresholds.background,
            past_shadow_threshold: offset > self.thresholds.shadow,
            active_section_id: active_section(sections, offset, self.thresholds.lookahead)
                .map(str::to_string),
        };
        self.previous_offset = offset;

        &self.state
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn previous_offset(&self) -> u32 {
        self.previous_offset
    }

    pub fn thresholds(&self) -> ScrollThresholds {
        self.thresholds
    }
}

// =============================================================================
// Tests
// =============================================================================
