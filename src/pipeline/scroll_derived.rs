//! Scroll Derived - Presentation values derived from the scroll state.
//!
//! Creates Deriveds that recompute whenever the `ScrollState` signal changes:
//! - the header tier
//! - the active section id
//!
//! Both are pure; the presenter effect in `mount` is the only place that
//! writes to the page.

use spark_signals::{derived, Derived, Signal};

use crate::types::{HeaderTier, ScrollState};

/// Create the header tier derived.
pub fn create_tier_derived(state: Signal<ScrollState>) -> Derived<HeaderTier> {
    derived(move || HeaderTier::for_state(&state.get()))
}

/// Create the active section derived.
pub fn create_active_section_derived(
    state: Signal<ScrollState>,
) -> Derived<Option<String>> {
    derived(move || state.get().active_section_id)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use spark_signals::signal;

    #[test]
    fn test_tier_follows_state() {
        let state = signal(ScrollState::default());
        let tier = create_tier_derived(state.clone());
        assert_eq!(tier.get(), HeaderTier::Resting);

        state.set(ScrollState {
            offset: 120,
            direction: Direction::Down,
            past_threshold: true,
            past_shadow_threshold: true,
            active_section_id: None,
        });
        assert_eq!(tier.get(), HeaderTier::ScrolledHeavy);
    }

    #[test]
    fn test_active_section_follows_state() {
        let state = signal(ScrollState::default());
        let active = create_active_section_derived(state.clone());
        assert_eq!(active.get(), None);

        state.set(ScrollState {
            active_section_id: Some("team".to_string()),
            ..ScrollState::default()
        });
        assert_eq!(active.get().as_deref(), Some("team"));
    }
}
