//! Header Presenter - Sticky header treatment
//!
//! Maps the derived [`ScrollState`] to one of three header tiers and writes
//! the matching background, blur and shadow. Applying the same state twice
//! leaves the header unchanged, so this is safe to call on every tick.

use crate::page::Page;
use crate::types::{ElementId, HeaderStyle, HeaderTier, ScrollState};

/// Background once the header leaves the resting tier.
pub const ELEVATED_BACKGROUND: &str = "rgba(255, 255, 255, 0.95)";
pub const BLUR_FILTER: &str = "blur(10px)";
/// Light shadow, used while elevated or scrolling up.
pub const LIGHT_SHADOW: &str = "0 2px 8px rgba(0, 0, 0, 0.06)";
/// Heavy shadow, used while scrolling down past the shadow threshold.
pub const HEAVY_SHADOW: &str = "0 4px 12px rgba(0, 0, 0, 0.1)";

/// CSS declarations for a style set, in write order.
pub fn declarations(style: HeaderStyle) -> [(&'static str, &'static str); 3] {
    let background = if style.contains(HeaderStyle::BACKGROUND) {
        ELEVATED_BACKGROUND
    } else {
        "transparent"
    };
    let blur = if style.contains(HeaderStyle::BLUR) {
        BLUR_FILTER
    } else {
        "none"
    };
    let shadow = if style.contains(HeaderStyle::HEAVY_SHADOW) {
        HEAVY_SHADOW
    } else if style.contains(HeaderStyle::SHADOW) {
        LIGHT_SHADOW
    } else {
        "none"
    };
    [
        ("background-color", background),
        ("backdrop-filter", blur),
        ("box-shadow", shadow),
    ]
}

/// Applies header tiers to one header element.
#[derive(Debug, Default)]
pub struct HeaderPresenter {
    header: Option<ElementId>,
    applied: Option<HeaderTier>,
}

impl HeaderPresenter {
    /// Presenter for `header`. `None` makes every apply a no-op.
    pub fn new(header: Option<ElementId>) -> Self {
        Self {
            header,
            applied: None,
        }
    }

    /// Locate the page's `header` element.
    pub fn find(page: &dyn Page) -> Self {
        let header = page.query("header");
        if header.is_none() {
            tracing::debug!("no header element; header presenter disabled");
        }
        Self::new(header)
    }

    /// Apply the tier for `state`. Returns the tier now shown.
    pub fn apply(&mut self, page: &dyn Page, state: &ScrollState) -> HeaderTier {
        self.show(page, HeaderTier::for_state(state))
    }

    /// Apply `tier` directly. Writes nothing if it is already shown.
    pub fn show(&mut self, page: &dyn Page, tier: HeaderTier) -> HeaderTier {
        let Some(header) = self.header else {
            return tier;
        };
        if self.applied == Some(tier) {
            return tier;
        }

        for (property, value) in declarations(tier.style()) {
            page.set_style(header, property, value);
        }
        for other in HeaderTier::ALL {
            page.set_class(header, other.class_name(), other == tier);
        }

        tracing::trace!(?tier, "header tier changed");
        self.applied = Some(tier);
        tier
    }

    /// Tier last written to the page.
    pub fn applied(&self) -> Option<HeaderTier> {
        self.applied
    }

    pub fn header(&self) -> Option<ElementId> {
        self.header
    }

    /// Forget the applied tier so the next apply rewrites the header.
    pub fn invalidate(&mut self) {
        self.applied = None;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ElementSpec, MemoryPage};
    use crate::types::Direction;

    fn state(offset: u32, direction: Direction) -> ScrollState {
        ScrollState {
            offset,
            direction,
            past_threshold: offset > 50,
            past_shadow_threshold: offset > 100,
            active_section_id: None,
        }
    }

    fn setup() -> (MemoryPage, HeaderPresenter) {
        let page = MemoryPage::new(1200.0, 800.0);
        page.append_to_body(ElementSpec::new("header").fixed().height(70.0));
        let presenter = HeaderPresenter::find(&page);
        (page, presenter)
    }

    fn shadow(page: &MemoryPage, presenter: &HeaderPresenter) -> Option<String> {
        page.style(presenter.header().unwrap(), "box-shadow")
    }

    #[test]
    fn test_resting_at_top() {
        let (page, mut presenter) = setup();
        assert_eq!(presenter.apply(&page, &state(0, Direction::Up)), HeaderTier::Resting);
        assert_eq!(shadow(&page, &presenter).as_deref(), Some("none"));
        let header = presenter.header().unwrap();
        assert!(page.has_class(header, "header--resting"));
        assert_eq!(page.style(header, "background-color").as_deref(), Some("transparent"));
    }

    #[test]
    fn test_direction_sensitive_downgrade() {
        let (page, mut presenter) = setup();

        let tier = presenter.apply(&page, &state(120, Direction::Down));
        assert_eq!(tier, HeaderTier::ScrolledHeavy);
        assert_eq!(shadow(&page, &presenter).as_deref(), Some(HEAVY_SHADOW));

        let tier = presenter.apply(&page, &state(90, Direction::Up));
        assert_eq!(tier, HeaderTier::Elevated);
        assert_eq!(shadow(&page, &presenter).as_deref(), Some(LIGHT_SHADOW));

        let header = presenter.header().unwrap();
        assert!(page.has_class(header, "header--elevated"));
        assert!(!page.has_class(header, "header--scrolled-heavy"));
    }

    #[test]
    fn test_idempotent() {
        let (page, mut presenter) = setup();
        let s = state(300, Direction::Down);

        let first = presenter.apply(&page, &s);
        let snapshot = page.attribute(presenter.header().unwrap(), "class");
        let second = presenter.apply(&page, &s);

        assert_eq!(first, second);
        assert_eq!(page.attribute(presenter.header().unwrap(), "class"), snapshot);
        assert_eq!(presenter.applied(), Some(HeaderTier::ScrolledHeavy));
    }

    #[test]
    fn test_missing_header_is_noop() {
        let page = MemoryPage::new(1200.0, 800.0);
        let mut presenter = HeaderPresenter::find(&page);
        assert_eq!(presenter.header(), None);
        assert_eq!(presenter.apply(&page, &state(500, Direction::Down)), HeaderTier::ScrolledHeavy);
        assert_eq!(presenter.applied(), None);
    }

    #[test]
    fn test_declarations() {
        assert_eq!(declarations(HeaderStyle::NONE)[2], ("box-shadow", "none"));
        assert_eq!(
            declarations(HeaderTier::Elevated.style()),
            [
                ("background-color", ELEVATED_BACKGROUND),
                ("backdrop-filter", BLUR_FILTER),
                ("box-shadow", LIGHT_SHADOW),
            ]
        );
    }
}
