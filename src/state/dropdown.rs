//! Dropdown Module - Navigation dropdown menus
//!
//! Every `.nav-item` that contains a `.dropdown` is bound in one of two modes,
//! chosen from the viewport width when bound:
//!
//! - [`DropdownMode::Hover`] (wider than the mobile breakpoint): pointer enter
//!   shows the menu, pointer leave hides it.
//! - [`DropdownMode::Click`] (at or below the breakpoint): clicking the item's
//!   `.nav-link` toggles the menu's `display`.
//!
//! A resize re-binds, so the mode always follows the latest width.

use super::keys::close_mobile_nav;
use crate::page::Page;
use crate::types::{ElementId, Viewport};

pub const NAV_ITEM_SELECTOR: &str = ".nav-item";
pub const MENU_SELECTOR: &str = ".dropdown";
pub const TRIGGER_SELECTOR: &str = ".nav-link";

const SHOWN: [(&str, &str); 3] = [
    ("opacity", "1"),
    ("visibility", "visible"),
    ("transform", "translateY(0)"),
];
const HIDDEN: [(&str, &str); 3] = [
    ("opacity", "0"),
    ("visibility", "hidden"),
    ("transform", "translateY(-10px)"),
];

/// How dropdowns open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownMode {
    Hover,
    Click,
}

impl DropdownMode {
    pub fn for_width(width: f64, breakpoint: f64) -> Self {
        if width > breakpoint {
            Self::Hover
        } else {
            Self::Click
        }
    }
}

/// A nav item with its menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dropdown {
    pub item: ElementId,
    pub menu: ElementId,
    /// The item's `.nav-link`, if any. Only used in click mode.
    pub trigger: Option<ElementId>,
}

/// Owns the dropdown bindings for one page.
#[derive(Debug)]
pub struct DropdownController {
    dropdowns: Vec<Dropdown>,
    mode: DropdownMode,
    breakpoint: f64,
}

impl DropdownController {
    /// Find every dropdown and bind for the current viewport.
    pub fn bind(page: &dyn Page, breakpoint: f64) -> Self {
        let dropdowns: Vec<Dropdown> = page
            .query_all(NAV_ITEM_SELECTOR)
            .into_iter()
            .filter_map(|item| {
                let menu = page.query_within(item, MENU_SELECTOR).into_iter().next()?;
                let trigger = page.query_within(item, TRIGGER_SELECTOR).into_iter().next();
                Some(Dropdown { item, menu, trigger })
            })
            .collect();
        let mode = DropdownMode::for_width(page.viewport().width, breakpoint);
        tracing::debug!(count = dropdowns.len(), ?mode, "dropdowns bound");
        Self {
            dropdowns,
            mode,
            breakpoint,
        }
    }

    pub fn mode(&self) -> DropdownMode {
        self.mode
    }

    pub fn dropdowns(&self) -> &[Dropdown] {
        &self.dropdowns
    }

    /// Re-bind for `viewport`, closing the mobile nav when it grew past the
    /// breakpoint. Returns true if the nav was closed.
    pub fn on_resize(&mut self, page: &dyn Page, viewport: Viewport) -> bool {
        let closed = viewport.width > self.breakpoint && close_mobile_nav(page);
        *self = Self::bind(page, self.breakpoint);
        closed
    }

    fn by_item(&self, item: ElementId) -> Option<&Dropdown> {
        self.dropdowns.iter().find(|d| d.item == item)
    }

    /// Pointer entered `item`. Returns true if a menu was shown.
    pub fn pointer_enter(&self, page: &dyn Page, item: ElementId) -> bool {
        self.hover(page, item, &SHOWN)
    }

    /// Pointer left `item`. Returns true if a menu was hidden.
    pub fn pointer_leave(&self, page: &dyn Page, item: ElementId) -> bool {
        self.hover(page, item, &HIDDEN)
    }

    fn hover(&self, page: &dyn Page, item: ElementId, declarations: &[(&str, &str)]) -> bool {
        if self.mode != DropdownMode::Hover {
            return false;
        }
        let Some(dropdown) = self.by_item(item) else {
            return false;
        };
        for (property, value) in declarations {
            page.set_style(dropdown.menu, property, value);
        }
        true
    }

    /// Click on `element`. Toggles the menu when `element` is a trigger in
    /// click mode; the return value says whether the default must be
    /// prevented.
    pub fn click(&self, page: &dyn Page, element: ElementId) -> bool {
        if self.mode != DropdownMode::Click {
            return false;
        }
        let Some(dropdown) = self.dropdowns.iter().find(|d| d.trigger == Some(element)) else {
            return false;
        };
        let open = page.style(dropdown.menu, "display").as_deref() == Some("block");
        page.set_style(dropdown.menu, "display", if open { "none" } else { "block" });
        true
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ElementSpec, MemoryPage};
    use crate::state::keys::{MAIN_NAV_ID, NAV_OPEN_CLASS};

    struct Fixture {
        page: MemoryPage,
        item: ElementId,
        trigger: ElementId,
        menu: ElementId,
        plain: ElementId,
    }

    fn setup(width: f64) -> Fixture {
        let page = MemoryPage::new(width, 800.0);
        let nav = page.append_to_body(ElementSpec::new("nav").id(MAIN_NAV_ID));
        let item = page.append(nav, ElementSpec::new("li").class("nav-item"));
        let trigger = page.append(item, ElementSpec::link("nav-link", "#research"));
        let menu = page.append(item, ElementSpec::new("ul").class("dropdown"));
        page.append(menu, ElementSpec::link("dropdown-item", "#projects"));
        let plain = page.append(nav, ElementSpec::new("li").class("nav-item"));
        page.append(plain, ElementSpec::link("nav-link", "#team"));
        Fixture {
            page,
            item,
            trigger,
            menu,
            plain,
        }
    }

    #[test]
    fn test_bind_skips_items_without_menu() {
        let f = setup(1200.0);
        let controller = DropdownController::bind(&f.page, 768.0);
        assert_eq!(
            controller.dropdowns(),
            &[Dropdown {
                item: f.item,
                menu: f.menu,
                trigger: Some(f.trigger),
            }]
        );
        assert_eq!(controller.mode(), DropdownMode::Hover);
    }

    #[test]
    fn test_mode_boundary() {
        assert_eq!(DropdownMode::for_width(769.0, 768.0), DropdownMode::Hover);
        assert_eq!(DropdownMode::for_width(768.0, 768.0), DropdownMode::Click);
    }

    #[test]
    fn test_hover_show_hide() {
        let f = setup(1200.0);
        let controller = DropdownController::bind(&f.page, 768.0);

        assert!(controller.pointer_enter(&f.page, f.item));
        assert_eq!(f.page.style(f.menu, "opacity").as_deref(), Some("1"));
        assert_eq!(f.page.style(f.menu, "visibility").as_deref(), Some("visible"));

        assert!(controller.pointer_leave(&f.page, f.item));
        assert_eq!(f.page.style(f.menu, "opacity").as_deref(), Some("0"));
        assert_eq!(
            f.page.style(f.menu, "transform").as_deref(),
            Some("translateY(-10px)")
        );

        assert!(!controller.pointer_enter(&f.page, f.plain));
        assert!(!controller.click(&f.page, f.trigger));
    }

    #[test]
    fn test_click_toggles_on_mobile() {
        let f = setup(400.0);
        let controller = DropdownController::bind(&f.page, 768.0);
        assert_eq!(controller.mode(), DropdownMode::Click);

        assert!(controller.click(&f.page, f.trigger));
        assert_eq!(f.page.style(f.menu, "display").as_deref(), Some("block"));
        assert!(controller.click(&f.page, f.trigger));
        assert_eq!(f.page.style(f.menu, "display").as_deref(), Some("none"));

        assert!(!controller.pointer_enter(&f.page, f.item));
        assert!(!controller.click(&f.page, f.menu));
    }

    #[test]
    fn test_resize_rebinds_and_closes_nav() {
        let f = setup(400.0);
        let nav = f.page.element_by_id(MAIN_NAV_ID).unwrap();
        f.page.set_class(nav, NAV_OPEN_CLASS, true);
        let mut controller = DropdownController::bind(&f.page, 768.0);

        // Still mobile: nav stays open.
        assert!(!controller.on_resize(&f.page, Viewport::new(500.0, 800.0)));
        assert!(f.page.has_class(nav, NAV_OPEN_CLASS));

        f.page.set_viewport(1024.0, 800.0);
        assert!(controller.on_resize(&f.page, Viewport::new(1024.0, 800.0)));
        assert!(!f.page.has_class(nav, NAV_OPEN_CLASS));
        assert_eq!(controller.mode(), DropdownMode::Hover);
    }
}
