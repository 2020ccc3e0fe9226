//! End-to-end scenarios against an in-memory lab page.

use std::rc::Rc;
use std::time::Duration;

use spark_page::state::clipboard::{BufferClipboard, COPIED_MESSAGE};
use spark_page::state::dropdown::DropdownMode;
use spark_page::state::forms::{FieldMap, RequiredFields, INCOMPLETE_MESSAGE, SUBMITTED_MESSAGE};
use spark_page::state::keys::{KeyAction, KeyboardEvent, Modifiers, NAV_OPEN_CLASS};
use spark_page::state::notify::{NotificationKind, NotificationLog};
use spark_page::{
    mount_polling, Collaborators, Direction, ElementId, ElementSpec, HeaderTier, ManualScheduler,
    MemoryPage, MountHandle, Page, PageConfig, PageError,
};

struct Lab {
    page: Rc<MemoryPage>,
    scheduler: Rc<ManualScheduler>,
    nav: ElementId,
    links: Vec<ElementId>,
    cards: Vec<ElementId>,
    dropdown_trigger: ElementId,
    dropdown_menu: ElementId,
    search: ElementId,
}

/// Fixed header with the main nav, then home/about/team sections of 800px.
/// Each section holds a 400px intro and a 200px card.
fn setup() -> Lab {
    let page = Rc::new(MemoryPage::new(1200.0, 800.0));
    let header = page.append_to_body(ElementSpec::new("header").fixed().height(70.0));
    let nav = page.append(header, ElementSpec::new("nav").id("mainNav"));

    let mut links = Vec::new();
    let mut dropdown = None;
    for id in ["home", "about", "team"] {
        let item = page.append(nav, ElementSpec::new("li").class("nav-item"));
        let link = page.append(item, ElementSpec::link("nav-link", &format!("#{id}")));
        links.push(link);
        if id == "about" {
            let menu = page.append(item, ElementSpec::new("ul").class("dropdown"));
            page.append(menu, ElementSpec::link("dropdown-item", "#team"));
            dropdown = Some((link, menu));
        }
    }
    let search = page.append(header, ElementSpec::new("input").attr("type", "search"));

    let mut cards = Vec::new();
    for id in ["home", "about", "team"] {
        let section = page.append_to_body(ElementSpec::new("section").id(id).height(800.0));
        page.append(section, ElementSpec::new("div").height(400.0));
        cards.push(page.append(section, ElementSpec::new("div").class("member-card").height(200.0)));
    }

    let (dropdown_trigger, dropdown_menu) = dropdown.unwrap();
    Lab {
        page,
        scheduler: Rc::new(ManualScheduler::new()),
        nav,
        links,
        cards,
        dropdown_trigger,
        dropdown_menu,
        search,
    }
}

fn mount_lab(lab: &Lab) -> MountHandle<MemoryPage> {
    mount_polling(lab.page.clone(), lab.scheduler.clone(), PageConfig::default())
}

fn scroll(lab: &Lab, handle: &MountHandle<MemoryPage>, offset: f64) {
    lab.page.scroll_to(offset, false);
    handle.on_scroll();
    lab.scheduler.advance(Duration::from_millis(100));
}

// =============================================================================
// Scroll state
// =============================================================================

#[test]
fn active_section_uses_lookahead() {
    let lab = setup();
    let handle = mount_lab(&lab);

    scroll(&lab, &handle, 650.0);
    assert_eq!(handle.state().active_section_id.as_deref(), Some("about"));
    assert_eq!(handle.active_link(), Some(lab.links[1]));

    // 550 + 200 stays short of the about section's top.
    scroll(&lab, &handle, 550.0);
    assert_eq!(handle.state().active_section_id.as_deref(), Some("home"));
    assert_eq!(handle.active_link(), Some(lab.links[0]));
    assert!(!lab.page.has_class(lab.links[1], "active"));
}

#[test]
fn header_tiers_follow_direction() {
    let lab = setup();
    let handle = mount_lab(&lab);
    let header = lab.page.query("header").unwrap();
    assert_eq!(handle.header_tier(), Some(HeaderTier::Resting));

    scroll(&lab, &handle, 120.0);
    assert_eq!(handle.state().direction, Direction::Down);
    assert_eq!(handle.header_tier(), Some(HeaderTier::ScrolledHeavy));
    assert_eq!(
        lab.page.style(header, "box-shadow").as_deref(),
        Some("0 4px 12px rgba(0, 0, 0, 0.1)")
    );

    scroll(&lab, &handle, 90.0);
    assert_eq!(handle.state().direction, Direction::Up);
    assert_eq!(handle.header_tier(), Some(HeaderTier::Elevated));
    assert_eq!(lab.page.style(header, "backdrop-filter").as_deref(), Some("blur(10px)"));

    scroll(&lab, &handle, 10.0);
    assert_eq!(handle.header_tier(), Some(HeaderTier::Resting));
}

#[test]
fn equal_offset_keeps_direction() {
    let lab = setup();
    let handle = mount_lab(&lab);

    scroll(&lab, &handle, 300.0);
    scroll(&lab, &handle, 300.0);
    assert_eq!(handle.state().direction, Direction::Down);
    assert_eq!(handle.scroll_runs(), 2);
}

#[test]
fn signal_subscribers_see_every_tick() {
    let lab = setup();
    let handle = mount_lab(&lab);
    let state = handle.state_signal();

    scroll(&lab, &handle, 1600.0);
    assert_eq!(state.get().offset, 1600);
    assert_eq!(state.get().active_section_id.as_deref(), Some("team"));
}

#[test]
fn section_layout_is_read_on_every_tick() {
    let lab = setup();
    let handle = mount_lab(&lab);

    scroll(&lab, &handle, 650.0);
    assert_eq!(handle.state().active_section_id.as_deref(), Some("about"));

    // Home grows (late images), pushing about below 650 + 200.
    let home = lab.page.element_by_id("home").unwrap();
    lab.page.set_height(home, 1200.0);
    handle.tick();

    assert_eq!(handle.state().offset, 650);
    assert_eq!(handle.state().active_section_id.as_deref(), Some("home"));
    assert_eq!(handle.active_link(), Some(lab.links[0]));
    assert!(!lab.page.has_class(lab.links[1], "active"));
}

#[test]
fn frame_coalesced_scroll_ticks_once() {
    let lab = setup();
    let config = PageConfig::default().with_scroll_on_frame(true);
    let handle = mount_polling(lab.page.clone(), lab.scheduler.clone(), config);

    for offset in [100.0, 300.0, 700.0] {
        lab.page.scroll_to(offset, false);
        handle.on_scroll();
    }
    assert_eq!(lab.scheduler.pending(), 1);
    assert_eq!(handle.scroll_runs(), 0);

    assert_eq!(lab.scheduler.run_frame(), 1);
    assert_eq!(handle.scroll_runs(), 1);
    assert_eq!(handle.state().offset, 700);
    assert_eq!(handle.state().active_section_id.as_deref(), Some("about"));
    assert_eq!(handle.header_tier(), Some(HeaderTier::ScrolledHeavy));
    assert_eq!(lab.scheduler.run_frame(), 0);
}

// =============================================================================
// Reveal
// =============================================================================

#[test]
fn never_visible_card_stays_hidden() {
    let lab = setup();
    let handle = mount_lab(&lab);

    scroll(&lab, &handle, 650.0);
    assert!(handle.is_revealed(lab.cards[1]));
    assert!(!handle.is_revealed(lab.cards[2]));
    assert!(handle.is_watching(lab.cards[2]));
    assert_eq!(lab.page.style(lab.cards[2], "opacity").as_deref(), Some("0"));
    assert_eq!(handle.revealed_count(), 2);
}

#[test]
fn revealed_cards_never_hide_again() {
    let lab = setup();
    let handle = mount_lab(&lab);

    for offset in [1600.0, 0.0, 900.0, 0.0] {
        scroll(&lab, &handle, offset);
    }
    for &card in &lab.cards {
        assert!(handle.is_revealed(card));
        assert!(!handle.is_watching(card));
        assert_eq!(lab.page.style(card, "transform").as_deref(), Some("translateY(0)"));
    }
}

// =============================================================================
// Interaction
// =============================================================================

#[test]
fn nav_click_scrolls_to_section() {
    let lab = setup();
    let handle = mount_lab(&lab);

    assert!(handle.on_click(lab.links[2]));
    assert_eq!(lab.page.scroll_calls().last(), Some(&(1600.0, true)));

    handle.on_scroll();
    handle.flush();
    assert_eq!(handle.state().active_section_id.as_deref(), Some("team"));
}

#[test]
fn escape_closes_mobile_nav() {
    let lab = setup();
    let handle = mount_lab(&lab);
    lab.page.set_class(lab.nav, NAV_OPEN_CLASS, true);

    let action = handle.on_key(&KeyboardEvent::new("Escape"));
    assert_eq!(action, KeyAction::CloseNav { closed: true });
    assert!(!lab.page.has_class(lab.nav, NAV_OPEN_CLASS));

    let again = handle.on_key(&KeyboardEvent::new("Escape"));
    assert_eq!(again, KeyAction::CloseNav { closed: false });
}

#[test]
fn command_k_focuses_search() {
    let lab = setup();
    let handle = mount_lab(&lab);

    let action = handle.on_key(&KeyboardEvent::with_modifiers("k", Modifiers::ctrl()));
    assert_eq!(action, KeyAction::FocusSearch { focused: true });
    assert!(action.prevents_default());
    assert_eq!(lab.page.focused(), Some(lab.search));

    assert_eq!(handle.on_key(&KeyboardEvent::new("k")), KeyAction::Ignored);
}

#[test]
fn resize_switches_dropdown_mode() {
    let lab = setup();
    let handle = mount_lab(&lab);
    assert_eq!(handle.dropdown_mode(), DropdownMode::Hover);

    lab.page.set_viewport(600.0, 800.0);
    handle.on_resize();
    assert_eq!(handle.dropdown_mode(), DropdownMode::Hover);
    lab.scheduler.advance(Duration::from_millis(250));
    assert_eq!(handle.dropdown_mode(), DropdownMode::Click);

    // Click mode toggles the menu and swallows the navigation.
    assert!(handle.on_click(lab.dropdown_trigger));
    assert_eq!(lab.page.style(lab.dropdown_menu, "display").as_deref(), Some("block"));
    assert!(handle.on_click(lab.dropdown_trigger));
    assert_eq!(lab.page.style(lab.dropdown_menu, "display").as_deref(), Some("none"));
    assert_eq!(lab.page.scroll_calls(), Vec::new());

    // Growing past the breakpoint closes the open mobile nav.
    lab.page.set_class(lab.nav, NAV_OPEN_CLASS, true);
    lab.page.set_viewport(1200.0, 800.0);
    handle.on_resize();
    handle.flush();
    assert_eq!(handle.dropdown_mode(), DropdownMode::Hover);
    assert!(!lab.page.has_class(lab.nav, NAV_OPEN_CLASS));
}

#[test]
fn collaborators_receive_copy_and_submit() {
    let lab = setup();
    let button = lab
        .page
        .append_to_body(ElementSpec::new("button").attr("data-copy", "doi:10.1000/182"));
    let log = Rc::new(NotificationLog::new());
    let handle = mount_lab(&lab).with_collaborators(Collaborators {
        clipboard: Box::new(BufferClipboard),
        notifier: log.clone(),
        validator: Box::new(RequiredFields),
    });

    assert!(!handle.on_click(button));
    assert_eq!(BufferClipboard::contents().as_deref(), Some("doi:10.1000/182"));
    assert_eq!(
        log.last(),
        Some((COPIED_MESSAGE.to_string(), NotificationKind::Success))
    );

    let mut fields = FieldMap::new();
    fields.insert("name".to_string(), "Ada".to_string());
    fields.insert("email".to_string(), "  ".to_string());
    let err = handle.on_submit(fields.clone()).unwrap_err();
    assert!(matches!(err, PageError::Rejected(_)));
    assert_eq!(log.last(), Some((INCOMPLETE_MESSAGE.to_string(), NotificationKind::Error)));

    fields.insert("email".to_string(), "ada@lab.org".to_string());
    assert_eq!(handle.on_submit(fields.clone()).unwrap(), fields);
    assert_eq!(log.last(), Some((SUBMITTED_MESSAGE.to_string(), NotificationKind::Success)));
    assert_eq!(log.entries().len(), 3);
}

#[test]
fn counter_runs_on_frames() {
    let lab = setup();
    let stat = lab.page.append_to_body(ElementSpec::new("span").class("stat-number"));
    let handle = mount_lab(&lab);

    let _stop = handle.animate_counter(stat, 100.0, Duration::from_millis(160));
    assert_eq!(lab.page.text(stat).as_deref(), Some("10"));
    while lab.scheduler.run_frame() > 0 {}
    assert_eq!(lab.page.text(stat).as_deref(), Some("100"));
}

#[test]
fn parallax_follows_pointer() {
    let lab = setup();
    let layer = lab
        .page
        .append_to_body(ElementSpec::new("div").attr("data-parallax", "2"));
    let handle = mount_lab(&lab);

    handle.on_pointer_move(100.0, 200.0);
    // ((1200 - 200) / 100, (800 - 400) / 100)
    assert_eq!(lab.page.style(layer, "transform").as_deref(), Some("translate(10px, 4px)"));
}

#[test]
fn cards_tilt_under_pointer() {
    let lab = setup();
    let handle = mount_lab(&lab);

    // Card 0 sits at 0..1200 x 400..600 in the viewport.
    assert!(handle.on_card_pointer_move(lab.cards[0], 1200.0, 400.0));
    assert_eq!(
        lab.page.style(lab.cards[0], "transform").as_deref(),
        Some("perspective(1000px) rotateX(-10deg) rotateY(-60deg)")
    );

    assert!(handle.on_pointer_leave(lab.cards[0]));
    assert_eq!(
        lab.page.style(lab.cards[0], "transform").as_deref(),
        Some("perspective(1000px) rotateX(0) rotateY(0)")
    );
    assert!(!handle.on_card_pointer_move(lab.links[0], 10.0, 10.0));
}

#[test]
fn modal_locks_page_scroll() {
    let lab = setup();
    let modal = lab.page.append_to_body(ElementSpec::new("div").id("citeModal"));
    let handle = mount_lab(&lab);
    let body = lab.page.body();

    assert!(handle.open_modal("citeModal"));
    assert_eq!(lab.page.style(modal, "display").as_deref(), Some("flex"));
    assert_eq!(lab.page.style(body, "overflow").as_deref(), Some("hidden"));

    assert!(handle.close_modal("citeModal"));
    assert_eq!(lab.page.style(modal, "display").as_deref(), Some("none"));
    assert_eq!(lab.page.style(body, "overflow").as_deref(), Some("auto"));

    assert!(!handle.open_modal("missing"));
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn unmount_drops_pending_work() {
    let lab = setup();
    let handle = mount_lab(&lab);

    lab.page.scroll_to(900.0, false);
    handle.on_scroll();
    lab.page.set_viewport(600.0, 800.0);
    handle.on_resize();
    assert_eq!(lab.scheduler.pending(), 2);

    handle.unmount();
    assert_eq!(lab.scheduler.pending(), 0);
    lab.scheduler.advance(Duration::from_secs(1));
    assert!(!lab.page.has_class(lab.links[1], "active"));
}

#[test]
fn page_without_header_or_sections_mounts() {
    let page = Rc::new(MemoryPage::new(1200.0, 800.0));
    page.append_to_body(ElementSpec::new("div").height(3000.0));
    let scheduler = Rc::new(ManualScheduler::new());
    let handle = mount_polling(page.clone(), scheduler.clone(), PageConfig::default());

    page.scroll_to(400.0, false);
    handle.on_scroll();
    scheduler.advance(Duration::from_millis(100));

    assert_eq!(handle.state().offset, 400);
    assert_eq!(handle.state().active_section_id, None);
    assert_eq!(handle.header_tier(), None);
    assert_eq!(handle.active_link(), None);
}
