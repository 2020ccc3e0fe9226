//! Mount API - Page coordinator lifecycle and presenter effect.
//!
//! `mount` scans the page once, hides every reveal target, binds dropdowns
//! and sets up the one presenter effect that keeps the header and nav links
//! in step with the `ScrollState` signal. The returned [`MountHandle`] is the
//! only way in afterwards: the host forwards scroll, resize, key, click and
//! pointer events to it.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_page::config::PageConfig;
//! use spark_page::pipeline::mount;
//! use spark_page::scheduler::ManualScheduler;
//!
//! let handle = mount::mount_polling(page.clone(), scheduler.clone(), PageConfig::default());
//!
//! // From the host's scroll listener
//! handle.on_scroll();
//!
//! // Clean up
//! handle.unmount();
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use spark_signals::{effect, signal, Signal};

use super::scroll_derived::{create_active_section_derived, create_tier_derived};
use crate::config::PageConfig;
use crate::error::Result;
use crate::page::{section_layout, Page};
use crate::scheduler::Scheduler;
use crate::state::anchors;
use crate::state::clipboard::{self, BufferClipboard, ClipboardSink};
use crate::state::counter;
use crate::state::dropdown::{DropdownController, DropdownMode};
use crate::state::forms::{self, FieldMap, FormValidator, RequiredFields};
use crate::state::keys::{self, KeyAction, KeyboardEvent};
use crate::state::modal;
use crate::state::notify::{NotificationLog, Notifier};
use crate::state::parallax::ParallaxLayer;
use crate::state::tilt::TiltCards;
use crate::state::{
    Debouncer, HeaderPresenter, NavHighlighter, PollingMonitor, RevealScheduler, RevealStyle,
    ScrollReducer, ScrollThresholds, Timing, VisibilityMonitor, VisibilityOptions,
};
use crate::types::{ElementId, HeaderTier, ScrollSample, ScrollState, Viewport};

// =============================================================================
// Collaborators
// =============================================================================

/// Services the page hands work to.
pub struct Collaborators {
    pub clipboard: Box<dyn ClipboardSink>,
    pub notifier: Rc<dyn Notifier>,
    pub validator: Box<dyn FormValidator>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            clipboard: Box::new(BufferClipboard),
            notifier: Rc::new(NotificationLog::new()),
            validator: Box::new(RequiredFields),
        }
    }
}

// =============================================================================
// Runtime
// =============================================================================

/// State shared between the handle and its deferred operations.
struct Runtime<P: Page> {
    page: Rc<P>,
    scheduler: Rc<dyn Scheduler>,
    config: PageConfig,
    reducer: RefCell<ScrollReducer>,
    state: Signal<ScrollState>,
    monitor: RefCell<Box<dyn VisibilityMonitor>>,
    reveal: Rc<RefCell<RevealScheduler>>,
    header: Rc<RefCell<HeaderPresenter>>,
    nav: Rc<RefCell<NavHighlighter>>,
    dropdowns: RefCell<DropdownController>,
    parallax: ParallaxLayer,
    tilt: TiltCards,
}

impl<P: Page + 'static> Runtime<P> {
    fn sample(&self) -> ScrollSample {
        ScrollSample::from_raw(self.page.scroll_offset(), self.scheduler.now())
    }

    /// One scroll tick: reduce, publish, then re-check visibility.
    fn tick(&self, sample: ScrollSample) {
        let sections = section_layout(&*self.page);
        let next = self.reducer.borrow_mut().reduce(sample, &sections).clone();
        tracing::trace!(
            offset = next.offset,
            direction = ?next.direction,
            active = ?next.active_section_id,
            "scroll tick"
        );
        // Runs the presenter effect synchronously.
        self.state.set(next);
        self.poll_visibility();
    }

    fn poll_visibility(&self) {
        self.monitor.borrow_mut().poll(&*self.page);
        self.retire_revealed();
    }

    /// Stop watching elements that have already been revealed.
    fn retire_revealed(&self) {
        let reveal = self.reveal.borrow();
        let mut monitor = self.monitor.borrow_mut();
        for observed in reveal.observed() {
            if observed.revealed && monitor.is_registered(observed.element) {
                monitor.unregister(observed.element);
            }
        }
    }

    fn resize(&self, viewport: Viewport) {
        let closed = self.dropdowns.borrow_mut().on_resize(&*self.page, viewport);
        tracing::debug!(width = viewport.width, height = viewport.height, closed_nav = closed, "resize");

        // Layout moved; rewrite the header even if the tier is unchanged.
        {
            let mut header = self.header.borrow_mut();
            header.invalidate();
            header.apply(&*self.page, self.reducer.borrow().state());
        }
        self.tick(self.sample());
    }
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`]. Dropping it stops the presenter effect and
/// cancels pending deferrals, same as [`unmount`](Self::unmount).
pub struct MountHandle<P: Page + 'static> {
    runtime: Rc<Runtime<P>>,
    scroll: Debouncer<ScrollSample>,
    resize: Debouncer<Viewport>,
    collaborators: Collaborators,
    stop_effect: Option<Box<dyn FnOnce()>>,
}

impl<P: Page + 'static> MountHandle<P> {
    /// Replace the default collaborators.
    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    // -------------------------------------------------------------------------
    // Event entry points
    // -------------------------------------------------------------------------

    /// The page scrolled. The tick runs after the scroll debounce.
    pub fn on_scroll(&self) {
        self.scroll.call(self.runtime.sample());
    }

    /// The viewport changed size. Re-binding runs after the resize debounce.
    pub fn on_resize(&self) {
        self.resize.call(self.runtime.page.viewport());
    }

    pub fn on_key(&self, event: &KeyboardEvent) -> KeyAction {
        keys::route(&*self.runtime.page, event)
    }

    /// A click on `element`. Returns true if the default action must be
    /// prevented.
    pub fn on_click(&self, element: ElementId) -> bool {
        let page = &*self.runtime.page;

        if self.runtime.dropdowns.borrow().click(page, element) {
            return true;
        }

        if clipboard::copy_from_button(
            page,
            &*self.collaborators.clipboard,
            self.collaborators.notifier.clone(),
            element,
        ) {
            return false;
        }

        let Some(href) = page.attribute(element, "href") else {
            return false;
        };
        if !anchors::handles(&href) {
            return false;
        }
        if self.runtime.config.toggle_sections {
            if let Some(id) = href.strip_prefix('#') {
                anchors::toggle_sections(page, id);
            }
        }
        if let Err(err) = anchors::smooth_scroll_to(page, &href) {
            tracing::debug!(%err, href = %href, "anchor target skipped");
        }
        true
    }

    pub fn on_pointer_enter(&self, element: ElementId) -> bool {
        self.runtime
            .dropdowns
            .borrow()
            .pointer_enter(&*self.runtime.page, element)
    }

    /// The pointer left `element`: hides a hover dropdown or flattens a
    /// tilted card.
    pub fn on_pointer_leave(&self, element: ElementId) -> bool {
        let page = &*self.runtime.page;
        let hidden = self.runtime.dropdowns.borrow().pointer_leave(page, element);
        let flattened = self.runtime.tilt.pointer_leave(page, element);
        hidden || flattened
    }

    /// Pointer at (`x`, `y`) over `card`. Returns true if the card tilted.
    pub fn on_card_pointer_move(&self, card: ElementId, x: f64, y: f64) -> bool {
        self.runtime.tilt.pointer_move(&*self.runtime.page, card, x, y)
    }

    /// Show the modal with id `modal_id` and lock page scrolling.
    pub fn open_modal(&self, modal_id: &str) -> bool {
        modal::open_modal(&*self.runtime.page, modal_id)
    }

    pub fn close_modal(&self, modal_id: &str) -> bool {
        modal::close_modal(&*self.runtime.page, modal_id)
    }

    /// Pointer moved to (`x`, `y`) in viewport coordinates.
    pub fn on_pointer_move(&self, x: f64, y: f64) {
        if !self.runtime.parallax.is_empty() {
            self.runtime.parallax.pointer_move(&*self.runtime.page, x, y);
        }
    }

    /// Validate and submit a form.
    pub fn on_submit(&self, fields: FieldMap) -> Result<FieldMap> {
        forms::submit(
            &*self.collaborators.validator,
            &*self.collaborators.notifier,
            fields,
        )
    }

    /// Count `element`'s text up to `target`. Returns a stop function.
    pub fn animate_counter(&self, element: ElementId, target: f64, duration: Duration) -> Box<dyn FnOnce()> {
        let page: Rc<dyn Page> = self.runtime.page.clone();
        counter::animate_counter(page, self.runtime.scheduler.clone(), element, target, duration)
    }

    /// Run a scroll tick now, dropping any pending debounced one.
    pub fn tick(&self) {
        self.scroll.cancel();
        self.runtime.tick(self.runtime.sample());
    }

    /// Run pending debounced operations now.
    pub fn flush(&self) {
        self.resize.flush();
        self.scroll.flush();
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn page(&self) -> &Rc<P> {
        &self.runtime.page
    }

    pub fn config(&self) -> &PageConfig {
        &self.runtime.config
    }

    /// Current scroll state.
    pub fn state(&self) -> ScrollState {
        self.runtime.state.get()
    }

    /// The reactive scroll state, for hosts that want their own effects.
    pub fn state_signal(&self) -> Signal<ScrollState> {
        self.runtime.state.clone()
    }

    /// Tier last written to the header, if the page has one.
    pub fn header_tier(&self) -> Option<HeaderTier> {
        self.runtime.header.borrow().applied()
    }

    pub fn active_link(&self) -> Option<ElementId> {
        self.runtime.nav.borrow().active()
    }

    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.runtime.reveal.borrow().is_revealed(element)
    }

    pub fn revealed_count(&self) -> usize {
        self.runtime.reveal.borrow().revealed_count()
    }

    /// Whether `element` is still watched for visibility.
    pub fn is_watching(&self, element: ElementId) -> bool {
        self.runtime.monitor.borrow().is_registered(element)
    }

    pub fn dropdown_mode(&self) -> DropdownMode {
        self.runtime.dropdowns.borrow().mode()
    }

    pub fn scroll_runs(&self) -> usize {
        self.scroll.run_count()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Stop the presenter effect and cancel pending deferrals.
    pub fn unmount(mut self) {
        self.teardown();
        tracing::info!("page coordinator unmounted");
    }

    fn teardown(&mut self) {
        self.scroll.cancel();
        self.resize.cancel();
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

impl<P: Page + 'static> Drop for MountHandle<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount the page coordinator.
///
/// This sets up:
/// 1. Reveal: every element matching the reveal selector is hidden and
///    registered with `monitor`
/// 2. Nav links, header and dropdown bindings
/// 3. The `ScrollState` signal, its derived tier and active section, and the
///    presenter effect
/// 4. Debounced scroll and resize handlers
///
/// An initial tick runs before returning, so a page loaded mid-scroll starts
/// with the right header and active link.
pub fn mount<P: Page + 'static>(
    page: Rc<P>,
    scheduler: Rc<dyn Scheduler>,
    mut monitor: Box<dyn VisibilityMonitor>,
    config: PageConfig,
) -> MountHandle<P> {
    // Reveal targets
    let reveal = Rc::new(RefCell::new(RevealScheduler::new(RevealStyle::from_config(&config))));
    let targets = page.query_all(&config.reveal_selector);
    for &element in &targets {
        reveal.borrow_mut().register(&*page, element);
        let reveal = reveal.clone();
        let page = page.clone();
        monitor.register(
            element,
            Box::new(move |event| {
                reveal.borrow_mut().on_visibility(&*page, event);
            }),
        );
    }

    let header = Rc::new(RefCell::new(HeaderPresenter::find(&*page)));
    let nav = Rc::new(RefCell::new(NavHighlighter::scan(&*page, &config.nav_link_selector)));
    let dropdowns = DropdownController::bind(&*page, config.mobile_breakpoint);
    let parallax = ParallaxLayer::scan(&*page);
    let tilt = TiltCards::scan(&*page);

    // Reactive pipeline: state signal -> deriveds -> presenter effect
    let state = signal(ScrollState::default());
    let tier_derived = create_tier_derived(state.clone());
    let active_derived = create_active_section_derived(state.clone());

    let stop: Box<dyn FnOnce()> = {
        let page = page.clone();
        let header = header.clone();
        let nav = nav.clone();
        let stop_fn = effect(move || {
            // Read from deriveds (creates dependency)
            let tier = tier_derived.get();
            let active = active_derived.get();

            header.borrow_mut().show(&*page, tier);
            nav.borrow_mut().apply(&*page, active.as_deref());
        });
        Box::new(stop_fn)
    };

    let runtime = Rc::new(Runtime {
        page,
        scheduler: scheduler.clone(),
        reducer: RefCell::new(ScrollReducer::new(ScrollThresholds::from_config(&config))),
        state,
        monitor: RefCell::new(monitor),
        reveal,
        header,
        nav,
        dropdowns: RefCell::new(dropdowns),
        parallax,
        tilt,
        config,
    });

    let scroll_timing = if runtime.config.scroll_on_frame {
        Timing::NextFrame
    } else {
        Timing::After(runtime.config.scroll_debounce())
    };
    let scroll = {
        let runtime = runtime.clone();
        Debouncer::new(scheduler.clone(), scroll_timing, move |sample| runtime.tick(sample))
    };
    let resize = {
        let runtime = runtime.clone();
        Debouncer::new(
            scheduler,
            Timing::After(runtime.config.resize_debounce()),
            move |viewport| runtime.resize(viewport),
        )
    };

    runtime.tick(runtime.sample());

    tracing::info!(
        reveal = targets.len(),
        links = runtime.nav.borrow().links().len(),
        header = runtime.header.borrow().header().is_some(),
        "page coordinator mounted"
    );

    MountHandle {
        runtime,
        scroll,
        resize,
        collaborators: Collaborators::default(),
        stop_effect: Some(stop),
    }
}

/// Mount with a [`PollingMonitor`] that re-checks positions on every tick.
pub fn mount_polling<P: Page + 'static>(
    page: Rc<P>,
    scheduler: Rc<dyn Scheduler>,
    config: PageConfig,
) -> MountHandle<P> {
    let monitor = PollingMonitor::new(VisibilityOptions::from_config(&config));
    mount(page, scheduler, Box::new(monitor), config)
}

/// Unmount and clean up.
pub fn unmount<P: Page + 'static>(handle: MountHandle<P>) {
    handle.unmount();
}

// =============================================================================
// Tests
// =============================================================================
