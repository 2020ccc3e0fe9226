//! Web Page - Browser binding over `web-sys`
//!
//! - [`WebPage`] - [`Page`] over the live document
//! - [`WebScheduler`] - `setTimeout` / `requestAnimationFrame`
//! - [`IntersectionMonitor`] - `IntersectionObserver`-backed visibility
//! - [`NavigatorClipboard`] - `navigator.clipboard` writes
//! - [`ConsoleNotifier`] - notifications to the browser console
//! - [`bind`] - wires window and document listeners to a mounted handle
//!
//! Elements are interned on first sight: each gets a `data-spark-id`
//! attribute holding its [`ElementId`], so the same node always maps to the
//! same id.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent as DomKeyboardEvent, MouseEvent, NodeList,
    ScrollBehavior, ScrollToOptions, Window,
};

use super::Page;
use crate::config::PageConfig;
use crate::error::{PageError, Result};
use crate::pipeline::{mount, MountHandle};
use crate::scheduler::{Scheduler, Task, TaskId, TaskSlots};
use crate::state::clipboard::{ClipboardSink, CopyDone};
use crate::state::dropdown::NAV_ITEM_SELECTOR;
use crate::state::keys::{KeyboardEvent, Modifiers};
use crate::state::modal;
use crate::state::notify::{NotificationKind, Notifier};
use crate::state::tilt::TILT_SELECTOR;
use crate::state::visibility::{VisibilityCallback, VisibilityMonitor, VisibilityOptions};
use crate::types::{ElementId, Rect, Viewport, VisibilityEvent};

/// Attribute carrying an element's interned id.
pub const ID_ATTRIBUTE: &str = "data-spark-id";

fn host_error(err: JsValue) -> PageError {
    PageError::Host(format!("{err:?}"))
}

fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| PageError::Host("no window".to_string()))
}

// =============================================================================
// WEB PAGE
// =============================================================================

/// [`Page`] over the browser document.
pub struct WebPage {
    window: Window,
    document: Document,
    elements: RefCell<Vec<Element>>,
}

impl WebPage {
    pub fn new() -> Result<Self> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| PageError::Host("no document".to_string()))?;
        Ok(Self {
            window,
            document,
            elements: RefCell::new(Vec::new()),
        })
    }

    /// Id for `element`, assigning one if it has none yet.
    pub fn intern(&self, element: &Element) -> ElementId {
        if let Some(id) = Self::interned(element) {
            return id;
        }
        let mut elements = self.elements.borrow_mut();
        let id = ElementId(elements.len());
        if let Err(err) = element.set_attribute(ID_ATTRIBUTE, &id.index().to_string()) {
            tracing::debug!(error = ?err, "could not tag element");
        }
        elements.push(element.clone());
        id
    }

    /// Id already carried by `element`, if any.
    pub fn interned(element: &Element) -> Option<ElementId> {
        element
            .get_attribute(ID_ATTRIBUTE)
            .and_then(|raw| raw.parse().ok())
            .map(ElementId)
    }

    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id.index()).cloned()
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn collect(&self, list: std::result::Result<NodeList, JsValue>, selector: &str) -> Vec<ElementId> {
        let list = match list {
            Ok(list) => list,
            Err(err) => {
                tracing::debug!(selector, error = ?err, "selector rejected by the browser");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.intern(&el))
            .collect()
    }
}

impl Page for WebPage {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.collect(self.document.query_selector_all(selector), selector)
    }

    fn query_within(&self, root: ElementId, selector: &str) -> Vec<ElementId> {
        match self.element(root) {
            Some(root) => self.collect(root.query_selector_all(selector), selector),
            None => Vec::new(),
        }
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.document
            .get_element_by_id(id)
            .map(|el| self.intern(&el))
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)?.get_attribute(name)
    }

    fn offset_top(&self, element: ElementId) -> Option<f64> {
        Some(self.html(element)?.offset_top() as f64)
    }

    fn offset_height(&self, element: ElementId) -> Option<f64> {
        Some(self.html(element)?.offset_height() as f64)
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        let rect = self.element(element)?.get_bounding_client_rect();
        Some(Rect::new(rect.x(), rect.y(), rect.width(), rect.height()))
    }

    fn viewport(&self) -> Viewport {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(width, height)
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64, smooth: bool) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(if smooth {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Auto
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.html(element)?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style(&self, element: ElementId, property: &str, value: &str) {
        let Some(html) = self.html(element) else {
            return;
        };
        if let Err(err) = html.style().set_property(property, value) {
            tracing::debug!(property, error = ?err, "style write rejected");
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.element(element)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn set_class(&self, element: ElementId, class: &str, enabled: bool) {
        if let Some(el) = self.element(element) {
            if let Err(err) = el.class_list().toggle_with_force(class, enabled) {
                tracing::debug!(class, error = ?err, "class write rejected");
            }
        }
    }

    fn set_text(&self, element: ElementId, text: &str) {
        if let Some(el) = self.element(element) {
            el.set_text_content(Some(text));
        }
    }

    fn focus(&self, element: ElementId) {
        if let Some(html) = self.html(element) {
            if let Err(err) = html.focus() {
                tracing::debug!(error = ?err, "focus rejected");
            }
        }
    }
}

// =============================================================================
// WEB SCHEDULER
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Handle {
    Timeout(i32),
    Frame(i32),
}

/// A timer or frame request and the closure it will call.
struct Scheduled {
    handle: Handle,
    _callback: Closure<dyn FnMut()>,
}

/// [`Scheduler`] over `setTimeout` and `requestAnimationFrame`.
///
/// Each pending callback lives in a slot until it runs or is cancelled, so a
/// debounced scroll that cancels and reschedules on every event releases
/// every superseded closure.
pub struct WebScheduler {
    window: Window,
    origin: f64,
    slots: Rc<RefCell<TaskSlots<Scheduled>>>,
}

impl WebScheduler {
    pub fn new() -> Result<Self> {
        Ok(Self {
            window: window()?,
            origin: js_sys::Date::now(),
            slots: Rc::new(RefCell::new(TaskSlots::new())),
        })
    }

    /// Number of callbacks still waiting for the browser.
    pub fn pending(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Wrap `task` so it releases its own slot when it runs.
    fn callback(&self, id: TaskId, task: Task) -> Closure<dyn FnMut()> {
        let slots = Rc::downgrade(&self.slots);
        let mut task = Some(task);
        Closure::new(move || {
            // Held until the task returns; the closure is freed after this call.
            let finished = slots.upgrade().and_then(|slots| slots.borrow_mut().take(id));
            if let Some(task) = task.take() {
                task();
            }
            drop(finished);
        })
    }

    fn clear(&self, handle: Handle) {
        match handle {
            Handle::Timeout(h) => self.window.clear_timeout_with_handle(h),
            Handle::Frame(h) => {
                if let Err(err) = self.window.cancel_animation_frame(h) {
                    tracing::debug!(error = ?err, "cancelAnimationFrame failed");
                }
            }
        }
    }
}

impl Scheduler for WebScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) -> TaskId {
        let id = self.slots.borrow_mut().next_id();
        let callback = self.callback(id, task);
        let millis = delay.as_millis().min(i32::MAX as u128) as i32;
        match self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            millis,
        ) {
            Ok(handle) => self.slots.borrow_mut().insert(
                id,
                Scheduled {
                    handle: Handle::Timeout(handle),
                    _callback: callback,
                },
            ),
            Err(err) => tracing::warn!(error = ?err, "setTimeout failed"),
        }
        id
    }

    fn schedule_next_frame(&self, task: Task) -> TaskId {
        let id = self.slots.borrow_mut().next_id();
        let callback = self.callback(id, task);
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => self.slots.borrow_mut().insert(
                id,
                Scheduled {
                    handle: Handle::Frame(handle),
                    _callback: callback,
                },
            ),
            Err(err) => tracing::warn!(error = ?err, "requestAnimationFrame failed"),
        }
        id
    }

    fn cancel(&self, id: TaskId) {
        let Some(scheduled) = self.slots.borrow_mut().take(id) else {
            return;
        };
        self.clear(scheduled.handle);
    }

    fn now(&self) -> Duration {
        Duration::from_secs_f64(((js_sys::Date::now() - self.origin) / 1000.0).max(0.0))
    }
}

impl Drop for WebScheduler {
    fn drop(&mut self) {
        let pending = self.slots.borrow_mut().drain();
        for scheduled in pending {
            self.clear(scheduled.handle);
        }
    }
}

// =============================================================================
// INTERSECTION MONITOR
// =============================================================================

type Callbacks = Rc<RefCell<HashMap<ElementId, VisibilityCallback>>>;

/// [`VisibilityMonitor`] backed by one `IntersectionObserver`.
pub struct IntersectionMonitor {
    page: Rc<WebPage>,
    observer: IntersectionObserver,
    callbacks: Callbacks,
    _on_entries: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl IntersectionMonitor {
    pub fn new(page: Rc<WebPage>, options: VisibilityOptions) -> Result<Self> {
        let callbacks: Callbacks = Rc::new(RefCell::new(HashMap::new()));
        let threshold = options.threshold;

        let delivered = callbacks.clone();
        let on_entries = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    let Some(element) = WebPage::interned(&entry.target()) else {
                        continue;
                    };
                    let visible = entry.is_intersecting() && entry.intersection_ratio() >= threshold;

                    // Take the callback out so it may re-enter the monitor.
                    let callback = delivered.borrow_mut().remove(&element);
                    if let Some(mut callback) = callback {
                        callback(VisibilityEvent { element, visible });
                        delivered.borrow_mut().entry(element).or_insert(callback);
                    }
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        init.set_root_margin(&format!("0px 0px {}px 0px", options.root_margin_bottom));
        let observer =
            IntersectionObserver::new_with_options(on_entries.as_ref().unchecked_ref(), &init)
                .map_err(host_error)?;

        Ok(Self {
            page,
            observer,
            callbacks,
            _on_entries: on_entries,
        })
    }
}

impl VisibilityMonitor for IntersectionMonitor {
    fn register(&mut self, element: ElementId, callback: VisibilityCallback) {
        let Some(target) = self.page.element(element) else {
            tracing::debug!(%element, "cannot observe unknown element");
            return;
        };
        self.callbacks.borrow_mut().insert(element, callback);
        self.observer.observe(&target);
    }

    fn unregister(&mut self, element: ElementId) {
        self.callbacks.borrow_mut().remove(&element);
        if let Some(target) = self.page.element(element) {
            self.observer.unobserve(&target);
        }
    }

    fn is_registered(&self, element: ElementId) -> bool {
        self.callbacks.borrow().contains_key(&element)
    }
}

impl Drop for IntersectionMonitor {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

// =============================================================================
// CLIPBOARD
// =============================================================================

/// [`ClipboardSink`] over `navigator.clipboard.writeText`.
///
/// The outcome is reported when the returned promise settles.
pub struct NavigatorClipboard {
    window: Window,
}

impl NavigatorClipboard {
    pub fn new() -> Result<Self> {
        Ok(Self { window: window()? })
    }
}

impl ClipboardSink for NavigatorClipboard {
    fn write_text(&self, text: &str, done: CopyDone) {
        let promise = self.window.navigator().clipboard().write_text(text);
        spawn_local(async move {
            let outcome = JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|err| PageError::Clipboard(format!("{err:?}")));
            done(outcome);
        });
    }
}

// =============================================================================
// NOTIFIER
// =============================================================================

/// [`Notifier`] that writes to the browser console.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        let line = JsValue::from_str(&format!("[{kind}] {message}"));
        match kind {
            NotificationKind::Error => web_sys::console::error_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }
}

// =============================================================================
// LISTENERS
// =============================================================================

/// A mounted page and the DOM listeners feeding it.
pub struct WebBinding {
    handle: Rc<MountHandle<WebPage>>,
    listeners: Vec<(web_sys::EventTarget, &'static str, Closure<dyn FnMut(Event)>)>,
}

impl WebBinding {
    pub fn handle(&self) -> &Rc<MountHandle<WebPage>> {
        &self.handle
    }

    /// Keep the binding alive for the rest of the page's life.
    pub fn leak(self) {
        std::mem::forget(self);
    }
}

impl Drop for WebBinding {
    fn drop(&mut self) {
        for (target, kind, closure) in &self.listeners {
            let _ = target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
    }
}

fn key_event(event: &DomKeyboardEvent) -> KeyboardEvent {
    KeyboardEvent::with_modifiers(
        event.key(),
        Modifiers {
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
            meta: event.meta_key(),
        },
    )
}

/// Attach scroll, resize, keyboard, click and pointer listeners.
pub fn bind(page: Rc<WebPage>, handle: Rc<MountHandle<WebPage>>) -> Result<WebBinding> {
    let window = window()?;
    let document = page.document.clone();
    let mut listeners = Vec::new();

    let mut listen = |target: web_sys::EventTarget,
                      kind: &'static str,
                      closure: Closure<dyn FnMut(Event)>|
     -> Result<()> {
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(host_error)?;
        listeners.push((target, kind, closure));
        Ok(())
    };

    let h = handle.clone();
    listen(window.clone().into(), "scroll", Closure::new(move |_: Event| h.on_scroll()))?;

    let h = handle.clone();
    listen(window.clone().into(), "resize", Closure::new(move |_: Event| h.on_resize()))?;

    let h = handle.clone();
    listen(
        document.clone().into(),
        "keydown",
        Closure::new(move |event: Event| {
            let Some(key) = event.dyn_ref::<DomKeyboardEvent>() else {
                return;
            };
            if h.on_key(&key_event(key)).prevents_default() {
                event.prevent_default();
            }
        }),
    )?;

    let (h, p) = (handle.clone(), page.clone());
    listen(
        document.clone().into(),
        "click",
        Closure::new(move |event: Event| {
            let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
            let Some(clicked) = target.and_then(|t| t.closest("a, [data-copy]").ok().flatten()) else {
                return;
            };
            if h.on_click(p.intern(&clicked)) {
                event.prevent_default();
            }
        }),
    )?;

    let h = handle.clone();
    listen(
        window.clone().into(),
        "mousemove",
        Closure::new(move |event: Event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                h.on_pointer_move(mouse.client_x() as f64, mouse.client_y() as f64);
            }
        }),
    )?;

    for item in page.query_all(NAV_ITEM_SELECTOR) {
        let Some(target) = page.element(item) else {
            continue;
        };
        let h = handle.clone();
        listen(
            target.clone().into(),
            "mouseenter",
            Closure::new(move |_: Event| {
                h.on_pointer_enter(item);
            }),
        )?;
        let h = handle.clone();
        listen(
            target.into(),
            "mouseleave",
            Closure::new(move |_: Event| {
                h.on_pointer_leave(item);
            }),
        )?;
    }

    for card in page.query_all(TILT_SELECTOR) {
        let Some(target) = page.element(card) else {
            continue;
        };
        let h = handle.clone();
        listen(
            target.clone().into(),
            "mousemove",
            Closure::new(move |event: Event| {
                if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                    h.on_card_pointer_move(card, mouse.client_x() as f64, mouse.client_y() as f64);
                }
            }),
        )?;
        let h = handle.clone();
        listen(
            target.into(),
            "mouseleave",
            Closure::new(move |_: Event| {
                h.on_pointer_leave(card);
            }),
        )?;
    }

    tracing::debug!(listeners = listeners.len(), "web listeners bound");
    Ok(WebBinding { handle, listeners })
}

/// Mount against the live document with default configuration and keep it
/// running for the life of the page.
#[wasm_bindgen::prelude::wasm_bindgen(js_name = mountPage)]
pub fn mount_page() -> std::result::Result<(), JsValue> {
    let to_js = |err: PageError| JsValue::from_str(&err.to_string());

    let config = PageConfig::default();
    let page = Rc::new(WebPage::new().map_err(to_js)?);
    let scheduler = Rc::new(WebScheduler::new().map_err(to_js)?);
    let monitor = IntersectionMonitor::new(page.clone(), VisibilityOptions::from_config(&config))
        .map_err(to_js)?;

    let clipboard = NavigatorClipboard::new().map_err(to_js)?;

    let handle = mount(page.clone(), scheduler, Box::new(monitor), config).with_collaborators(
        crate::pipeline::Collaborators {
            clipboard: Box::new(clipboard),
            notifier: Rc::new(ConsoleNotifier),
            ..Default::default()
        },
    );
    bind(page, Rc::new(handle)).map_err(to_js)?.leak();
    Ok(())
}

/// Show the modal with id `modal_id`, for `onclick` attributes.
#[wasm_bindgen::prelude::wasm_bindgen(js_name = openModal)]
pub fn open_modal(modal_id: &str) -> bool {
    WebPage::new().is_ok_and(|page| modal::open_modal(&page, modal_id))
}

/// Hide the modal with id `modal_id`, for `onclick` attributes.
#[wasm_bindgen::prelude::wasm_bindgen(js_name = closeModal)]
pub fn close_modal(modal_id: &str) -> bool {
    WebPage::new().is_ok_and(|page| modal::close_modal(&page, modal_id))
}
