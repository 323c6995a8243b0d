//! `web-sys` implementation of the host seams, and the WASM entry point.
//!
//! Compiled only with the `browser` feature. Everything here is glue: it
//! converts DOM events into [`UiEvent`]s and forwards effects to the browser.
//! Browser call failures are logged at `warn` and otherwise ignored.

use std::cell::RefCell;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, DocumentReadyState, Event, EventTarget, HtmlDocument, HtmlElement, HtmlTextAreaElement,
    IntersectionObserver, IntersectionObserverEntry, KeyboardEvent, ScrollBehavior, ScrollToOptions, Storage,
    Window,
};

use crate::clipboard::Clipboard;
use crate::config::PageConfig;
use crate::consts::CONFIG_ATTR;
use crate::dom::{Dom, Element, EventFlow, EventKind, Handler, KeyInput, Rect, Target, UiEvent, VisibilityHandler};
use crate::error::PageError;
use crate::page::{PageHandle, mount};
use crate::prefs::{MemoryStore, PreferenceStore};

fn warn_js(what: &str, err: &JsValue) {
    log::warn!("{what} failed: {err:?}");
}

fn current_scroll_y() -> f64 {
    let Some(window) = web_sys::window() else {
        return 0.0;
    };
    match window.scroll_y() {
        Ok(y) => y,
        Err(e) => {
            warn_js("scrollY", &e);
            0.0
        }
    }
}

// =============================================================
// Element
// =============================================================

#[derive(Clone)]
pub struct WebElement(web_sys::Element);

impl WebElement {
    fn html(&self) -> Option<&HtmlElement> {
        self.0.dyn_ref::<HtmlElement>()
    }
}

impl Element for WebElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(e) = self.0.set_attribute(name, value) {
            warn_js("setAttribute", &e);
        }
    }

    fn set_class_name(&self, value: &str) {
        self.0.set_class_name(value);
    }

    fn add_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().add_1(class) {
            warn_js("classList.add", &e);
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().remove_1(class) {
            warn_js("classList.remove", &e);
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn set_style(&self, property: &str, value: &str) {
        let Some(html) = self.html() else {
            return;
        };
        if let Err(e) = html.style().set_property(property, value) {
            warn_js("style.setProperty", &e);
        }
    }

    fn append_child(&self, child: &Self) {
        if let Err(e) = self.0.append_child(&child.0) {
            warn_js("appendChild", &e);
        }
    }

    fn query(&self, selector: &str) -> Option<Self> {
        match self.0.query_selector(selector) {
            Ok(found) => found.map(WebElement),
            Err(e) => {
                warn_js("querySelector", &e);
                None
            }
        }
    }

    fn bounding_rect(&self) -> Rect {
        let r = self.0.get_bounding_client_rect();
        Rect { left: r.left(), top: r.top(), width: r.width(), height: r.height() }
    }

    fn offset_top(&self) -> f64 {
        self.0.get_bounding_client_rect().top() + current_scroll_y()
    }

    fn offset_height(&self) -> f64 {
        self.html().map_or(0.0, |h| f64::from(h.offset_height()))
    }

    fn click(&self) {
        if let Some(html) = self.html() {
            html.click();
        }
    }

    fn focus(&self) {
        if let Some(html) = self.html() {
            if let Err(e) = html.focus() {
                warn_js("focus", &e);
            }
        }
    }

    fn select(&self) {
        if let Some(field) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            field.select();
        }
    }

    fn set_value(&self, value: &str) {
        if let Some(field) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            field.set_value(value);
        }
    }

    fn remove(&self) {
        self.0.remove();
    }

    fn is_text_entry(&self) -> bool {
        matches!(self.0.tag_name().to_ascii_uppercase().as_str(), "INPUT" | "TEXTAREA")
            || self.html().is_some_and(HtmlElement::is_content_editable)
    }
}

// =============================================================
// Listener guards
// =============================================================

/// Keeps a JS callback registered. Dropping it unregisters the callback.
pub enum WebListener {
    Event {
        target: EventTarget,
        kind: EventKind,
        closure: Closure<dyn FnMut(Event)>,
    },
    Observer {
        observer: IntersectionObserver,
        _closure: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
    },
}

impl Drop for WebListener {
    fn drop(&mut self) {
        match self {
            Self::Event { target, kind, closure } => {
                if let Err(e) =
                    target.remove_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
                {
                    warn_js("removeEventListener", &e);
                }
            }
            Self::Observer { observer, .. } => observer.disconnect(),
        }
    }
}

fn to_ui_event(kind: EventKind, event: &Event) -> UiEvent {
    match event.dyn_ref::<KeyboardEvent>() {
        Some(key) if kind == EventKind::KeyDown => UiEvent::key_down(KeyInput {
            key: key.key(),
            ctrl: key.ctrl_key(),
            alt: key.alt_key(),
            shift: key.shift_key(),
            meta: key.meta_key(),
        }),
        _ => UiEvent::new(kind),
    }
}

// =============================================================
// Dom
// =============================================================

#[derive(Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    /// Bind to the global window and document, if there are any.
    #[must_use]
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }
}

impl Dom for WebDom {
    type Element = WebElement;
    type Listener = WebListener;

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement)
    }

    fn query(&self, selector: &str) -> Option<WebElement> {
        match self.document.query_selector(selector) {
            Ok(found) => found.map(WebElement),
            Err(e) => {
                warn_js("querySelector", &e);
                None
            }
        }
    }

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                warn_js("querySelectorAll", &e);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| match node.dyn_into::<web_sys::Element>() {
                Ok(el) => Some(WebElement(el)),
                Err(_) => None,
            })
            .collect()
    }

    fn root(&self) -> Option<WebElement> {
        self.document.document_element().map(WebElement)
    }

    fn body(&self) -> Option<WebElement> {
        self.document.body().map(|b| WebElement(b.into()))
    }

    fn active_element(&self) -> Option<WebElement> {
        self.document.active_element().map(WebElement)
    }

    fn create_element(&self, tag: &str) -> Option<WebElement> {
        match self.document.create_element(tag) {
            Ok(el) => Some(WebElement(el)),
            Err(e) => {
                warn_js("createElement", &e);
                None
            }
        }
    }

    fn prepend_to_body(&self, el: &WebElement) {
        if let Some(body) = self.document.body() {
            if let Err(e) = body.prepend_with_node_1(&el.0) {
                warn_js("prepend", &e);
            }
        }
    }

    fn append_to_body(&self, el: &WebElement) {
        if let Some(body) = self.document.body() {
            if let Err(e) = body.append_child(&el.0) {
                warn_js("appendChild", &e);
            }
        }
    }

    fn inject_style(&self, id: &str, css: &str) {
        if self.document.get_element_by_id(id).is_some() {
            return;
        }
        let (Some(head), Some(style)) = (self.document.head(), self.create_element("style")) else {
            return;
        };
        style.set_attribute("id", id);
        style.0.set_text_content(Some(css));
        if let Err(e) = head.append_child(&style.0) {
            warn_js("inject style", &e);
        }
    }

    fn scroll_y(&self) -> f64 {
        match self.window.scroll_y() {
            Ok(y) => y,
            Err(e) => {
                warn_js("scrollY", &e);
                0.0
            }
        }
    }

    fn viewport_height(&self) -> f64 {
        match self.window.inner_height() {
            Ok(h) => h.as_f64().unwrap_or(0.0),
            Err(e) => {
                warn_js("innerHeight", &e);
                0.0
            }
        }
    }

    fn document_height(&self) -> f64 {
        self.document.document_element().map_or(0.0, |el| f64::from(el.scroll_height()))
    }

    fn scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn page_url(&self) -> String {
        match self.window.location().href() {
            Ok(href) => href,
            Err(e) => {
                warn_js("location.href", &e);
                String::new()
            }
        }
    }

    fn page_title(&self) -> String {
        self.document.title()
    }

    fn is_hidden(&self) -> bool {
        self.document.hidden()
    }

    fn open_popup(&self, url: &str, target: &str, features: &str) -> Result<(), PageError> {
        // `noopener` makes `open` return null even on success.
        match self.window.open_with_url_and_target_and_features(url, target, features) {
            Ok(_) => Ok(()),
            Err(e) => Err(PageError::Popup(format!("{e:?}"))),
        }
    }

    fn exec_copy(&self) -> Result<(), PageError> {
        let Some(html) = self.document.dyn_ref::<HtmlDocument>() else {
            return Err(PageError::LegacyCopy("not an HTML document".to_owned()));
        };
        match html.exec_command("copy") {
            Ok(true) => Ok(()),
            Ok(false) => Err(PageError::LegacyCopy("execCommand returned false".to_owned())),
            Err(e) => Err(PageError::LegacyCopy(format!("{e:?}"))),
        }
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        gloo_timers::callback::Timeout::new(delay_ms, callback).forget();
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn listen(&self, target: Target<'_, WebElement>, kind: EventKind, handler: Handler) -> Option<WebListener> {
        let target: EventTarget = match target {
            Target::Window => self.window.clone().into(),
            Target::Document => self.document.clone().into(),
            Target::Element(el) => el.0.clone().into(),
        };
        let closure = Closure::wrap(Box::new(move |event: Event| {
            if handler(&to_ui_event(kind, &event)) == EventFlow::PreventDefault {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(Event)>);
        match target.add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref()) {
            Ok(()) => Some(WebListener::Event { target, kind, closure }),
            Err(e) => {
                warn_js("addEventListener", &e);
                None
            }
        }
    }

    fn observe_visibility(
        &self,
        targets: &[WebElement],
        handler: VisibilityHandler<WebElement>,
    ) -> Option<WebListener> {
        match js_sys::Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver")) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                warn_js("IntersectionObserver probe", &e);
                return None;
            }
        }
        let closure = Closure::wrap(Box::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if handler(&WebElement(target.clone())) {
                    observer.unobserve(&target);
                }
            }
        }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);
        let observer = match IntersectionObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(e) => {
                warn_js("new IntersectionObserver", &e);
                return None;
            }
        };
        for target in targets {
            observer.observe(&target.0);
        }
        Some(WebListener::Observer { observer, _closure: closure })
    }
}

// =============================================================
// Preferences and clipboard
// =============================================================

/// `localStorage`, or an in-memory map when storage is unavailable
/// (private mode, disabled cookies).
pub struct LocalStorageStore {
    storage: Option<Storage>,
    fallback: MemoryStore,
}

impl LocalStorageStore {
    #[must_use]
    pub fn new(window: &Window) -> Self {
        let storage = match window.local_storage() {
            Ok(storage) => storage,
            Err(e) => {
                warn_js("localStorage", &e);
                None
            }
        };
        Self { storage, fallback: MemoryStore::new() }
    }
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        let Some(storage) = &self.storage else {
            return self.fallback.get(key);
        };
        match storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                warn_js("localStorage.getItem", &e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = &self.storage else {
            self.fallback.set(key, value);
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            warn_js("localStorage.setItem", &e);
        }
    }
}

/// The async Clipboard API on `navigator`.
pub struct NavigatorClipboard {
    window: Window,
}

impl NavigatorClipboard {
    #[must_use]
    pub fn new(window: &Window) -> Self {
        Self { window: window.clone() }
    }
}

impl Clipboard for NavigatorClipboard {
    fn write_text(&self, text: &str) -> LocalBoxFuture<'static, Result<(), PageError>> {
        let Some(clipboard) = self.window.navigator().clipboard() else {
            return futures::future::ready(Err(PageError::ClipboardUnavailable)).boxed_local();
        };
        let pending = JsFuture::from(clipboard.write_text(text));
        async move {
            match pending.await {
                Ok(_) => Ok(()),
                Err(e) => Err(PageError::ClipboardWrite(format!("{e:?}"))),
            }
        }
        .boxed_local()
    }
}

// =============================================================
// Entry point
// =============================================================

type BrowserPage = PageHandle<WebDom, LocalStorageStore, NavigatorClipboard>;

thread_local! {
    static PAGE: RefCell<Option<BrowserPage>> = const { RefCell::new(None) };
}

fn mount_now(dom: &WebDom) {
    let raw = dom.body().and_then(|body| body.attribute(CONFIG_ATTR));
    let config = PageConfig::from_optional_json(raw.as_deref());
    let handle = mount(dom, LocalStorageStore::new(&dom.window), NavigatorClipboard::new(&dom.window), &config);
    PAGE.with(|slot| {
        if let Some(previous) = slot.borrow_mut().replace(handle) {
            previous.detach();
        }
    });
}

/// Module start: mount once the document is parsed.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        log::debug!("logger already installed: {e}");
    }

    let Some(dom) = WebDom::new() else {
        return;
    };
    if dom.document.ready_state() != DocumentReadyState::Loading {
        mount_now(&dom);
        return;
    }
    let target = dom.document.clone();
    let on_ready = Closure::once_into_js(move || mount_now(&dom));
    if let Err(e) = target.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref()) {
        warn_js("DOMContentLoaded listener", &e);
    }
}

/// Unregister every listener installed by [`start`].
#[wasm_bindgen]
pub fn unmount() {
    PAGE.with(|slot| {
        if let Some(page) = slot.borrow_mut().take() {
            page.detach();
        }
    });
}
