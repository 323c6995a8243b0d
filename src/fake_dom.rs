//! In-memory document used by the unit tests.
//!
//! Elements match selectors by explicit registration rather than parsing CSS.
//! Timers queue until `run_timers`, and spawned tasks run to completion
//! immediately.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;

use crate::dom::{Dom, Element, EventFlow, EventKind, Handler, Rect, Target, UiEvent, VisibilityHandler};
use crate::error::PageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TargetKey {
    Window,
    Document,
    Node(usize),
}

struct Registration {
    id: usize,
    target: TargetKey,
    kind: EventKind,
    handler: Rc<dyn Fn(&UiEvent) -> EventFlow>,
}

struct Observer {
    id: usize,
    targets: Vec<usize>,
    handler: Rc<dyn Fn(&FakeElement) -> bool>,
}

#[derive(Default)]
struct Registry {
    next_id: Cell<usize>,
    listeners: RefCell<Vec<Registration>>,
    observers: RefCell<Vec<Observer>>,
}

impl Registry {
    fn next(&self) -> usize {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn handlers(&self, target: TargetKey, kind: EventKind) -> Vec<Rc<dyn Fn(&UiEvent) -> EventFlow>> {
        self.listeners
            .borrow()
            .iter()
            .filter(|r| r.target == target && r.kind == kind)
            .map(|r| Rc::clone(&r.handler))
            .collect()
    }

    fn dispatch(&self, target: TargetKey, event: &UiEvent) -> EventFlow {
        let mut flow = EventFlow::Continue;
        for handler in self.handlers(target, event.kind) {
            if handler(event) == EventFlow::PreventDefault {
                flow = EventFlow::PreventDefault;
            }
        }
        flow
    }
}

/// Unregisters on drop.
pub struct FakeListener {
    registry: Weak<Registry>,
    id: usize,
}

impl Drop for FakeListener {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.listeners.borrow_mut().retain(|r| r.id != self.id);
            registry.observers.borrow_mut().retain(|o| o.id != self.id);
        }
    }
}

#[derive(Default)]
struct Node {
    key: usize,
    tag: String,
    attrs: RefCell<HashMap<String, String>>,
    classes: RefCell<Vec<String>>,
    style: RefCell<HashMap<String, String>>,
    children: RefCell<Vec<FakeElement>>,
    rect: Cell<Rect>,
    offset_top: Cell<f64>,
    offset_height: Cell<f64>,
    value: RefCell<String>,
    focused: Cell<bool>,
    selected: Cell<bool>,
    removed: Cell<bool>,
    text_entry: Cell<bool>,
    clicks: Cell<u32>,
    registry: Weak<Registry>,
}

#[derive(Clone)]
pub struct FakeElement(Rc<Node>);

impl FakeElement {
    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    pub fn class_name(&self) -> String {
        self.0.classes.borrow().join(" ")
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.style.borrow().get(property).cloned()
    }

    pub fn children(&self) -> Vec<FakeElement> {
        self.0.children.borrow().clone()
    }

    pub fn value(&self) -> String {
        self.0.value.borrow().clone()
    }

    pub fn was_focused(&self) -> bool {
        self.0.focused.get()
    }

    pub fn was_selected(&self) -> bool {
        self.0.selected.get()
    }

    pub fn is_removed(&self) -> bool {
        self.0.removed.get()
    }

    pub fn clicks(&self) -> u32 {
        self.0.clicks.get()
    }

    pub fn set_rect(&self, rect: Rect) {
        self.0.rect.set(rect);
    }

    pub fn set_layout(&self, offset_top: f64, offset_height: f64) {
        self.0.offset_top.set(offset_top);
        self.0.offset_height.set(offset_height);
    }

    pub fn set_text_entry(&self, text_entry: bool) {
        self.0.text_entry.set(text_entry);
    }
}

impl Element for FakeElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.attrs.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.0.attrs.borrow_mut().insert(name.to_owned(), value.to_owned());
    }

    fn set_class_name(&self, value: &str) {
        *self.0.classes.borrow_mut() = value.split_whitespace().map(str::to_owned).collect();
    }

    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.classes.borrow_mut().push(class.to_owned());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.classes.borrow_mut().retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.classes.borrow().iter().any(|c| c == class)
    }

    fn set_style(&self, property: &str, value: &str) {
        self.0.style.borrow_mut().insert(property.to_owned(), value.to_owned());
    }

    fn append_child(&self, child: &Self) {
        self.0.children.borrow_mut().push(child.clone());
    }

    fn query(&self, selector: &str) -> Option<Self> {
        self.0
            .children
            .borrow()
            .iter()
            .find(|c| c.0.tag == selector || selector.strip_prefix('.').is_some_and(|class| c.has_class(class)))
            .cloned()
    }

    fn bounding_rect(&self) -> Rect {
        self.0.rect.get()
    }

    fn offset_top(&self) -> f64 {
        self.0.offset_top.get()
    }

    fn offset_height(&self) -> f64 {
        self.0.offset_height.get()
    }

    fn click(&self) {
        self.0.clicks.set(self.0.clicks.get() + 1);
        if let Some(registry) = self.0.registry.upgrade() {
            registry.dispatch(TargetKey::Node(self.0.key), &UiEvent::new(EventKind::Click));
        }
    }

    fn focus(&self) {
        self.0.focused.set(true);
    }

    fn select(&self) {
        self.0.selected.set(true);
    }

    fn set_value(&self, value: &str) {
        *self.0.value.borrow_mut() = value.to_owned();
    }

    fn remove(&self) {
        self.0.removed.set(true);
    }

    fn is_text_entry(&self) -> bool {
        self.0.text_entry.get()
    }
}

struct State {
    registry: Rc<Registry>,
    next_key: Cell<usize>,
    root: FakeElement,
    body: FakeElement,
    by_id: RefCell<HashMap<String, FakeElement>>,
    by_selector: RefCell<Vec<(String, FakeElement)>>,
    body_children: RefCell<Vec<FakeElement>>,
    active: RefCell<Option<FakeElement>>,
    styles: RefCell<Vec<(String, String)>>,
    scroll_y: Cell<f64>,
    viewport_height: Cell<f64>,
    document_height: Cell<f64>,
    scrolls: RefCell<Vec<f64>>,
    popups: RefCell<Vec<(String, String, String)>>,
    popup_blocked: Cell<bool>,
    exec_copy_ok: Cell<bool>,
    exec_copies: Cell<u32>,
    hidden: Cell<bool>,
    intersection_supported: Cell<bool>,
    timers: RefCell<Vec<(u32, Box<dyn FnOnce()>)>>,
    url: String,
    title: String,
}

#[derive(Clone)]
pub struct FakeDom(Rc<State>);

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDom {
    pub fn new() -> Self {
        let registry = Rc::new(Registry::default());
        let root = FakeElement(Rc::new(Node {
            key: 1,
            tag: "html".to_owned(),
            registry: Rc::downgrade(&registry),
            ..Node::default()
        }));
        let body = FakeElement(Rc::new(Node {
            key: 2,
            tag: "body".to_owned(),
            registry: Rc::downgrade(&registry),
            ..Node::default()
        }));
        Self(Rc::new(State {
            registry,
            next_key: Cell::new(2),
            root,
            body,
            by_id: RefCell::new(HashMap::new()),
            by_selector: RefCell::new(Vec::new()),
            body_children: RefCell::new(Vec::new()),
            active: RefCell::new(None),
            styles: RefCell::new(Vec::new()),
            scroll_y: Cell::new(0.0),
            viewport_height: Cell::new(800.0),
            document_height: Cell::new(5000.0),
            scrolls: RefCell::new(Vec::new()),
            popups: RefCell::new(Vec::new()),
            popup_blocked: Cell::new(false),
            exec_copy_ok: Cell::new(true),
            exec_copies: Cell::new(0),
            hidden: Cell::new(false),
            intersection_supported: Cell::new(true),
            timers: RefCell::new(Vec::new()),
            url: "https://blog.example/posts/hello world".to_owned(),
            title: "Hello & Welcome".to_owned(),
        }))
    }

    /// Create a detached element.
    pub fn element(&self, tag: &str) -> FakeElement {
        let key = self.0.next_key.get() + 1;
        self.0.next_key.set(key);
        FakeElement(Rc::new(Node {
            key,
            tag: tag.to_owned(),
            registry: Rc::downgrade(&self.0.registry),
            ..Node::default()
        }))
    }

    /// Create an element reachable through `element_by_id`.
    pub fn with_id(&self, tag: &str, id: &str) -> FakeElement {
        let el = self.element(tag);
        el.set_attribute("id", id);
        self.0.by_id.borrow_mut().insert(id.to_owned(), el.clone());
        el
    }

    /// Create an element reachable through `query`/`query_all` for `selector`.
    pub fn matching(&self, tag: &str, selector: &str) -> FakeElement {
        let el = self.element(tag);
        self.register(&el, selector);
        el
    }

    pub fn register(&self, el: &FakeElement, selector: &str) {
        self.0.by_selector.borrow_mut().push((selector.to_owned(), el.clone()));
    }

    pub fn body_el(&self) -> FakeElement {
        self.0.body.clone()
    }

    pub fn root_el(&self) -> FakeElement {
        self.0.root.clone()
    }

    pub fn body_children(&self) -> Vec<FakeElement> {
        self.0.body_children.borrow().clone()
    }

    pub fn set_active(&self, el: Option<&FakeElement>) {
        *self.0.active.borrow_mut() = el.cloned();
    }

    pub fn styles(&self) -> Vec<(String, String)> {
        self.0.styles.borrow().clone()
    }

    pub fn set_scroll_y(&self, y: f64) {
        self.0.scroll_y.set(y);
    }

    pub fn set_viewport_height(&self, h: f64) {
        self.0.viewport_height.set(h);
    }

    pub fn set_document_height(&self, h: f64) {
        self.0.document_height.set(h);
    }

    pub fn scrolls(&self) -> Vec<f64> {
        self.0.scrolls.borrow().clone()
    }

    pub fn popups(&self) -> Vec<(String, String, String)> {
        self.0.popups.borrow().clone()
    }

    pub fn block_popups(&self) {
        self.0.popup_blocked.set(true);
    }

    pub fn fail_exec_copy(&self) {
        self.0.exec_copy_ok.set(false);
    }

    pub fn exec_copies(&self) -> u32 {
        self.0.exec_copies.get()
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.0.hidden.set(hidden);
    }

    pub fn disable_intersection(&self) {
        self.0.intersection_supported.set(false);
    }

    pub fn pending_timers(&self) -> Vec<u32> {
        self.0.timers.borrow().iter().map(|(ms, _)| *ms).collect()
    }

    /// Fire every queued timer in scheduling order.
    pub fn run_timers(&self) {
        let timers = std::mem::take(&mut *self.0.timers.borrow_mut());
        for (_, callback) in timers {
            callback();
        }
    }

    /// Fire only the oldest queued timer. Returns false when none is queued.
    pub fn run_first_timer(&self) -> bool {
        let next = {
            let mut timers = self.0.timers.borrow_mut();
            if timers.is_empty() {
                None
            } else {
                Some(timers.remove(0))
            }
        };
        match next {
            Some((_, callback)) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.0.registry.listeners.borrow().len() + self.0.registry.observers.borrow().len()
    }

    pub fn fire_window(&self, event: &UiEvent) -> EventFlow {
        self.0.registry.dispatch(TargetKey::Window, event)
    }

    pub fn fire_document(&self, event: &UiEvent) -> EventFlow {
        self.0.registry.dispatch(TargetKey::Document, event)
    }

    /// Scroll to `y` and dispatch a window scroll event.
    pub fn scroll(&self, y: f64) {
        self.set_scroll_y(y);
        self.fire_window(&UiEvent::new(EventKind::Scroll));
    }

    /// Dispatch a click on `el` and report the handlers' verdict.
    pub fn click(&self, el: &FakeElement) -> EventFlow {
        el.0.clicks.set(el.0.clicks.get() + 1);
        self.0.registry.dispatch(TargetKey::Node(el.0.key), &UiEvent::new(EventKind::Click))
    }

    /// Report `el` entering the viewport to every observer watching it.
    pub fn intersect(&self, el: &FakeElement) {
        let watching: Vec<(usize, Rc<dyn Fn(&FakeElement) -> bool>)> = self
            .0
            .registry
            .observers
            .borrow()
            .iter()
            .filter(|o| o.targets.contains(&el.0.key))
            .map(|o| (o.id, Rc::clone(&o.handler)))
            .collect();
        for (id, handler) in watching {
            if handler(el) {
                for observer in self.0.registry.observers.borrow_mut().iter_mut() {
                    if observer.id == id {
                        observer.targets.retain(|k| *k != el.0.key);
                    }
                }
            }
        }
    }

    pub fn observed_count(&self) -> usize {
        self.0.registry.observers.borrow().iter().map(|o| o.targets.len()).sum()
    }
}

impl Dom for FakeDom {
    type Element = FakeElement;
    type Listener = FakeListener;

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        self.0.by_id.borrow().get(id).cloned()
    }

    fn query(&self, selector: &str) -> Option<FakeElement> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<FakeElement> {
        self.0
            .by_selector
            .borrow()
            .iter()
            .filter(|(s, _)| s == selector)
            .map(|(_, el)| el.clone())
            .collect()
    }

    fn root(&self) -> Option<FakeElement> {
        Some(self.0.root.clone())
    }

    fn body(&self) -> Option<FakeElement> {
        Some(self.0.body.clone())
    }

    fn active_element(&self) -> Option<FakeElement> {
        self.0.active.borrow().clone()
    }

    fn create_element(&self, tag: &str) -> Option<FakeElement> {
        Some(self.element(tag))
    }

    fn prepend_to_body(&self, el: &FakeElement) {
        self.0.body_children.borrow_mut().insert(0, el.clone());
        if let Some(id) = el.attribute("id") {
            self.0.by_id.borrow_mut().insert(id, el.clone());
        }
    }

    fn append_to_body(&self, el: &FakeElement) {
        self.0.body_children.borrow_mut().push(el.clone());
    }

    fn inject_style(&self, id: &str, css: &str) {
        let mut styles = self.0.styles.borrow_mut();
        if !styles.iter().any(|(existing, _)| existing == id) {
            styles.push((id.to_owned(), css.to_owned()));
        }
    }

    fn scroll_y(&self) -> f64 {
        self.0.scroll_y.get()
    }

    fn viewport_height(&self) -> f64 {
        self.0.viewport_height.get()
    }

    fn document_height(&self) -> f64 {
        self.0.document_height.get()
    }

    fn scroll_to(&self, top: f64) {
        self.0.scrolls.borrow_mut().push(top);
    }

    fn page_url(&self) -> String {
        self.0.url.clone()
    }

    fn page_title(&self) -> String {
        self.0.title.clone()
    }

    fn is_hidden(&self) -> bool {
        self.0.hidden.get()
    }

    fn open_popup(&self, url: &str, target: &str, features: &str) -> Result<(), PageError> {
        if self.0.popup_blocked.get() {
            return Err(PageError::Popup("blocked".to_owned()));
        }
        self.0.popups.borrow_mut().push((url.to_owned(), target.to_owned(), features.to_owned()));
        Ok(())
    }

    fn exec_copy(&self) -> Result<(), PageError> {
        self.0.exec_copies.set(self.0.exec_copies.get() + 1);
        if self.0.exec_copy_ok.get() {
            Ok(())
        } else {
            Err(PageError::LegacyCopy("execCommand returned false".to_owned()))
        }
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        self.0.timers.borrow_mut().push((delay_ms, callback));
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        futures::executor::block_on(task);
    }

    fn listen(&self, target: Target<'_, FakeElement>, kind: EventKind, handler: Handler) -> Option<FakeListener> {
        let target = match target {
            Target::Window => TargetKey::Window,
            Target::Document => TargetKey::Document,
            Target::Element(el) => TargetKey::Node(el.0.key),
        };
        let id = self.0.registry.next();
        self.0.registry.listeners.borrow_mut().push(Registration {
            id,
            target,
            kind,
            handler: Rc::from(handler),
        });
        Some(FakeListener { registry: Rc::downgrade(&self.0.registry), id })
    }

    fn observe_visibility(
        &self,
        targets: &[FakeElement],
        handler: VisibilityHandler<FakeElement>,
    ) -> Option<FakeListener> {
        if !self.0.intersection_supported.get() {
            return None;
        }
        let id = self.0.registry.next();
        self.0.registry.observers.borrow_mut().push(Observer {
            id,
            targets: targets.iter().map(|t| t.0.key).collect(),
            handler: Rc::from(handler),
        });
        Some(FakeListener { registry: Rc::downgrade(&self.0.registry), id })
    }
}
