//! Host seam between the controllers and the document they enhance.
//!
//! Controllers never touch `web-sys` directly. They hold `Dom::Element`
//! handles and register handlers through [`Dom::listen`], which keeps every
//! controller drivable from tests with an in-memory document. The browser
//! implementation is `crate::browser::WebDom`.
//!
//! Handlers are `Fn` closures run on the single UI thread. They may fire many
//! times per second (scroll, key repeat) and must stay cheap.

use futures::future::LocalBoxFuture;

use crate::error::PageError;

/// Viewport-relative box of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Events the controllers subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Scroll,
    Resize,
    KeyDown,
    VisibilityChange,
}

impl EventKind {
    /// DOM event type name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::KeyDown => "keydown",
            Self::VisibilityChange => "visibilitychange",
        }
    }
}

/// A key press with the modifiers held at the time.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyInput {
    /// Key name as reported by the browser (`"t"`, `"Home"`, ...).
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyInput {
    #[must_use]
    pub fn plain(key: &str) -> Self {
        Self { key: key.to_owned(), ..Self::default() }
    }

    #[must_use]
    pub fn ctrl(key: &str) -> Self {
        Self { key: key.to_owned(), ctrl: true, ..Self::default() }
    }
}

/// Host-neutral view of a DOM event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    pub kind: EventKind,
    /// Present for `KeyDown` only.
    pub key: Option<KeyInput>,
}

impl UiEvent {
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self { kind, key: None }
    }

    #[must_use]
    pub fn key_down(key: KeyInput) -> Self {
        Self { kind: EventKind::KeyDown, key: Some(key) }
    }
}

/// What a handler wants done with the event's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    PreventDefault,
}

/// Where a listener is attached.
pub enum Target<'a, E> {
    Window,
    Document,
    Element(&'a E),
}

pub type Handler = Box<dyn Fn(&UiEvent) -> EventFlow>;

/// Called once per element entering the viewport. Returning `true` stops
/// observing that element.
pub type VisibilityHandler<E> = Box<dyn Fn(&E) -> bool>;

/// A handle to one element. Cloning yields another handle to the same node.
pub trait Element: Clone + 'static {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);

    /// Replace the whole `class` attribute.
    fn set_class_name(&self, value: &str);
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;

    fn set_style(&self, property: &str, value: &str);
    fn append_child(&self, child: &Self);

    /// First descendant matching `selector`.
    fn query(&self, selector: &str) -> Option<Self>;

    fn bounding_rect(&self) -> Rect;
    /// Distance from the document top to the element's top edge.
    fn offset_top(&self) -> f64;
    fn offset_height(&self) -> f64;

    /// Synthetic activation, dispatching a click to the element's listeners.
    fn click(&self);
    fn focus(&self);
    /// Select the contents of a text field.
    fn select(&self);
    fn set_value(&self, value: &str);
    /// Detach from the document.
    fn remove(&self);

    /// Input, textarea, or content-editable.
    fn is_text_entry(&self) -> bool;
}

/// The document, window, and event loop of one page.
pub trait Dom: Clone + 'static {
    type Element: Element;
    /// Keeps a listener or observer registered; dropping it unregisters.
    type Listener: 'static;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
    fn query(&self, selector: &str) -> Option<Self::Element>;
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;
    /// The `<html>` element.
    fn root(&self) -> Option<Self::Element>;
    fn body(&self) -> Option<Self::Element>;
    fn active_element(&self) -> Option<Self::Element>;

    fn create_element(&self, tag: &str) -> Option<Self::Element>;
    fn prepend_to_body(&self, el: &Self::Element);
    fn append_to_body(&self, el: &Self::Element);
    /// Add a `<style>` with `id` to the head unless one already exists.
    fn inject_style(&self, id: &str, css: &str);

    /// Current vertical scroll offset.
    fn scroll_y(&self) -> f64;
    fn viewport_height(&self) -> f64;
    fn document_height(&self) -> f64;
    /// Smooth-scroll the window to `top`.
    fn scroll_to(&self, top: f64);

    fn page_url(&self) -> String;
    fn page_title(&self) -> String;
    /// Whether the document is currently hidden (background tab).
    fn is_hidden(&self) -> bool;

    fn open_popup(&self, url: &str, target: &str, features: &str) -> Result<(), PageError>;
    /// Copy the current selection with the legacy editing command.
    fn exec_copy(&self) -> Result<(), PageError>;

    /// One-shot timer. Not cancellable.
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>);
    /// Run a task on the UI event loop.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    fn listen(&self, target: Target<'_, Self::Element>, kind: EventKind, handler: Handler) -> Option<Self::Listener>;

    /// Observe viewport intersection for `targets`. Returns `None` when the
    /// host cannot report intersection.
    fn observe_visibility(
        &self,
        targets: &[Self::Element],
        handler: VisibilityHandler<Self::Element>,
    ) -> Option<Self::Listener>;
}
