//! Startup wiring for the seven page controllers.
//!
//! [`mount`] builds every controller once and registers all of their
//! listeners here, in one place. Controllers never reference each other; the
//! only cross-path is the keyboard shortcut clicking the theme toggle, which
//! goes through the DOM like a real click.
//!
//! The returned [`PageHandle`] owns every listener. Dropping it, or calling
//! [`PageHandle::detach`], unregisters them all.

use std::rc::Rc;

use crate::clipboard::Clipboard;
use crate::config::PageConfig;
use crate::consts::{LOADED_CLASS, SUBTITLE_SELECTOR};
use crate::dom::{Dom, Element, EventFlow, EventKind, Handler, Target, UiEvent};
use crate::images::ImageManager;
use crate::keyboard::KeyboardManager;
use crate::navigation::NavigationManager;
use crate::prefs::PreferenceStore;
use crate::progress::ReadingProgressManager;
use crate::scroll::ScrollManager;
use crate::share::SocialShareManager;
use crate::theme::ThemeManager;

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

/// The mounted page. Holds the controllers and keeps their listeners alive.
pub struct PageHandle<D: Dom, S: PreferenceStore, C: Clipboard> {
    pub theme: Rc<ThemeManager<D, S>>,
    pub scroll: Rc<ScrollManager<D>>,
    pub share: Rc<SocialShareManager<D, C>>,
    pub navigation: Rc<NavigationManager<D>>,
    pub progress: Rc<ReadingProgressManager<D>>,
    pub images: ImageManager<D>,
    pub keyboard: Rc<KeyboardManager<D>>,
    listeners: Vec<D::Listener>,
}

impl<D: Dom, S: PreferenceStore, C: Clipboard> PageHandle<D, S, C> {
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Unregister every listener and stop observing images.
    pub fn detach(mut self) {
        log::debug!("detaching {} page listeners", self.listeners.len());
        self.listeners.clear();
        self.images.disconnect();
    }
}

/// Collects listener guards while wiring.
struct Wiring<'a, D: Dom> {
    dom: &'a D,
    listeners: Vec<D::Listener>,
}

impl<D: Dom> Wiring<'_, D> {
    fn on(&mut self, target: Target<'_, D::Element>, kind: EventKind, handler: Handler) {
        match self.dom.listen(target, kind, handler) {
            Some(listener) => self.listeners.push(listener),
            None => log::warn!("could not register {} listener", kind.as_str()),
        }
    }
}

/// Build all controllers against `dom` and register their listeners.
pub fn mount<D, S, C>(dom: &D, store: S, clipboard: C, config: &PageConfig) -> PageHandle<D, S, C>
where
    D: Dom,
    S: PreferenceStore,
    C: Clipboard,
{
    let theme = Rc::new(ThemeManager::new(dom, store, &config.theme_storage_key));
    let scroll = Rc::new(ScrollManager::new(dom, config.scroll_threshold_px));
    let share = Rc::new(SocialShareManager::new(dom, Rc::new(clipboard), config));
    let navigation = Rc::new(NavigationManager::new(dom, config.header_offset_px));
    let progress = Rc::new(ReadingProgressManager::new(dom));
    let images = ImageManager::new(dom, config.lazy_image_fallback);
    let keyboard = Rc::new(KeyboardManager::new(dom));

    let mut wiring = Wiring { dom, listeners: Vec::new() };

    if let Some(toggle) = theme.toggle_element() {
        let theme = Rc::clone(&theme);
        wiring.on(
            Target::Element(toggle),
            EventKind::Click,
            Box::new(move |_: &UiEvent| {
                theme.toggle_theme();
                EventFlow::Continue
            }),
        );
    }

    {
        let scroll = Rc::clone(&scroll);
        wiring.on(
            Target::Window,
            EventKind::Scroll,
            Box::new(move |_: &UiEvent| {
                scroll.handle_scroll();
                EventFlow::Continue
            }),
        );
    }
    if let Some(button) = scroll.button() {
        let scroll = Rc::clone(&scroll);
        wiring.on(
            Target::Element(button),
            EventKind::Click,
            Box::new(move |_: &UiEvent| {
                scroll.scroll_to_top();
                EventFlow::Continue
            }),
        );
    }

    for control in share.controls() {
        let share = Rc::clone(&share);
        let activated = control.clone();
        wiring.on(
            Target::Element(&control),
            EventKind::Click,
            Box::new(move |_: &UiEvent| {
                share.handle_share(&activated);
                EventFlow::PreventDefault
            }),
        );
    }

    for link in navigation.links() {
        let navigation = Rc::clone(&navigation);
        let clicked = link.clone();
        wiring.on(Target::Element(link), EventKind::Click, Box::new(move |_: &UiEvent| navigation.handle_click(&clicked)));
    }

    for kind in [EventKind::Scroll, EventKind::Resize] {
        let progress = Rc::clone(&progress);
        wiring.on(
            Target::Window,
            kind,
            Box::new(move |_: &UiEvent| {
                progress.update_progress();
                EventFlow::Continue
            }),
        );
    }

    {
        let dom = dom.clone();
        let scroll = Rc::clone(&scroll);
        let progress = Rc::clone(&progress);
        wiring.on(
            Target::Document,
            EventKind::VisibilityChange,
            Box::new(move |_: &UiEvent| {
                if !dom.is_hidden() {
                    scroll.handle_scroll();
                    progress.update_progress();
                }
                EventFlow::Continue
            }),
        );
    }

    {
        let keyboard = Rc::clone(&keyboard);
        wiring.on(Target::Document, EventKind::KeyDown, Box::new(move |event: &UiEvent| keyboard.handle_key_down(event)));
    }

    let listeners = wiring.listeners;

    scroll.handle_scroll();
    progress.update_progress();
    mark_ready(dom);
    log::debug!("page mounted with {} listeners", listeners.len());

    PageHandle { theme, scroll, share, navigation, progress, images, keyboard, listeners }
}

/// Signal that enhancement is wired: `loaded` on body and subtitle.
pub fn mark_ready<D: Dom>(dom: &D) {
    if let Some(body) = dom.body() {
        body.add_class(LOADED_CLASS);
    }
    if let Some(subtitle) = dom.query(SUBTITLE_SELECTOR) {
        subtitle.add_class(LOADED_CLASS);
    }
}
