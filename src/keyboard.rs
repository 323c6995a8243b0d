//! Global keyboard shortcuts.
//!
//! | Key | Action |
//! |-----|--------|
//! | `t` / `T` | Activate the theme toggle |
//! | `Ctrl+Home` | Smooth-scroll to the top |
//! | `Ctrl+End` | Smooth-scroll to the bottom |
//!
//! Shortcuts are inert while a text field or content-editable region has
//! focus. The theme shortcut clicks the toggle rather than calling into the
//! theme controller, so both paths run the same click handler.

use crate::consts::THEME_TOGGLE_ID;
use crate::dom::{Dom, Element, EventFlow, KeyInput, UiEvent};

#[cfg(test)]
#[path = "keyboard_test.rs"]
mod keyboard_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    ToggleTheme,
    ScrollTop,
    ScrollBottom,
}

impl Shortcut {
    /// Map a key press to a shortcut, ignoring focus.
    #[must_use]
    pub fn resolve(key: &KeyInput) -> Option<Self> {
        match key.key.as_str() {
            "t" | "T" if !key.ctrl && !key.alt && !key.meta => Some(Self::ToggleTheme),
            "Home" if key.ctrl => Some(Self::ScrollTop),
            "End" if key.ctrl => Some(Self::ScrollBottom),
            _ => None,
        }
    }
}

pub struct KeyboardManager<D: Dom> {
    dom: D,
    toggle: Option<D::Element>,
}

impl<D: Dom> KeyboardManager<D> {
    pub fn new(dom: &D) -> Self {
        Self { dom: dom.clone(), toggle: dom.element_by_id(THEME_TOGGLE_ID) }
    }

    fn typing(&self) -> bool {
        self.dom.active_element().is_some_and(|el| el.is_text_entry())
    }

    pub fn handle_key_down(&self, event: &UiEvent) -> EventFlow {
        let Some(key) = &event.key else {
            return EventFlow::Continue;
        };
        if self.typing() {
            return EventFlow::Continue;
        }
        let Some(shortcut) = Shortcut::resolve(key) else {
            return EventFlow::Continue;
        };
        match shortcut {
            Shortcut::ToggleTheme => {
                let Some(toggle) = &self.toggle else {
                    return EventFlow::Continue;
                };
                toggle.click();
            }
            Shortcut::ScrollTop => self.dom.scroll_to(0.0),
            Shortcut::ScrollBottom => self.dom.scroll_to(self.dom.document_height()),
        }
        EventFlow::PreventDefault
    }
}
