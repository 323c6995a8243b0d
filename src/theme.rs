//! Light/dark theme flag.
//!
//! The flag is reflected in two places, the `data-theme` attribute on `<html>`
//! and the toggle's icon glyph, and persisted through a [`PreferenceStore`].
//! Both reflections are written inside [`ThemeManager::set_theme`] before it
//! returns, so no caller can observe them out of sync with the flag.

use std::cell::Cell;

use crate::consts::{MOON_ICON_CLASS, SUN_ICON_CLASS, THEME_ATTR, THEME_ICON_SELECTOR, THEME_TOGGLE_ID};
use crate::dom::{Dom, Element};
use crate::prefs::PreferenceStore;

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored value. Anything unrecognized is light.
    #[must_use]
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon offering the other mode: a sun while dark, a moon while light.
    #[must_use]
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Dark => SUN_ICON_CLASS,
            Self::Light => MOON_ICON_CLASS,
        }
    }
}

pub struct ThemeManager<D: Dom, S: PreferenceStore> {
    root: Option<D::Element>,
    toggle: Option<D::Element>,
    icon: Option<D::Element>,
    store: S,
    storage_key: String,
    current: Cell<Theme>,
}

impl<D: Dom, S: PreferenceStore> ThemeManager<D, S> {
    /// Bind to `#themeToggle` and apply the stored theme (light if none).
    pub fn new(dom: &D, store: S, storage_key: &str) -> Self {
        let toggle = dom.element_by_id(THEME_TOGGLE_ID);
        let icon = toggle.as_ref().and_then(|t| t.query(THEME_ICON_SELECTOR));
        let initial = Theme::from_stored(store.get(storage_key).as_deref());
        let manager = Self {
            root: dom.root(),
            toggle,
            icon,
            store,
            storage_key: storage_key.to_owned(),
            current: Cell::new(initial),
        };
        manager.apply(initial);
        manager
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.current.get()
    }

    /// The toggle control, if the page has one.
    pub fn toggle_element(&self) -> Option<&D::Element> {
        self.toggle.as_ref()
    }

    /// Apply `theme` and persist it as the user's choice.
    pub fn set_theme(&self, theme: Theme) {
        self.apply(theme);
        self.store.set(&self.storage_key, theme.as_str());
    }

    /// Root attribute, icon and state only. Loading never writes the store.
    fn apply(&self, theme: Theme) {
        if let Some(root) = &self.root {
            root.set_attribute(THEME_ATTR, theme.as_str());
        }
        if let Some(icon) = &self.icon {
            icon.set_class_name(theme.icon_class());
        }
        self.current.set(theme);
    }

    pub fn toggle_theme(&self) {
        let next = self.current().opposite();
        log::debug!("theme -> {}", next.as_str());
        self.set_theme(next);
    }
}
