//! Page-enhancement behaviors for a blog-style article page.
//!
//! This crate is compiled to WebAssembly and attached to a server-rendered
//! article page. It owns seven small controllers, each bound to its own
//! region of the DOM at startup: theme switching, the scroll-to-top button,
//! social sharing, table-of-contents navigation, the reading progress bar,
//! lazy image reveal, and keyboard shortcuts.
//!
//! Every controller is written against the [`dom::Dom`] trait rather than
//! `web-sys` directly, so the whole page can be mounted and driven in unit
//! tests. The real browser binding lives in [`browser`] behind the `browser`
//! feature.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`page`] | Startup wiring, ready signal, and [`page::PageHandle`] teardown |
//! | [`dom`] | Host seam: elements, events, listeners, timers |
//! | [`theme`] | Light/dark theme flag, icon, and persistence |
//! | [`scroll`] | Scroll-to-top visibility and smooth scroll |
//! | [`share`] | Share pop-ups and copy-link with tooltip |
//! | [`clipboard`] | Async clipboard seam with legacy fallback |
//! | [`navigation`] | Offset smooth scrolling for TOC anchors |
//! | [`progress`] | Injected reading progress bar |
//! | [`images`] | Fade-in of lazily loaded images |
//! | [`keyboard`] | Global shortcuts |
//! | [`prefs`] | Key-value preference store |
//! | [`config`] | Tunables loaded from JSON |
//! | [`styles`] | Stylesheets injected at startup |
//! | [`consts`] | DOM contract: ids, selectors, class names |

pub mod clipboard;
pub mod config;
pub mod consts;
pub mod dom;
pub mod error;
pub mod images;
pub mod keyboard;
pub mod navigation;
pub mod page;
pub mod prefs;
pub mod progress;
pub mod scroll;
pub mod share;
pub mod styles;
pub mod theme;

#[cfg(feature = "browser")]
pub mod browser;

#[cfg(test)]
mod fake_dom;

pub use config::PageConfig;
pub use error::PageError;
pub use page::{PageHandle, mount};
