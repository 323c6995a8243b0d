//! Fade-in for lazily loaded images.
//!
//! Each `img[loading="lazy"]` is revealed by adding `loaded` the first time
//! it enters the viewport, then dropped from observation. Hosts without
//! intersection support get whatever [`LazyImageFallback`] selects.

use crate::config::LazyImageFallback;
use crate::consts::{LAZY_IMAGE_SELECTOR, LAZY_IMAGE_STYLE_ID, LOADED_CLASS};
use crate::dom::{Dom, Element};
use crate::styles::LAZY_IMAGE_CSS;

#[cfg(test)]
#[path = "images_test.rs"]
mod images_test;

/// How the images ended up being handled at mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealMode {
    /// No lazy images on the page; nothing is observed.
    Idle,
    Observed,
    Eager,
    Unsupported,
}

pub struct ImageManager<D: Dom> {
    images: Vec<D::Element>,
    mode: RevealMode,
    observer: Option<D::Listener>,
}

impl<D: Dom> ImageManager<D> {
    pub fn new(dom: &D, fallback: LazyImageFallback) -> Self {
        dom.inject_style(LAZY_IMAGE_STYLE_ID, LAZY_IMAGE_CSS);
        let images = dom.query_all(LAZY_IMAGE_SELECTOR);
        if images.is_empty() {
            return Self { images, mode: RevealMode::Idle, observer: None };
        }

        let observer = dom.observe_visibility(&images, Box::new(|img: &D::Element| reveal(img)));
        let mode = match (&observer, fallback) {
            (Some(_), _) => RevealMode::Observed,
            (None, LazyImageFallback::Reveal) => {
                for img in &images {
                    reveal(img);
                }
                RevealMode::Eager
            }
            (None, LazyImageFallback::None) => {
                log::warn!("viewport intersection unsupported; {} lazy images stay hidden", images.len());
                RevealMode::Unsupported
            }
        };
        Self { images, mode, observer }
    }

    #[must_use]
    pub fn mode(&self) -> RevealMode {
        self.mode
    }

    pub fn images(&self) -> &[D::Element] {
        &self.images
    }

    /// Stop observing. Images already revealed stay revealed.
    pub fn disconnect(&mut self) {
        self.observer = None;
    }
}

/// Mark `img` loaded. Always asks the observer to stop watching it.
fn reveal<E: Element>(img: &E) -> bool {
    img.add_class(LOADED_CLASS);
    true
}
