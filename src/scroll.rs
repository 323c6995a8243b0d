//! Scroll-to-top button.

use crate::consts::{SCROLL_TO_TOP_ID, VISIBLE_CLASS};
use crate::dom::{Dom, Element};

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

/// Whether the button shows at `offset`. Strictly above the threshold.
#[must_use]
pub fn is_past_threshold(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

pub struct ScrollManager<D: Dom> {
    dom: D,
    button: Option<D::Element>,
    threshold: f64,
}

impl<D: Dom> ScrollManager<D> {
    pub fn new(dom: &D, threshold: f64) -> Self {
        Self { dom: dom.clone(), button: dom.element_by_id(SCROLL_TO_TOP_ID), threshold }
    }

    pub fn button(&self) -> Option<&D::Element> {
        self.button.as_ref()
    }

    pub fn handle_scroll(&self) {
        let Some(button) = &self.button else {
            return;
        };
        if is_past_threshold(self.dom.scroll_y(), self.threshold) {
            button.add_class(VISIBLE_CLASS);
        } else {
            button.remove_class(VISIBLE_CLASS);
        }
    }

    pub fn scroll_to_top(&self) {
        self.dom.scroll_to(0.0);
    }
}
