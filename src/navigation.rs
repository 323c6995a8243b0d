//! Table-of-contents links.
//!
//! Clicks on in-page anchors are intercepted and replaced with a smooth
//! scroll that leaves room for the fixed header. A link whose target does not
//! exist is swallowed without scrolling.

use crate::consts::TOC_LINK_SELECTOR;
use crate::dom::{Dom, Element, EventFlow};

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

/// Element id named by an in-page `href`, percent-decoded.
#[must_use]
pub fn fragment_id(href: &str) -> Option<String> {
    let raw = href.strip_prefix('#')?;
    if raw.is_empty() {
        return None;
    }
    match urlencoding::decode(raw) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(raw.to_owned()),
    }
}

pub struct NavigationManager<D: Dom> {
    dom: D,
    links: Vec<D::Element>,
    header_offset: f64,
}

impl<D: Dom> NavigationManager<D> {
    pub fn new(dom: &D, header_offset: f64) -> Self {
        Self { dom: dom.clone(), links: dom.query_all(TOC_LINK_SELECTOR), header_offset }
    }

    pub fn links(&self) -> &[D::Element] {
        &self.links
    }

    /// Scroll to the link's target. Always suppresses default navigation.
    pub fn handle_click(&self, link: &D::Element) -> EventFlow {
        let target = link
            .attribute("href")
            .as_deref()
            .and_then(fragment_id)
            .and_then(|id| self.dom.element_by_id(&id));
        match target {
            Some(el) => self.dom.scroll_to(el.offset_top() - self.header_offset),
            None => log::debug!("toc link has no target"),
        }
        EventFlow::PreventDefault
    }
}
