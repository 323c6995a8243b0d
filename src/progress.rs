//! Reading progress bar.
//!
//! The bar is synthesized at construction: a fixed track prepended to
//! `<body>` with a fill whose width tracks how far the reader has scrolled
//! through `.post-content`.

use crate::consts::{
    ARTICLE_SELECTOR, PROGRESS_BAR_ID, PROGRESS_FILL_CLASS, PROGRESS_STYLE_ID, PROGRESS_TRACK_CLASS,
};
use crate::dom::{Dom, Element};
use crate::styles::PROGRESS_CSS;

#[cfg(test)]
#[path = "progress_test.rs"]
mod progress_test;

/// Vertical geometry needed to place the reader within an article.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArticleGeometry {
    pub scroll_y: f64,
    pub article_top: f64,
    pub article_height: f64,
    pub viewport_height: f64,
}

impl ArticleGeometry {
    /// Fraction of the article scrolled past, in `[0, 1]`.
    ///
    /// Zero above the article's top edge. An article no taller than the
    /// viewport counts as fully read once its top is reached.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let travelled = self.scroll_y - self.article_top;
        if travelled < 0.0 {
            return 0.0;
        }
        let span = self.article_height - self.viewport_height;
        if span <= 0.0 {
            return 1.0;
        }
        (travelled / span).clamp(0.0, 1.0)
    }
}

/// CSS width for a progress fraction, one decimal place.
#[must_use]
pub fn fill_width(progress: f64) -> String {
    format!("{:.1}%", progress * 100.0)
}

pub struct ReadingProgressManager<D: Dom> {
    dom: D,
    article: Option<D::Element>,
    fill: Option<D::Element>,
}

impl<D: Dom> ReadingProgressManager<D> {
    /// Inject the stylesheet and the bar. Reuses an existing bar.
    pub fn new(dom: &D) -> Self {
        dom.inject_style(PROGRESS_STYLE_ID, PROGRESS_CSS);
        let fill = match dom.element_by_id(PROGRESS_BAR_ID) {
            Some(track) => track.query(&format!(".{PROGRESS_FILL_CLASS}")),
            None => Self::build_bar(dom),
        };
        Self { dom: dom.clone(), article: dom.query(ARTICLE_SELECTOR), fill }
    }

    fn build_bar(dom: &D) -> Option<D::Element> {
        let track = dom.create_element("div")?;
        track.set_attribute("id", PROGRESS_BAR_ID);
        track.set_class_name(PROGRESS_TRACK_CLASS);
        track.set_attribute("role", "progressbar");
        track.set_attribute("aria-label", "Reading progress");
        let fill = dom.create_element("div")?;
        fill.set_class_name(PROGRESS_FILL_CLASS);
        track.append_child(&fill);
        dom.prepend_to_body(&track);
        Some(fill)
    }

    #[must_use]
    pub fn geometry(&self) -> Option<ArticleGeometry> {
        let article = self.article.as_ref()?;
        Some(ArticleGeometry {
            scroll_y: self.dom.scroll_y(),
            article_top: article.offset_top(),
            article_height: article.offset_height(),
            viewport_height: self.dom.viewport_height(),
        })
    }

    pub fn update_progress(&self) {
        let (Some(geometry), Some(fill)) = (self.geometry(), &self.fill) else {
            return;
        };
        fill.set_style("width", &fill_width(geometry.progress()));
    }
}
