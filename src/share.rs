//! Social share pop-ups and copy-link.
//!
//! Share buttons carry a `data-platform` attribute naming the target. The
//! copy-link button carries none; activating it copies the page URL and
//! flashes a tooltip above the button.

use std::cell::Cell;
use std::rc::Rc;

use futures::FutureExt;

use crate::clipboard::{Clipboard, copy_text};
use crate::config::PageConfig;
use crate::consts::{
    COPY_LINK_ID, COPY_TOOLTIP_ID, PLATFORM_ATTR, SHARE_BUTTON_CLASS, SHARE_BUTTON_SELECTOR, SHOW_CLASS,
};
use crate::dom::{Dom, Element};

#[cfg(test)]
#[path = "share_test.rs"]
mod share_test;

const POPUP_TARGET: &str = "_blank";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    LinkedIn,
    Twitter,
    Facebook,
}

impl SharePlatform {
    /// Parse a `data-platform` value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "linkedin" => Some(Self::LinkedIn),
            "twitter" | "x" => Some(Self::Twitter),
            "facebook" => Some(Self::Facebook),
            _ => None,
        }
    }

    /// Share endpoint for `url`, percent-encoding both parameters.
    #[must_use]
    pub fn share_url(self, url: &str, title: &str) -> String {
        let url = urlencoding::encode(url);
        let title = urlencoding::encode(title);
        match self {
            Self::LinkedIn => format!("https://www.linkedin.com/shareArticle?mini=true&url={url}&title={title}"),
            Self::Twitter => format!("https://twitter.com/intent/tweet?url={url}&text={title}"),
            Self::Facebook => format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
        }
    }
}

pub struct SocialShareManager<D: Dom, C: Clipboard> {
    dom: D,
    clipboard: Rc<C>,
    buttons: Vec<D::Element>,
    copy_button: Option<D::Element>,
    tooltip: Option<D::Element>,
    popup_features: String,
    tooltip_hide_ms: u32,
    tooltip_gap_px: f64,
    /// Bumped per showing; only the latest showing's timer may hide.
    tooltip_generation: Rc<Cell<u64>>,
}

impl<D: Dom, C: Clipboard> SocialShareManager<D, C> {
    pub fn new(dom: &D, clipboard: Rc<C>, config: &PageConfig) -> Self {
        Self {
            dom: dom.clone(),
            clipboard,
            buttons: dom.query_all(SHARE_BUTTON_SELECTOR),
            copy_button: dom.element_by_id(COPY_LINK_ID),
            tooltip: dom.element_by_id(COPY_TOOLTIP_ID),
            popup_features: config.popup_features(),
            tooltip_hide_ms: config.tooltip_hide_ms,
            tooltip_gap_px: config.tooltip_gap_px,
            tooltip_generation: Rc::new(Cell::new(0)),
        }
    }

    /// Every control that needs a click listener: the share buttons, plus the
    /// copy button when it is not itself a share button.
    #[must_use]
    pub fn controls(&self) -> Vec<D::Element> {
        let mut controls = self.buttons.clone();
        if let Some(copy) = &self.copy_button {
            if !copy.has_class(SHARE_BUTTON_CLASS) {
                controls.push(copy.clone());
            }
        }
        controls
    }

    /// React to activation of `control`.
    pub fn handle_share(self: &Rc<Self>, control: &D::Element) {
        if let Some(raw) = control.attribute(PLATFORM_ATTR) {
            match SharePlatform::parse(&raw) {
                Some(platform) => self.open_share(platform),
                None => log::debug!("ignoring unknown share platform {raw:?}"),
            }
            return;
        }
        if control.attribute("id").as_deref() == Some(COPY_LINK_ID) {
            let this = Rc::clone(self);
            let url = self.dom.page_url();
            self.dom.spawn(async move { this.copy_to_clipboard(&url).await }.boxed_local());
        }
    }

    pub fn open_share(&self, platform: SharePlatform) {
        let target = platform.share_url(&self.dom.page_url(), &self.dom.page_title());
        if let Err(e) = self.dom.open_popup(&target, POPUP_TARGET, &self.popup_features) {
            log::warn!("share popup for {platform:?} failed: {e}");
        }
    }

    /// Copy `text` and show the tooltip. Failures are logged, never raised.
    pub async fn copy_to_clipboard(&self, text: &str) {
        match copy_text(&self.dom, &*self.clipboard, text).await {
            Ok(_) => self.show_tooltip(),
            Err(e) => log::warn!("copy link failed: {e}"),
        }
    }

    /// Center the tooltip above the copy button and hide it again later.
    ///
    /// Hide timers are never cancelled. A timer left over from an earlier
    /// showing is stale and leaves the tooltip alone.
    pub fn show_tooltip(&self) {
        let Some(tooltip) = &self.tooltip else {
            return;
        };
        if let Some(anchor) = &self.copy_button {
            let rect = anchor.bounding_rect();
            let tip = tooltip.bounding_rect();
            let left = rect.left + rect.width / 2.0 - tip.width / 2.0;
            let top = rect.top - tip.height - self.tooltip_gap_px;
            tooltip.set_style("position", "fixed");
            tooltip.set_style("left", &format!("{left}px"));
            tooltip.set_style("top", &format!("{top}px"));
        }
        tooltip.add_class(SHOW_CLASS);

        let generation = self.tooltip_generation.get().wrapping_add(1);
        self.tooltip_generation.set(generation);

        let tooltip = tooltip.clone();
        let latest = Rc::clone(&self.tooltip_generation);
        self.dom.set_timeout(
            self.tooltip_hide_ms,
            Box::new(move || {
                if latest.get() == generation {
                    tooltip.remove_class(SHOW_CLASS);
                }
            }),
        );
    }
}
