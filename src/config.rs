//! Page tunables, deserialized from an optional JSON blob.

use serde::Deserialize;

use crate::error::PageError;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_SCROLL_THRESHOLD_PX: f64 = 300.0;
pub const DEFAULT_HEADER_OFFSET_PX: f64 = 80.0;
pub const DEFAULT_TOOLTIP_HIDE_MS: u32 = 2000;
pub const DEFAULT_TOOLTIP_GAP_PX: f64 = 10.0;
pub const DEFAULT_POPUP_WIDTH: u32 = 600;
pub const DEFAULT_POPUP_HEIGHT: u32 = 400;
pub const DEFAULT_THEME_STORAGE_KEY: &str = "theme";

/// What to do with lazy images when the host cannot report viewport
/// intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LazyImageFallback {
    /// Install nothing; images keep their initial state.
    #[default]
    None,
    /// Mark every lazy image loaded at mount.
    Reveal,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Scroll offset above which the scroll-to-top button shows.
    pub scroll_threshold_px: f64,
    /// Clearance left above a TOC target for the fixed header.
    pub header_offset_px: f64,
    pub tooltip_hide_ms: u32,
    /// Space between the copy button and the tooltip above it.
    pub tooltip_gap_px: f64,
    pub popup_width: u32,
    pub popup_height: u32,
    pub theme_storage_key: String,
    pub lazy_image_fallback: LazyImageFallback,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            scroll_threshold_px: DEFAULT_SCROLL_THRESHOLD_PX,
            header_offset_px: DEFAULT_HEADER_OFFSET_PX,
            tooltip_hide_ms: DEFAULT_TOOLTIP_HIDE_MS,
            tooltip_gap_px: DEFAULT_TOOLTIP_GAP_PX,
            popup_width: DEFAULT_POPUP_WIDTH,
            popup_height: DEFAULT_POPUP_HEIGHT,
            theme_storage_key: DEFAULT_THEME_STORAGE_KEY.to_owned(),
            lazy_image_fallback: LazyImageFallback::None,
        }
    }
}

impl PageConfig {
    /// Parse a JSON object. Missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, PageError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parse an optional JSON blob, falling back to defaults when it is
    /// absent, blank, or malformed.
    #[must_use]
    pub fn from_optional_json(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Self::default();
        };
        match Self::from_json(raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring page config: {e}");
                Self::default()
            }
        }
    }

    /// Window features string for share pop-ups.
    #[must_use]
    pub fn popup_features(&self) -> String {
        format!("width={},height={},noopener,noreferrer", self.popup_width, self.popup_height)
    }
}
