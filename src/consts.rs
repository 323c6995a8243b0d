//! The DOM contract this crate reads from and writes to.

// ── Element ids ─────────────────────────────────────────────────

pub const THEME_TOGGLE_ID: &str = "themeToggle";
pub const SCROLL_TO_TOP_ID: &str = "scrollToTop";
pub const COPY_LINK_ID: &str = "copyLink";
pub const COPY_TOOLTIP_ID: &str = "copyTooltip";

/// Id given to the injected progress bar track.
pub const PROGRESS_BAR_ID: &str = "readingProgress";

// ── Selectors ───────────────────────────────────────────────────

pub const SHARE_BUTTON_SELECTOR: &str = ".share-btn";
pub const SHARE_BUTTON_CLASS: &str = "share-btn";
pub const TOC_LINK_SELECTOR: &str = ".table-of-contents a[href^=\"#\"]";
pub const ARTICLE_SELECTOR: &str = ".post-content";
pub const SUBTITLE_SELECTOR: &str = ".post-subtitle";
pub const LAZY_IMAGE_SELECTOR: &str = "img[loading=\"lazy\"]";

/// Icon glyph inside the theme toggle.
pub const THEME_ICON_SELECTOR: &str = "i";

// ── Attributes ──────────────────────────────────────────────────

pub const THEME_ATTR: &str = "data-theme";
pub const PLATFORM_ATTR: &str = "data-platform";
pub const CONFIG_ATTR: &str = "data-page-config";

// ── Classes ─────────────────────────────────────────────────────

/// Scroll-to-top button is shown.
pub const VISIBLE_CLASS: &str = "visible";
/// Tooltip is shown.
pub const SHOW_CLASS: &str = "show";
/// Body is wired, and lazy images / subtitle have faded in.
pub const LOADED_CLASS: &str = "loaded";

pub const SUN_ICON_CLASS: &str = "fas fa-sun";
pub const MOON_ICON_CLASS: &str = "fas fa-moon";

pub const PROGRESS_TRACK_CLASS: &str = "reading-progress";
pub const PROGRESS_FILL_CLASS: &str = "reading-progress-fill";

// ── Injected stylesheet ids ─────────────────────────────────────

pub const PROGRESS_STYLE_ID: &str = "reading-progress-styles";
pub const LAZY_IMAGE_STYLE_ID: &str = "lazy-image-styles";
