//! Stylesheets injected at startup.

/// Fixed full-width track pinned to the top edge, above every other layer.
pub const PROGRESS_CSS: &str = "\
.reading-progress {
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 3px;
    background: transparent;
    z-index: 2147483647;
    pointer-events: none;
}
.reading-progress-fill {
    height: 100%;
    width: 0%;
    background: var(--accent-color, #3b82f6);
    transition: width 0.1s ease-out;
}
";

/// Lazy images and the subtitle start transparent and fade in on `loaded`.
pub const LAZY_IMAGE_CSS: &str = "\
img[loading=\"lazy\"] {
    opacity: 0;
    transition: opacity 0.3s ease-in;
}
img[loading=\"lazy\"].loaded {
    opacity: 1;
}
.post-subtitle {
    transition: opacity 0.6s ease-in;
}
body:not(.loaded) .post-subtitle {
    opacity: 0;
}
";
