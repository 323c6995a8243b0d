//! Error type shared by the controllers and host bindings.
//!
//! None of these escape to the host: every controller logs and swallows
//! them. They exist so the fallback paths can match on what went wrong.

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The host exposes no async clipboard (insecure context, old engine).
    #[error("clipboard API unavailable")]
    ClipboardUnavailable,

    /// The async clipboard rejected the write.
    #[error("clipboard write failed: {0}")]
    ClipboardWrite(String),

    /// The selection-and-copy fallback failed.
    #[error("legacy copy failed: {0}")]
    LegacyCopy(String),

    /// The pop-up window could not be opened.
    #[error("popup failed: {0}")]
    Popup(String),

    /// A required element could not be found or created.
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    /// The page configuration could not be parsed.
    #[error("config parse failed: {0}")]
    Config(#[from] serde_json::Error),
}
