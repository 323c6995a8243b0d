//! Clipboard writes with a legacy selection-and-copy fallback.
//!
//! The async Clipboard API is tried first. When it is missing or rejects the
//! write, a temporary offscreen textarea is filled, selected, and copied with
//! the editing command. The textarea is removed on every path.

use futures::future::LocalBoxFuture;

use crate::dom::{Dom, Element};
use crate::error::PageError;

#[cfg(test)]
#[path = "clipboard_test.rs"]
mod clipboard_test;

pub trait Clipboard: 'static {
    fn write_text(&self, text: &str) -> LocalBoxFuture<'static, Result<(), PageError>>;
}

/// Which mechanism ended up copying the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    Clipboard,
    Legacy,
}

/// Copy `text`, falling back to the legacy technique if the clipboard fails.
///
/// Returns the legacy error only when both mechanisms failed.
pub async fn copy_text<D: Dom, C: Clipboard>(dom: &D, clipboard: &C, text: &str) -> Result<CopyMethod, PageError> {
    match clipboard.write_text(text).await {
        Ok(()) => Ok(CopyMethod::Clipboard),
        Err(e) => {
            log::debug!("clipboard write failed, using legacy copy: {e}");
            legacy_copy(dom, text)?;
            Ok(CopyMethod::Legacy)
        }
    }
}

/// Removes the scratch field from the document when dropped.
struct ScratchField<E: Element>(E);

impl<E: Element> Drop for ScratchField<E> {
    fn drop(&mut self) {
        self.0.remove();
    }
}

/// Copy via a temporary offscreen textarea and the editing command.
pub fn legacy_copy<D: Dom>(dom: &D, text: &str) -> Result<(), PageError> {
    let field = dom.create_element("textarea").ok_or(PageError::MissingElement("textarea"))?;
    field.set_value(text);
    field.set_attribute("readonly", "");
    field.set_style("position", "fixed");
    field.set_style("left", "-9999px");
    field.set_style("top", "0");
    dom.append_to_body(&field);

    let scratch = ScratchField(field);
    scratch.0.focus();
    scratch.0.select();
    dom.exec_copy()
}
