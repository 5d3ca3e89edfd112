//! Clipboard functionality for copying calculator results.

use super::number::Number;
use anyhow::Context;
use arboard::Clipboard;

/// Copy the raw form of `value` to the system clipboard.
pub fn copy_to_clipboard(value: &Number) -> anyhow::Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(value.clipboard_text())
        .context("Failed to copy to clipboard")?;
    tracing::debug!(%value, "Copied result to clipboard");
    Ok(())
}
