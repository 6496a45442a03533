//! # bread-line — Line editing core for bread
//!
//! - **[`gap`]** — `GapBuffer`, the byte storage with a deferred-commit cursor
//! - **[`prompt`]** — visible-width accounting for prompts with invisible runs
//! - **[`options`]** — `EditorOptions` (initial capacity, prompt markers)
//! - **[`editor`]** — `LineEditor`, the read/decode/apply/redraw loop
//! - **[`error`]** — `ReadLineError`
//!
//! Terminal access goes through `bread_term::terminal::Console`; the
//! [`read_line`] shortcut uses the process terminal with default options.

pub mod editor;
pub mod error;
pub mod gap;
pub mod options;
pub mod prompt;

use crate::editor::LineEditor;
use crate::error::ReadLineError;

/// Read one line from the process terminal, showing `prompt` first.
///
/// Returns the line without its trailing newline.
///
/// # Errors
///
/// See [`LineEditor::read_line_bytes`].
pub fn read_line(prompt: &str) -> Result<String, ReadLineError> {
    LineEditor::new().read_line(prompt)
}
