//! Prompt width accounting.
//!
//! The prompt is written to the terminal verbatim, but the redraw needs to
//! know which column the editable text starts in. Bytes between an
//! invisible-start and invisible-end marker (typically colour escapes) take
//! no column; the markers themselves take none either. Every other byte
//! counts as one column.

use crate::options::EditorOptions;

/// Number of terminal columns the prompt occupies.
///
/// An unterminated invisible run extends to the end of the prompt. An end
/// marker outside a run is ignored.
#[must_use]
pub fn visible_width(prompt: &[u8], options: &EditorOptions) -> usize {
    let mut counting = true;
    let mut width = 0;

    for &byte in prompt {
        if byte == options.invisible_start {
            counting = false;
        } else if byte == options.invisible_end {
            counting = true;
        } else if counting {
            width += 1;
        }
    }

    width
}
