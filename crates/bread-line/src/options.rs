//! Session options.
//!
//! | Option              | Default | Meaning                                   |
//! |---------------------|---------|-------------------------------------------|
//! | `initial_capacity`  | 64      | Bytes allocated for the line up front     |
//! | `invisible_start`   | `0x01`  | Prompt byte that opens a zero-width run   |
//! | `invisible_end`     | `0x02`  | Prompt byte that closes a zero-width run  |
//! | `strict_restore`    | `false` | Fail the read if the tty is not restored  |
//!
//! The marker defaults are the same bytes readline uses, so prompts built
//! for it (e.g. wrapping colour escapes in `\x01 ... \x02`) measure the
//! same here.

use crate::gap::DEFAULT_CAPACITY;

/// Default byte that starts an invisible prompt run.
pub const INVISIBLE_START: u8 = 0x01;

/// Default byte that ends an invisible prompt run.
pub const INVISIBLE_END: u8 = 0x02;

/// Per-session configuration for the line editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Capacity of the gap buffer when a session starts. Zero is allowed;
    /// the first insert grows it.
    pub initial_capacity: usize,
    /// Prompt byte that stops the visible-width count.
    pub invisible_start: u8,
    /// Prompt byte that resumes the visible-width count.
    pub invisible_end: u8,
    /// Return [`TerminalRestore`](crate::error::ReadLineError::TerminalRestore)
    /// instead of the line when the terminal attributes cannot be put back
    /// after Enter. Off by default: the failure is logged and the line kept.
    pub strict_restore: bool,
}

impl EditorOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            invisible_start: INVISIBLE_START,
            invisible_end: INVISIBLE_END,
            strict_restore: false,
        }
    }

    #[must_use]
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Use a different pair of invisible-region marker bytes.
    #[must_use]
    pub const fn with_invisible_markers(mut self, start: u8, end: u8) -> Self {
        self.invisible_start = start;
        self.invisible_end = end;
        self
    }

    #[must_use]
    pub const fn with_strict_restore(mut self, strict: bool) -> Self {
        self.strict_restore = strict;
        self
    }
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self::new()
    }
}
