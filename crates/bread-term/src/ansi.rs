// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. The line
// editor only ever moves the cursor horizontally on its own row, so the set
// is tiny: column moves, erase-to-end-of-line, and the two line-control
// bytes used around each redraw.
//
// All functions return `io::Result` propagated from the underlying writer.
// The editor writes into a `Vec<u8>` frame first, where they never fail.
use std::io::{self, Write};

// ─── Line Control ────────────────────────────────────────────────────────────

/// Return the cursor to column 0 of the current row.
#[inline]
pub fn carriage_return(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\r")
}

/// Finish the current row: carriage return plus line feed.
///
/// Raw mode may have output post-processing disabled, so a bare `\n`
/// would not return to column 0.
#[inline]
pub fn newline(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\r\n")
}

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor `n` columns right (CUF, `CSI n C`).
///
/// Writes nothing for `n == 0`: terminals treat a zero parameter as 1.
#[inline]
pub fn cursor_forward(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}C")
}

/// Move the cursor `n` columns left (CUB, `CSI n D`).
///
/// Writes nothing for `n == 0`, same reasoning as [`cursor_forward`].
#[inline]
pub fn cursor_back(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}D")
}

// ─── Erase ───────────────────────────────────────────────────────────────────

/// Erase from the cursor to the end of the line (EL 0, `CSI K`).
#[inline]
pub fn erase_line_right(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> Vec<u8> {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        out
    }

    #[test]
    fn carriage_return_is_single_byte() {
        assert_eq!(render(|w| carriage_return(w)), b"\r");
    }

    #[test]
    fn newline_is_crlf() {
        assert_eq!(render(|w| newline(w)), b"\r\n");
    }

    #[test]
    fn cursor_forward_formats_count() {
        assert_eq!(render(|w| cursor_forward(w, 2)), b"\x1b[2C");
        assert_eq!(render(|w| cursor_forward(w, 120)), b"\x1b[120C");
    }

    #[test]
    fn cursor_forward_zero_writes_nothing() {
        assert!(render(|w| cursor_forward(w, 0)).is_empty());
    }

    #[test]
    fn cursor_back_formats_count() {
        assert_eq!(render(|w| cursor_back(w, 1)), b"\x1b[1D");
        assert_eq!(render(|w| cursor_back(w, 37)), b"\x1b[37D");
    }

    #[test]
    fn cursor_back_zero_writes_nothing() {
        assert!(render(|w| cursor_back(w, 0)).is_empty());
    }

    #[test]
    fn erase_line_right_sequence() {
        assert_eq!(render(|w| erase_line_right(w)), b"\x1b[K");
    }
}
