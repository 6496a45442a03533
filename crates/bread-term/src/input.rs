// SPDX-License-Identifier: MIT
//
// Raw key decoding.
//
// Each call performs exactly one `read()` of at most three bytes and turns
// whatever arrived into one logical [`Key`]. Three bytes is enough for the
// only multi-byte input we understand, the cursor keys `ESC [ A..D`.
// Longer sequences (function keys, modified arrows) are not recognised,
// and when a single read delivers several ordinary bytes only the first
// one is acted on.
//
// Decoding is a pure function over `&[u8]`: no buffering between calls,
// no allocation, constant time.

use std::io::{self, Read};

use tracing::{debug, trace};

/// Escape (0x1B), the first byte of every cursor-key sequence.
pub const ESC: u8 = 0x1B;

/// DEL (0x7F), sent by most terminals for the Backspace key.
pub const DEL: u8 = 0x7F;

/// Upper bound on bytes consumed per read.
pub const MAX_KEY_LEN: usize = 3;

/// The control byte for `Ctrl+letter`: the low five bits of the letter.
///
/// Case does not matter: `ctrl(b'a') == ctrl(b'A') == 0x01`,
/// `ctrl(b'u') == 0x15`. Defined for every byte.
#[inline]
#[must_use]
pub const fn ctrl(letter: u8) -> u8 {
    letter & 0x1F
}

// ─── Key ─────────────────────────────────────────────────────────────────────

/// One logical key produced by a single read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Any byte outside the C0 control range, delivered verbatim.
    ///
    /// This includes DEL (0x7F) and bytes >= 0x80; the editor works on
    /// bytes, not characters.
    Byte(u8),
    /// A C0 control byte (0x00..=0x1F), e.g. `Ctrl+A` (0x01) or LF (0x0A).
    Control(u8),
    /// Nothing to act on: an empty read, a transient read error, or an
    /// unrecognised `ESC [` sequence.
    Nothing,
    /// `ESC [ A`
    Up,
    /// `ESC [ B`
    Down,
    /// `ESC [ C`
    Right,
    /// `ESC [ D`
    Left,
}

impl Key {
    /// Classify a single raw byte.
    #[inline]
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x00..=0x1F => Self::Control(byte),
            _ => Self::Byte(byte),
        }
    }

    /// Whether this key terminates the line (LF, or CR when the terminal
    /// does not translate it).
    #[inline]
    #[must_use]
    pub const fn is_enter(self) -> bool {
        matches!(self, Self::Control(b'\n' | b'\r'))
    }
}

// ─── Decoding ────────────────────────────────────────────────────────────────

/// Decode the bytes of one read into a key.
///
/// - No bytes: [`Key::Nothing`].
/// - Fewer than three bytes, or anything not starting with `ESC [`: the
///   first byte, classified by [`Key::from_byte`]; the rest are dropped.
/// - `ESC [ A`/`B`/`C`/`D`: the matching arrow; any other final byte
///   yields [`Key::Nothing`].
#[must_use]
pub fn decode(bytes: &[u8]) -> Key {
    match *bytes {
        [] => Key::Nothing,
        [ESC, b'[', last] => match last {
            b'A' => Key::Up,
            b'B' => Key::Down,
            b'C' => Key::Right,
            b'D' => Key::Left,
            _ => Key::Nothing,
        },
        [first, ..] => Key::from_byte(first),
    }
}

/// Perform one read of up to [`MAX_KEY_LEN`] bytes and decode it.
///
/// Returns `Ok(None)` when the source is at end of input, so callers can
/// stop instead of polling a closed stream forever. Interrupted and
/// would-block reads decode as [`Key::Nothing`].
///
/// # Errors
///
/// Any other read error is returned unchanged.
pub fn read_key(src: &mut impl Read) -> io::Result<Option<Key>> {
    let mut buf = [0u8; MAX_KEY_LEN];

    match src.read(&mut buf) {
        Ok(0) => Ok(None),
        Ok(n) => {
            let key = decode(&buf[..n]);
            trace!(bytes = ?&buf[..n], ?key, "decoded key");
            Ok(Some(key))
        }
        Err(e) if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) => {
            debug!(error = %e, "transient read error, no key");
            Ok(Some(Key::Nothing))
        }
        Err(e) => Err(e),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// A reader that hands out one scripted result per `read()` call.
    struct Chunks(Vec<io::Result<Vec<u8>>>);

    impl Read for Chunks {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Ok(0);
            }
            let chunk = self.0.remove(0)?;
            let n = chunk.len().min(buf.len());
            buf[..n].copy_from_slice(&chunk[..n]);
            Ok(n)
        }
    }

    // ── ctrl ──────────────────────────────────────────────────────────

    #[test]
    fn ctrl_maps_letters_to_c0() {
        assert_eq!(ctrl(b'a'), 0x01);
        assert_eq!(ctrl(b'b'), 0x02);
        assert_eq!(ctrl(b'h'), 0x08);
        assert_eq!(ctrl(b'u'), 0x15);
        assert_eq!(ctrl(b'z'), 0x1A);
    }

    #[test]
    fn ctrl_ignores_case_and_never_overflows() {
        assert_eq!(ctrl(b'A'), ctrl(b'a'));
        assert_eq!(ctrl(b'U'), 0x15);
        assert_eq!(ctrl(b'@'), 0x00);
        assert_eq!(ctrl(0x00), 0x00);
        for byte in 0..=u8::MAX {
            assert!(ctrl(byte) <= 0x1F);
        }
    }

    // ── Single bytes ─────────────────────────────────────────────────

    #[test]
    fn empty_read_is_nothing() {
        assert_eq!(decode(b""), Key::Nothing);
    }

    #[test]
    fn short_read_printable() {
        assert_eq!(decode(b"a"), Key::Byte(b'a'));
    }

    #[test]
    fn short_read_control() {
        assert_eq!(decode(&[0x01]), Key::Control(ctrl(b'a')));
    }

    #[test]
    fn del_is_a_plain_byte() {
        assert_eq!(decode(&[DEL]), Key::Byte(DEL));
    }

    #[test]
    fn high_bytes_are_plain_bytes() {
        assert_eq!(decode(&[0xC3]), Key::Byte(0xC3));
    }

    #[test]
    fn lone_escape_is_control() {
        assert_eq!(decode(&[ESC]), Key::Control(ESC));
    }

    #[test]
    fn two_byte_csi_prefix_returns_escape() {
        assert_eq!(decode(b"\x1b["), Key::Control(ESC));
    }

    #[test]
    fn linefeed_and_carriage_return_are_enter() {
        assert!(decode(b"\n").is_enter());
        assert!(decode(b"\r").is_enter());
        assert!(!decode(b"a").is_enter());
    }

    // ── Three-byte reads ─────────────────────────────────────────────

    #[test]
    fn arrow_keys() {
        assert_eq!(decode(b"\x1b[A"), Key::Up);
        assert_eq!(decode(b"\x1b[B"), Key::Down);
        assert_eq!(decode(b"\x1b[C"), Key::Right);
        assert_eq!(decode(b"\x1b[D"), Key::Left);
    }

    #[test]
    fn unknown_csi_final_is_nothing() {
        assert_eq!(decode(b"\x1b[Z"), Key::Nothing);
        assert_eq!(decode(b"\x1b[1"), Key::Nothing);
    }

    #[test]
    fn ss3_prefix_is_not_an_arrow() {
        // ESC O A is not recognised: the first byte comes back verbatim.
        assert_eq!(decode(b"\x1bOA"), Key::Control(ESC));
    }

    #[test]
    fn three_plain_bytes_keep_only_first() {
        assert_eq!(decode(b"abc"), Key::Byte(b'a'));
    }

    // ── Key helpers ──────────────────────────────────────────────────

    #[test]
    fn from_byte_boundaries() {
        assert_eq!(Key::from_byte(0x00), Key::Control(0x00));
        assert_eq!(Key::from_byte(0x1F), Key::Control(0x1F));
        assert_eq!(Key::from_byte(0x20), Key::Byte(b' '));
    }

    // ── read_key ─────────────────────────────────────────────────────

    #[test]
    fn read_key_decodes_one_chunk_per_call() {
        let mut src = Chunks(vec![Ok(b"h".to_vec()), Ok(b"\x1b[D".to_vec())]);
        assert_eq!(read_key(&mut src).unwrap(), Some(Key::Byte(b'h')));
        assert_eq!(read_key(&mut src).unwrap(), Some(Key::Left));
    }

    #[test]
    fn read_key_reads_at_most_three_bytes() {
        let mut src = Chunks(vec![Ok(b"\x1b[CX".to_vec())]);
        assert_eq!(read_key(&mut src).unwrap(), Some(Key::Right));
    }

    #[test]
    fn read_key_eof_is_none() {
        let mut src = Chunks(Vec::new());
        assert_eq!(read_key(&mut src).unwrap(), None);
    }

    #[test]
    fn read_key_interrupted_is_nothing() {
        let mut src = Chunks(vec![Err(io::ErrorKind::Interrupted.into())]);
        assert_eq!(read_key(&mut src).unwrap(), Some(Key::Nothing));
    }

    #[test]
    fn read_key_propagates_hard_errors() {
        let mut src = Chunks(vec![Err(io::Error::other("gone"))]);
        assert!(read_key(&mut src).is_err());
    }
}
