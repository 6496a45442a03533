//! Gap buffer — the line's text storage.
//!
//! One owned allocation holds the text in two windows with an unused gap
//! between them:
//!
//! ```text
//!  [ before (pre-cursor) | gap | after (post-cursor) ]
//!    0..gap_start          ..    post_start..capacity
//! ```
//!
//! Everything is addressed by index into a single `Vec<u8>`, so growing the
//! allocation never leaves a dangling window.
//!
//! # Deferred cursor motion
//!
//! Moving the cursor does not touch the bytes. It only adjusts `pending`, a
//! signed distance from the gap to the logical cursor. The gap is slid into
//! place by [`GapBuffer::commit_pending_move`], which every editing
//! operation calls first. Motion is O(1); the O(distance) copy happens only
//! when an edit actually lands at the new position.
//!
//! The buffer is byte-oriented: one byte is one cursor step and one column.

use std::collections::TryReserveError;

use thiserror::Error;
use tracing::debug;

/// Initial capacity used when the caller does not pick one.
pub const DEFAULT_CAPACITY: usize = 64;

/// The backing storage could not be allocated or grown.
#[derive(Debug, Error)]
#[error("cannot allocate {requested} bytes of line storage")]
pub struct GrowError {
    /// Capacity that was being reserved.
    pub requested: usize,
    #[source]
    source: TryReserveError,
}

/// A single line of bytes with a movable edit point.
///
/// Invariants, with `pending` folded in:
///
/// - `gap_start <= post_start <= buf.len()`
/// - `-(gap_start) <= pending <= buf.len() - post_start`
/// - the text is `buf[..gap_start]` followed by `buf[post_start..]`
/// - `buf.len()` is the capacity; it doubles when an insert finds the gap
///   empty and never shrinks
#[derive(Debug, Clone)]
pub struct GapBuffer {
    /// Backing storage. Its length is the capacity; gap bytes are garbage.
    buf: Vec<u8>,
    /// End of the pre-cursor region, start of the gap.
    gap_start: usize,
    /// End of the gap, start of the post-cursor region.
    post_start: usize,
    /// Cursor motion not yet materialised by sliding the gap.
    pending: isize,
}

impl GapBuffer {
    /// Allocate an empty buffer whose gap spans `capacity` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`GrowError`] if the allocation fails.
    pub fn with_capacity(capacity: usize) -> Result<Self, GrowError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity).map_err(|source| GrowError {
            requested: capacity,
            source,
        })?;
        buf.resize(capacity, 0);

        Ok(Self {
            buf,
            gap_start: 0,
            post_start: capacity,
            pending: 0,
        })
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Number of bytes of text (gap excluded).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.gap_start + self.after_len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the backing allocation.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The committed pre-cursor region.
    ///
    /// With a pending move this is where the gap sits, not where the
    /// logical cursor is.
    #[inline]
    #[must_use]
    pub fn before(&self) -> &[u8] {
        &self.buf[..self.gap_start]
    }

    /// The committed post-cursor region.
    #[inline]
    #[must_use]
    pub fn after(&self) -> &[u8] {
        &self.buf[self.post_start..]
    }

    #[inline]
    fn after_len(&self) -> usize {
        self.buf.len() - self.post_start
    }

    /// Signed distance from the gap to the logical cursor.
    #[inline]
    #[must_use]
    pub const fn pending_offset(&self) -> isize {
        self.pending
    }

    /// Logical cursor position as a byte offset into the text.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.gap_start.saturating_add_signed(self.pending)
    }

    /// How many columns the terminal cursor must move left from the end of
    /// the rendered text to reach the logical cursor.
    #[inline]
    #[must_use]
    pub fn cursor_back_columns(&self) -> usize {
        self.len() - self.cursor()
    }

    /// Copy out the text: pre-cursor region followed by post-cursor region.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(self.before());
        out.extend_from_slice(self.after());
        out
    }

    // ── Cursor motion ───────────────────────────────────────────────────

    /// Move the cursor one byte right. No-op at the end of the text.
    #[allow(clippy::cast_possible_wrap)] // Vec lengths never exceed isize::MAX.
    pub fn move_right(&mut self) {
        if self.pending < self.after_len() as isize {
            self.pending += 1;
        }
    }

    /// Move the cursor one byte left. No-op at the start of the text.
    #[allow(clippy::cast_possible_wrap)]
    pub const fn move_left(&mut self) {
        if self.pending > -(self.gap_start as isize) {
            self.pending -= 1;
        }
    }

    /// Put the cursor before the first byte.
    #[allow(clippy::cast_possible_wrap)]
    pub const fn jump_to_start(&mut self) {
        self.pending = -(self.gap_start as isize);
    }

    /// Put the cursor after the last byte.
    #[allow(clippy::cast_possible_wrap)]
    pub fn jump_to_end(&mut self) {
        self.pending = self.after_len() as isize;
    }

    /// Slide the gap to the logical cursor and clear the pending offset.
    ///
    /// Moving left carries the tail of the pre-cursor region to the front
    /// of the post-cursor region; moving right carries the head of the
    /// post-cursor region to the end of the pre-cursor region.
    pub fn commit_pending_move(&mut self) {
        let distance = self.pending.unsigned_abs();

        if self.pending < 0 {
            self.gap_start -= distance;
            self.post_start -= distance;
            self.buf
                .copy_within(self.gap_start..self.gap_start + distance, self.post_start);
        } else if self.pending > 0 {
            self.buf
                .copy_within(self.post_start..self.post_start + distance, self.gap_start);
            self.gap_start += distance;
            self.post_start += distance;
        }

        self.pending = 0;
    }

    // ── Editing ─────────────────────────────────────────────────────────

    /// Insert `byte` at the logical cursor and advance past it.
    ///
    /// Doubles the capacity when the gap is full.
    ///
    /// # Errors
    ///
    /// Returns [`GrowError`] if growing fails; the buffer is unchanged
    /// apart from the committed cursor move.
    pub fn insert(&mut self, byte: u8) -> Result<(), GrowError> {
        self.commit_pending_move();

        if self.gap_start == self.post_start {
            self.grow()?;
        }

        self.buf[self.gap_start] = byte;
        self.gap_start += 1;
        Ok(())
    }

    /// Delete the byte after the cursor. No-op at the end of the text.
    pub fn delete_forward(&mut self) {
        self.commit_pending_move();

        if self.post_start < self.buf.len() {
            self.post_start += 1;
        }
    }

    /// Delete the byte before the cursor. No-op at the start of the text.
    pub fn delete_backward(&mut self) {
        self.commit_pending_move();

        if self.gap_start > 0 {
            self.gap_start -= 1;
        }
    }

    /// Discard the whole line, on both sides of the cursor.
    ///
    /// Bound to the "kill to start of line" command, but the post-cursor
    /// region is discarded too.
    pub fn kill_line(&mut self) {
        self.gap_start = 0;
        self.post_start = self.buf.len();
        self.pending = 0;
    }

    /// Double the allocation, keeping the post-cursor region flush with
    /// the new end.
    fn grow(&mut self) -> Result<(), GrowError> {
        let old_capacity = self.buf.len();
        let new_capacity = old_capacity.saturating_mul(2).max(1);
        let after_len = self.after_len();

        self.buf
            .try_reserve_exact(new_capacity - old_capacity)
            .map_err(|source| GrowError {
                requested: new_capacity,
                source,
            })?;
        self.buf.resize(new_capacity, 0);

        let new_post_start = new_capacity - after_len;
        self.buf.copy_within(self.post_start..old_capacity, new_post_start);
        self.post_start = new_post_start;

        debug!(old_capacity, new_capacity, "line buffer grown");
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
