// SPDX-License-Identifier: MIT
//
// bread-term — Terminal plumbing for the bread line editor.
//
// Three small pieces sit here, below the editing core:
//
// - `ansi`     writes the handful of CSI sequences a single-line redraw needs
// - `input`    turns one raw read (up to three bytes) into a logical key
// - `terminal` switches the tty into non-canonical, no-echo mode and back
//
// Nothing in this crate knows about text storage. The line editor drives
// it through the `Console` trait so the whole edit loop can run against a
// scripted console in tests.

pub mod ansi;
pub mod input;
pub mod terminal;
