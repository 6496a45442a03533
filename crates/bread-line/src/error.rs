//! Errors surfaced by a line-editing session.
//!
//! No variant carries a partial line. Every variant except
//! `TerminalRestore` aborts the session mid-edit: the buffer is released and
//! the terminal restored before the error reaches the caller.
//! `TerminalRestore` is only returned in strict-restore mode, after the line
//! was finished, and means the terminal may still be in raw mode.

use std::io;

use thiserror::Error;

use crate::gap::GrowError;

#[derive(Debug, Error)]
pub enum ReadLineError {
    /// The terminal attributes could not be queried or switched.
    #[error("failed to set up the terminal: {0}")]
    TerminalSetup(#[source] io::Error),

    /// The original terminal attributes could not be put back after the
    /// line was finished. Only returned with `EditorOptions::strict_restore`.
    #[error("failed to restore the terminal: {0}")]
    TerminalRestore(#[source] io::Error),

    /// The line buffer could not be allocated or grown.
    #[error(transparent)]
    Allocation(#[from] GrowError),

    /// Writing the prompt or a redraw failed, or reading failed for good.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Input reached end of file before Enter was pressed.
    #[error("input closed before the line was finished")]
    InputClosed,
}
