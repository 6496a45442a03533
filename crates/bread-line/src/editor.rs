//! Line editor — the read, decode, apply, redraw loop.
//!
//! A session runs from the moment the prompt is written until Enter:
//!
//! ```text
//!   read ≤3 bytes → decode → apply to GapBuffer → redraw row
//!        ↑                                              │
//!        └──────────────────────────────────────────────┘
//! ```
//!
//! # Key bindings
//!
//! | Key                     | Effect                           |
//! |-------------------------|----------------------------------|
//! | Enter (`\n` or `\r`)    | finish the line                  |
//! | Left, `Ctrl-B`          | cursor one byte left             |
//! | Right, `Ctrl-F`         | cursor one byte right            |
//! | Up, `Ctrl-A`            | cursor to start of line          |
//! | Down, `Ctrl-E`          | cursor to end of line            |
//! | `Ctrl-D`                | delete byte after cursor         |
//! | `Ctrl-U`                | discard the whole line           |
//! | `Ctrl-H`, DEL (`0x7F`)  | delete byte before cursor        |
//! | anything else           | inserted at the cursor verbatim  |
//!
//! # Redraw
//!
//! Every key except Enter redraws the row in one write:
//! `\r`, `CSI <prompt width> C`, `CSI K`, the text before the gap, the text
//! after the gap, then `CSI n D` to pull the terminal cursor back to the
//! logical cursor. The gap buffer may still hold an uncommitted move at that
//! point; the escape sequence positions the cursor without it.

use bread_term::ansi;
use bread_term::input::{ctrl, read_key, Key, DEL};
use bread_term::terminal::{Console, RawModeGuard, StdConsole};
use tracing::{debug, warn};

use crate::error::ReadLineError;
use crate::gap::{GapBuffer, GrowError};
use crate::options::EditorOptions;
use crate::prompt::visible_width;

const CTRL_A: u8 = ctrl(b'a');
const CTRL_B: u8 = ctrl(b'b');
const CTRL_D: u8 = ctrl(b'd');
const CTRL_E: u8 = ctrl(b'e');
const CTRL_F: u8 = ctrl(b'f');
const CTRL_H: u8 = ctrl(b'h');
const CTRL_U: u8 = ctrl(b'u');

// ─── LineEditor ──────────────────────────────────────────────────────────────

/// Reads single lines from a [`Console`].
///
/// Holds no state between calls other than the console and the options:
/// every [`read_line`](Self::read_line) is an independent session with a
/// fresh buffer.
///
/// # Example
///
/// ```no_run
/// use bread_line::editor::LineEditor;
///
/// let mut editor = LineEditor::new();
/// let line = editor.read_line("> ")?;
/// println!("you typed {line:?}");
/// # Ok::<(), bread_line::error::ReadLineError>(())
/// ```
pub struct LineEditor<C: Console> {
    console: C,
    options: EditorOptions,
}

impl LineEditor<StdConsole> {
    /// Editor on the process terminal with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_console(StdConsole::new(), EditorOptions::default())
    }
}

impl Default for LineEditor<StdConsole> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Console> LineEditor<C> {
    pub const fn with_console(console: C, options: EditorOptions) -> Self {
        Self { console, options }
    }

    #[must_use]
    pub const fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub const fn options_mut(&mut self) -> &mut EditorOptions {
        &mut self.options
    }

    #[must_use]
    pub const fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Show `prompt`, edit a line, and return it without the newline.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    ///
    /// # Errors
    ///
    /// See [`read_line_bytes`](Self::read_line_bytes).
    pub fn read_line(&mut self, prompt: &str) -> Result<String, ReadLineError> {
        let line = self.read_line_bytes(prompt.as_bytes())?;
        Ok(match String::from_utf8(line) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    /// Byte-exact variant of [`read_line`](Self::read_line).
    ///
    /// # Errors
    ///
    /// - [`ReadLineError::TerminalSetup`] if raw mode cannot be entered
    /// - [`ReadLineError::Allocation`] if the line buffer cannot be allocated
    ///   or grown
    /// - [`ReadLineError::InputClosed`] if input ends before Enter
    /// - [`ReadLineError::Io`] if writing fails or reading fails for good
    ///
    /// - [`ReadLineError::TerminalRestore`] if the terminal cannot be
    ///   restored after a completed line and
    ///   [`EditorOptions::strict_restore`] is set
    ///
    /// The terminal is restored before any of the others is returned.
    /// Without `strict_restore`, a failure to restore after a completed line
    /// is logged and the line is returned anyway.
    pub fn read_line_bytes(&mut self, prompt: &[u8]) -> Result<Vec<u8>, ReadLineError> {
        self.console.write_all(prompt)?;
        self.console.flush()?;

        let prompt_width = visible_width(prompt, &self.options);
        let capacity = self.options.initial_capacity;

        let mut guard =
            RawModeGuard::enter(&mut self.console).map_err(ReadLineError::TerminalSetup)?;

        let mut session = Session::new(prompt_width, capacity)?;
        debug!(prompt_width, capacity, "line session started");

        let line = session.run(&mut *guard)?;
        debug!(len = line.len(), "line session finished");

        if let Err(e) = guard.restore() {
            if self.options.strict_restore {
                return Err(ReadLineError::TerminalRestore(e));
            }
            warn!(error = %e, "failed to restore terminal attributes");
        }

        Ok(line)
    }
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Editing,
    Done,
}

/// One prompt-to-Enter editing session.
struct Session {
    buffer: GapBuffer,
    prompt_width: usize,
    state: State,
}

impl Session {
    fn new(prompt_width: usize, capacity: usize) -> Result<Self, GrowError> {
        Ok(Self {
            buffer: GapBuffer::with_capacity(capacity)?,
            prompt_width,
            state: State::Editing,
        })
    }

    /// Drive the loop until Enter, then hand back the text.
    fn run(&mut self, console: &mut impl Console) -> Result<Vec<u8>, ReadLineError> {
        while self.state == State::Editing {
            let key = read_key(console)?.ok_or(ReadLineError::InputClosed)?;
            self.apply(key)?;

            let mut frame = Vec::with_capacity(self.buffer.len() + 16);
            match self.state {
                State::Editing => self.render(&mut frame)?,
                State::Done => ansi::newline(&mut frame)?,
            }
            console.write_all(&frame)?;
            console.flush()?;
        }

        Ok(self.buffer.to_bytes())
    }

    /// Apply one key to the buffer.
    fn apply(&mut self, key: Key) -> Result<(), GrowError> {
        match key {
            k if k.is_enter() => self.state = State::Done,
            Key::Nothing => {}
            Key::Left | Key::Control(CTRL_B) => self.buffer.move_left(),
            Key::Right | Key::Control(CTRL_F) => self.buffer.move_right(),
            Key::Up | Key::Control(CTRL_A) => self.buffer.jump_to_start(),
            Key::Down | Key::Control(CTRL_E) => self.buffer.jump_to_end(),
            Key::Control(CTRL_D) => self.buffer.delete_forward(),
            Key::Control(CTRL_U) => self.buffer.kill_line(),
            Key::Control(CTRL_H) | Key::Byte(DEL) => self.buffer.delete_backward(),
            Key::Byte(b) | Key::Control(b) => self.buffer.insert(b)?,
        }
        Ok(())
    }

    /// Write the redraw sequence for the current row into `out`.
    fn render(&self, out: &mut Vec<u8>) -> std::io::Result<()> {
        ansi::carriage_return(out)?;
        ansi::cursor_forward(out, self.prompt_width)?;
        ansi::erase_line_right(out)?;
        out.extend_from_slice(self.buffer.before());
        out.extend_from_slice(self.buffer.after());
        ansi::cursor_back(out, self.buffer.cursor_back_columns())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
