// SPDX-License-Identifier: MIT
//
// Terminal control — non-canonical input mode and RAII restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr) and isatty. These are the standard POSIX interfaces for
// terminal control — there is no safe alternative. Each unsafe block is
// minimal.
#![allow(unsafe_code)]
//
// The line editor needs far less than a full-screen TUI: echo off and
// canonical line buffering off, so every keystroke reaches us as it is
// typed, and output post-processing trimmed down. Signals (ISIG) and input
// translation (ICRNL) are left alone, so Ctrl-C still interrupts and Enter
// still arrives as `\n`.
//
// Everything the editor needs from a terminal goes through [`Console`].
// [`StdConsole`] is the real one (fd 0 + stdout); tests substitute a
// scripted console. The saved termios lives inside the console value, never
// in process-wide state: every session captures and restores its own.

use std::io::{self, Read, Write};

use tracing::debug;

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Console ─────────────────────────────────────────────────────────────────

/// The terminal services the line editor consumes.
///
/// Reads are raw and blocking; writes go out unbuffered once flushed.
/// Mode switching is paired: [`enable_raw_mode`](Self::enable_raw_mode)
/// captures the current attributes and [`disable_raw_mode`](Self::disable_raw_mode)
/// puts them back.
pub trait Console: Read + Write {
    /// Capture the current terminal attributes and switch to raw input.
    ///
    /// # Errors
    ///
    /// Returns an error if the attributes cannot be queried or applied.
    fn enable_raw_mode(&mut self) -> io::Result<()>;

    /// Restore the attributes captured by [`enable_raw_mode`](Self::enable_raw_mode).
    ///
    /// A no-op if raw mode was never enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the attributes cannot be applied.
    fn disable_raw_mode(&mut self) -> io::Result<()>;
}

// ─── Raw Mode Guard ──────────────────────────────────────────────────────────

/// Raw-mode session over a [`Console`].
///
/// Created by [`RawModeGuard::enter`]. Dropping the guard restores the
/// terminal best-effort (errors are ignored); call
/// [`restore`](Self::restore) to observe the result instead.
///
/// The guard dereferences to the console, so the session reads and writes
/// through it while raw mode is active.
pub struct RawModeGuard<'a, C: Console + ?Sized> {
    console: &'a mut C,
    /// `false` once `restore()` has run.
    active: bool,
}

impl<'a, C: Console + ?Sized> RawModeGuard<'a, C> {
    /// Switch `console` into raw mode.
    ///
    /// # Errors
    ///
    /// Returns the console's error if the mode switch fails; the terminal
    /// is left as it was.
    pub fn enter(console: &'a mut C) -> io::Result<Self> {
        console.enable_raw_mode()?;
        debug!("raw mode enabled");
        Ok(Self {
            console,
            active: true,
        })
    }

    /// Restore the original terminal attributes and consume the guard.
    ///
    /// # Errors
    ///
    /// Returns the console's error if the attributes cannot be restored.
    pub fn restore(mut self) -> io::Result<()> {
        self.active = false;
        self.console.disable_raw_mode()?;
        debug!("raw mode disabled");
        Ok(())
    }
}

impl<C: Console + ?Sized> std::ops::Deref for RawModeGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.console
    }
}

impl<C: Console + ?Sized> std::ops::DerefMut for RawModeGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.console
    }
}

impl<C: Console + ?Sized> Drop for RawModeGuard<'_, C> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.console.disable_raw_mode();
        }
    }
}

// ─── StdConsole ──────────────────────────────────────────────────────────────

/// The process terminal: raw reads from fd 0, writes to stdout.
///
/// Reads bypass Rust's buffered `Stdin` so that a single `read()` returns
/// exactly what the terminal delivered, which is what key decoding
/// depends on.
pub struct StdConsole {
    /// Attributes saved by `enable_raw_mode`, restored by `disable_raw_mode`.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,
    stdout: io::Stdout,
}

impl StdConsole {
    #[must_use]
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            original_termios: None,
            stdout: io::stdout(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        if self.original_termios.is_some() {
            return Ok(());
        }

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            let original = termios;

            // Keep OPOST itself, drop every other output flag.
            termios.c_oflag &= libc::OPOST;
            termios.c_lflag &= !(libc::ECHO | libc::ICANON);

            // VMIN=1, VTIME=0: read() blocks until at least 1 byte available.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            // TCSANOW, not TCSAFLUSH: keep anything typed ahead of the prompt.
            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original_termios = Some(original);
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "raw terminal mode requires a unix termios",
        ))
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            unsafe {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }
            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for StdConsole {
    #[cfg(unix)]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
        let n = n as usize;
        Ok(n)
    }

    #[cfg(not(unix))]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::stdin().read(buf)
    }
}

impl Write for StdConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.stdout.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Drop for StdConsole {
    fn drop(&mut self) {
        let _ = self.disable_raw_mode();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Console that only counts mode switches.
    #[derive(Default)]
    struct Counting {
        enabled: usize,
        disabled: usize,
        fail_enable: bool,
        fail_disable: bool,
    }

    impl Read for Counting {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Ok(0)
        }
    }

    impl Write for Counting {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Console for Counting {
        fn enable_raw_mode(&mut self) -> io::Result<()> {
            if self.fail_enable {
                return Err(io::Error::other("tcgetattr"));
            }
            self.enabled += 1;
            Ok(())
        }

        fn disable_raw_mode(&mut self) -> io::Result<()> {
            self.disabled += 1;
            if self.fail_disable {
                return Err(io::Error::other("tcsetattr"));
            }
            Ok(())
        }
    }

    // ── Guard ─────────────────────────────────────────────────────────

    #[test]
    fn guard_drop_restores() {
        let mut c = Counting::default();
        {
            let _guard = RawModeGuard::enter(&mut c).unwrap();
        }
        assert_eq!(c.enabled, 1);
        assert_eq!(c.disabled, 1);
    }

    #[test]
    fn guard_restore_runs_once() {
        let mut c = Counting::default();
        let guard = RawModeGuard::enter(&mut c).unwrap();
        guard.restore().unwrap();
        assert_eq!(c.disabled, 1);
    }

    #[test]
    fn guard_restore_reports_error() {
        let mut c = Counting {
            fail_disable: true,
            ..Counting::default()
        };
        let guard = RawModeGuard::enter(&mut c).unwrap();
        assert!(guard.restore().is_err());
        // The failed restore is not retried on drop.
        assert_eq!(c.disabled, 1);
    }

    #[test]
    fn failed_enter_does_not_restore() {
        let mut c = Counting {
            fail_enable: true,
            ..Counting::default()
        };
        assert!(RawModeGuard::enter(&mut c).is_err());
        assert_eq!(c.disabled, 0);
    }

    #[test]
    fn guard_derefs_to_console() {
        let mut c = Counting::default();
        let mut guard = RawModeGuard::enter(&mut c).unwrap();
        guard.write_all(b"x").unwrap();
        assert_eq!(guard.enabled, 1);
    }

    // ── StdConsole ────────────────────────────────────────────────────

    #[test]
    fn is_tty_does_not_panic() {
        let _ = is_tty();
    }

    #[test]
    fn std_console_disable_without_enable_is_noop() {
        let mut console = StdConsole::new();
        console.disable_raw_mode().unwrap();
        #[cfg(unix)]
        assert!(console.original_termios.is_none());
    }

    #[test]
    fn std_console_enable_matches_tty() {
        let mut console = StdConsole::new();
        let result = console.enable_raw_mode();
        if is_tty() {
            assert!(result.is_ok());
            console.disable_raw_mode().unwrap();
        } else {
            assert!(result.is_err());
        }
        #[cfg(unix)]
        assert!(console.original_termios.is_none());
    }
}
