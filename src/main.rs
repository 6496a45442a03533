// SPDX-License-Identifier: MIT
//
// bread — read lines from the terminal with a tiny line editor.
//
// Wires the crates together:
//
//   bread-term → raw mode, key decoding, ANSI redraw sequences
//   bread-line → gap buffer, prompt accounting, the edit loop
//
// Each line read is echoed back on stdout. With `--repeat`, lines are read
// until an empty one is entered.
//
// Logging goes through `tracing`. The editor owns the terminal row while a
// line is being edited, so `--log-file` is the way to watch debug output
// without it landing in the middle of the prompt.

use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use bread_line::editor::LineEditor;
use bread_line::error::ReadLineError;
use bread_line::gap::DEFAULT_CAPACITY;
use bread_line::options::EditorOptions;
use bread_term::terminal::{is_tty, StdConsole};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "bread", version, about = "Read a line with a minimal terminal line editor")]
struct Args {
    /// Prompt shown before the editable text. Wrap non-printing parts in
    /// \x01 ... \x02 so they do not count towards its width.
    #[arg(short, long, default_value = "> ")]
    prompt: String,

    /// Bytes allocated for the line before it has to grow.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    initial_capacity: usize,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Keep reading lines until an empty line is entered.
    #[arg(short, long)]
    repeat: bool,

    /// Fail instead of printing the line when the terminal cannot be
    /// restored afterwards.
    #[arg(long)]
    strict_restore: bool,
}

/// Install the tracing subscriber.
///
/// Stderr logging respects `RUST_LOG` and defaults to `warn`. A log file
/// defaults to `debug`, has no ANSI colours, and also respects `RUST_LOG`.
fn init_tracing(log_file: Option<&PathBuf>) -> std::io::Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .init();
        }
        None => {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .init();
        }
    }
    Ok(())
}

fn run(args: &Args) -> Result<(), ReadLineError> {
    let options = EditorOptions::new()
        .with_initial_capacity(args.initial_capacity)
        .with_strict_restore(args.strict_restore);
    let mut editor = LineEditor::with_console(StdConsole::new(), options);

    debug!(tty = is_tty(), ?options, "starting");

    loop {
        let line = editor.read_line(&args.prompt)?;
        info!(len = line.len(), "line read");
        println!("{line}");

        if !args.repeat || line.is_empty() {
            return Ok(());
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_tracing(args.log_file.as_ref()) {
        eprintln!("bread: cannot open log file: {e}");
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("bread: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::parse_from(["bread"]);
        assert_eq!(args.prompt, "> ");
        assert_eq!(args.initial_capacity, DEFAULT_CAPACITY);
        assert!(args.log_file.is_none());
        assert!(!args.repeat);
        assert!(!args.strict_restore);
    }

    #[test]
    fn all_flags() {
        let args = Args::parse_from([
            "bread",
            "--prompt",
            "$ ",
            "--initial-capacity",
            "8",
            "--log-file",
            "/tmp/bread.log",
            "--repeat",
            "--strict-restore",
        ]);
        assert_eq!(args.prompt, "$ ");
        assert_eq!(args.initial_capacity, 8);
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/bread.log")));
        assert!(args.repeat);
        assert!(args.strict_restore);
    }

    #[test]
    fn short_flags() {
        let args = Args::parse_from(["bread", "-p", "? ", "-r"]);
        assert_eq!(args.prompt, "? ");
        assert!(args.repeat);
    }
}
