//! UI helper functions for terminal output formatting.
//!
//! Small, stream-injected helpers shared by the interactive commands:
//! error/warning lines and the prompt-with-default pattern the train
//! command uses for its setup questions.

use std::io::{BufRead, Write};

use crate::io_utils::read_stdin_line;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Print `prompt`, read one line, and return it trimmed.
/// Returns `None` on EOF (the caller treats that as a quit).
pub fn prompt_line(
    out: &mut dyn Write,
    stdin: &mut dyn BufRead,
    prompt: &str,
) -> std::io::Result<Option<String>> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    Ok(read_stdin_line(stdin))
}
