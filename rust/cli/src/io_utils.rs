//! Shared I/O utilities for reading user input.

use std::io::BufRead;

/// Read a line from the provided reader.
/// Returns None when the reader reaches EOF, otherwise the trimmed line.
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}
