//! The `name.nnn` collaborator: a single-line text file next to the input
//! holding the user name for the listing banner. Read when present,
//! otherwise prompted for once and persisted. Never consulted by the
//! assembler, linker or interpreter.

use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

pub const NAME_FILE: &str = "name.nnn";

fn name_path(input: &Path) -> PathBuf {
    input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
        .join(NAME_FILE)
}

/// Reads the name file beside `input`, if it exists.
pub fn read(input: &Path) -> Option<String> {
    let content = fs::read_to_string(name_path(input)).ok()?;
    let name = content.lines().next()?.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Reads the name file, or prompts once and persists the answer.
pub fn read_or_prompt(input: &Path) -> io::Result<Option<String>> {
    if let Some(name) = read(input) {
        return Ok(Some(name));
    }

    eprint!("Enter name for listing header: ");
    io::stderr().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let name = line.trim().to_string();
    if name.is_empty() {
        return Ok(None);
    }
    fs::write(name_path(input), format!("{}\n", name))?;
    Ok(Some(name))
}
