//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Quotes
//!
//! One header per source file, then its quotes with positional indices.
//! Files that could not be ingested show the reason instead.
//!
//! ```text
//! DogQuotesTXT.txt (2 quotes)
//!     001 "Good boy" - Xander
//!     002 "Best dog" - Xander
//! notes.xyz
//!     Skipped: No ingestor available for file res/quotes/notes.xyz
//!
//! Read 2 quotes from 1 of 2 files
//! ```
//!
//! ## Generate
//!
//! ```text
//! Meme created at: static/meme_1234567.jpg
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::ingest::IngestError;
use crate::quote::Quote;
use std::path::{Path, PathBuf};

/// Ingestion outcome for one file, as reported by `memeforge quotes`.
pub type FileReport = (PathBuf, Result<Vec<Quote>, IngestError>);

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Display name for a source file: its file name, or the full path if it has none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format the per-file quote listing plus a summary line.
pub fn format_quotes_output(reports: &[FileReport]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut total = 0;
    let mut ingested = 0;

    for (path, result) in reports {
        let name = display_name(path);
        match result {
            Ok(quotes) => {
                ingested += 1;
                total += quotes.len();
                lines.push(format!("{name} ({})", plural(quotes.len(), "quote")));
                for (i, quote) in quotes.iter().enumerate() {
                    lines.push(format!("    {} {quote}", format_index(i + 1)));
                }
            }
            Err(e) => {
                lines.push(name);
                lines.push(format!("    Skipped: {e}"));
            }
        }
    }

    if reports.is_empty() {
        lines.push("No quote files found".to_string());
    } else {
        lines.push(String::new());
        lines.push(format!(
            "Read {} from {ingested} of {}",
            plural(total, "quote"),
            plural(reports.len(), "file")
        ));
    }
    lines
}

pub fn print_quotes_output(reports: &[FileReport]) {
    for line in format_quotes_output(reports) {
        println!("{}", line);
    }
}

pub fn format_meme_created(path: &Path) -> String {
    format!("Meme created at: {}", path.display())
}

pub fn print_meme_created(path: &Path) {
    println!("{}", format_meme_created(path));
}
