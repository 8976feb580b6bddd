//! Word documents: one `<body> - <author>` per non-empty paragraph.
//!
//! A `.docx` is a ZIP of XML parts; `docx-rs` gives a typed tree:
//!
//! ```text
//! Document → Paragraph → Run → Text
//! ```
//!
//! Runs within a paragraph are concatenated without a separator since they
//! are pieces of the same sentence split by formatting changes.

use super::{IngestError, split_quote_line};
use crate::quote::Quote;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use std::fs;
use std::path::Path;

pub(super) fn parse(path: &Path) -> Result<Vec<Quote>, IngestError> {
    let bytes = fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes)
        .map_err(|e| IngestError::parse(path, format!("not a valid DOCX container ({e:?})")))?;

    let quotes = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .filter_map(|text| {
            let quote = split_quote_line(text.trim());
            if quote.is_none() {
                tracing::debug!("Skipping paragraph in {}: {text}", path.display());
            }
            quote
        })
        .collect();
    Ok(quotes)
}

fn paragraph_text(para: &Paragraph) -> String {
    para.children
        .iter()
        .filter_map(|child| match child {
            ParagraphChild::Run(run) => Some(run),
            _ => None,
        })
        .flat_map(|run| run.children.iter())
        .filter_map(|child| match child {
            RunChild::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect()
}
