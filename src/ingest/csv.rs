//! CSV quotes: a header row naming `body` and `author` columns, one quote per row.

use super::IngestError;
use crate::quote::Quote;
use std::path::Path;

pub(super) fn parse(path: &Path) -> Result<Vec<Quote>, IngestError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_path(path)
        .map_err(|e| IngestError::parse(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| IngestError::parse(path, e))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (Some(body_col), Some(author_col)) = (column("body"), column("author")) else {
        return Err(IngestError::parse(
            path,
            "header must contain 'body' and 'author' columns",
        ));
    };

    let mut quotes = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| IngestError::parse(path, e))?;
        let field = |col| record.get(col).filter(|v: &&str| !v.is_empty());
        match (field(body_col), field(author_col)) {
            (Some(body), Some(author)) => quotes.push(Quote::new(body, author)),
            // Header is line 1.
            _ => tracing::debug!("Skipping incomplete row {} in {}", row + 2, path.display()),
        }
    }
    Ok(quotes)
}
