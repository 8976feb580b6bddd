//! PDF quotes: text is extracted, then read line by line like TXT.

use super::{IngestError, quotes_from_lines};
use crate::quote::Quote;
use std::fs;
use std::panic;
use std::path::Path;

pub(super) fn parse(path: &Path) -> Result<Vec<Quote>, IngestError> {
    let bytes = fs::read(path)?;
    let text = extract_pdf_text(&bytes).map_err(|e| IngestError::parse(path, e))?;
    Ok(quotes_from_lines(&text, path))
}

/// Extract text from PDF bytes using pdf-extract.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, String> {
    // pdf-extract panics on some malformed documents instead of erroring.
    panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| "text extraction aborted on a malformed document".to_string())?
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_pdf;
    use tempfile::TempDir;

    #[test]
    fn extracts_one_quote_per_line() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dogs.pdf");
        write_pdf(&path, &["Good boy - Xander", "Best dog - Xander"]);

        assert_eq!(
            parse(&path).unwrap(),
            vec![
                Quote::new("Good boy", "Xander"),
                Quote::new("Best dog", "Xander"),
            ]
        );
    }

    #[test]
    fn skips_lines_without_separator() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("titled.pdf");
        write_pdf(&path, &["Dog Quotes", "Sit - Trainer"]);

        assert_eq!(parse(&path).unwrap(), vec![Quote::new("Sit", "Trainer")]);
    }

    #[test]
    fn unreadable_pdf_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.pdf");
        fs::write(&path, b"%PDF-1.4 truncated garbage").unwrap();

        assert!(matches!(parse(&path), Err(IngestError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = parse(&tmp.path().join("absent.pdf"));
        assert!(matches!(result, Err(IngestError::Io(_))));
    }
}
