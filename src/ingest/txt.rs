//! Plain-text quotes: one `<body> - <author>` per non-blank line.

use super::{IngestError, quotes_from_lines};
use crate::quote::Quote;
use std::fs;
use std::path::Path;

pub(super) fn parse(path: &Path) -> Result<Vec<Quote>, IngestError> {
    let text = fs::read_to_string(path).map_err(|e| IngestError::parse(path, e))?;
    Ok(quotes_from_lines(&text, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn skips_blank_lines() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dogs.txt");
        fs::write(&path, "Good boy - Xander\n\nBest dog - Xander").unwrap();

        let quotes = parse(&path).unwrap();
        assert_eq!(
            quotes,
            vec![
                Quote::new("Good boy", "Xander"),
                Quote::new("Best dog", "Xander"),
            ]
        );
    }

    #[test]
    fn skips_lines_without_separator() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mixed.txt");
        fs::write(&path, "A heading\r\n\"Life is good\" - Bork\r\n   \r\n").unwrap();

        assert_eq!(parse(&path).unwrap(), vec![Quote::new("Life is good", "Bork")]);
    }

    #[test]
    fn rewritten_quotes_parse_back_unchanged() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source.txt");
        fs::write(&source, "\"Stay\" - \"Trainer\"\nGood boy - Xander\n").unwrap();
        let first = parse(&source).unwrap();
        assert_eq!(first[0], Quote::new("Stay", "Trainer"));

        let rewritten = tmp.path().join("rewritten.txt");
        let lines: Vec<String> = first.iter().map(Quote::to_string).collect();
        fs::write(&rewritten, lines.join("\n")).unwrap();

        assert_eq!(parse(&rewritten).unwrap(), first);
    }

    #[test]
    fn invalid_utf8_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("binary.txt");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        assert!(matches!(parse(&path), Err(IngestError::Parse { .. })));
    }
}
