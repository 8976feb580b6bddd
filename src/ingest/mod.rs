//! Quote ingestion from CSV, DOCX, TXT and PDF files.
//!
//! | Format | Extensions | Record | Crate |
//! |---|---|---|---|
//! | CSV | `csv` | row with `body` and `author` columns | `csv` |
//! | DOCX | `docx` | paragraph `<body> - <author>` | `docx-rs` |
//! | TXT | `txt` | line `<body> - <author>` | std |
//! | PDF | `pdf` | extracted line `<body> - <author>` | `pdf-extract` |
//!
//! Each format implements [`QuoteSource`]. The [`Ingestor`] dispatcher walks
//! [`Format::PRIORITY`] and hands the file to the first format whose
//! [`can_ingest`](QuoteSource::can_ingest) matches. Extension sets are
//! disjoint, so at most one format ever claims a path.
//!
//! ## Failure policy
//!
//! - Unclaimed extension → [`IngestError::UnsupportedFormat`], returned to the caller.
//! - Missing, empty or absent path → the configured default quote file is used.
//! - Structurally invalid document → [`IngestError::Parse`] from the format;
//!   the dispatcher logs it and yields no quotes so batches keep going.
//! - Empty file → no quotes, no error.

mod csv;
mod docx;
mod pdf;
mod txt;

use crate::config::Category;
use crate::quote::Quote;
use crate::resources::Resources;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No ingestor available for file {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Failed to parse {}: {detail}", path.display())]
    Parse { path: PathBuf, detail: String },
    #[error("No quote file given and no default quote file is configured")]
    NoDefault,
}

impl IngestError {
    fn parse(path: &Path, detail: impl fmt::Display) -> Self {
        IngestError::Parse {
            path: path.to_path_buf(),
            detail: detail.to_string(),
        }
    }
}

/// A format-specific quote parser.
pub trait QuoteSource: Sync {
    /// Lowercase extensions this source claims.
    fn extensions(&self) -> &'static [&'static str];

    /// True iff the path's lowercased extension is claimed by this source.
    fn can_ingest(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.extensions().contains(&ext.as_str()))
    }

    /// Read every quote in the file.
    fn parse(&self, path: &Path) -> Result<Vec<Quote>, IngestError>;
}

/// The supported quote file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Docx,
    Txt,
    Pdf,
}

impl Format {
    /// Dispatch order.
    pub const PRIORITY: [Format; 4] = [Format::Csv, Format::Docx, Format::Txt, Format::Pdf];

    /// First format in priority order that claims `path`.
    pub fn for_path(path: &Path) -> Option<Format> {
        Self::PRIORITY
            .into_iter()
            .find(|format| format.can_ingest(path))
    }
}

impl QuoteSource for Format {
    fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Csv => &["csv"],
            Format::Docx => &["docx"],
            Format::Txt => &["txt"],
            Format::Pdf => &["pdf"],
        }
    }

    fn parse(&self, path: &Path) -> Result<Vec<Quote>, IngestError> {
        if std::fs::metadata(path)?.len() == 0 {
            tracing::debug!("{} is empty", path.display());
            return Ok(Vec::new());
        }
        let quotes = match self {
            Format::Csv => self::csv::parse(path),
            Format::Docx => self::docx::parse(path),
            Format::Txt => self::txt::parse(path),
            Format::Pdf => self::pdf::parse(path),
        }?;
        tracing::debug!("Parsed {} quotes from {}", quotes.len(), path.display());
        Ok(quotes)
    }
}

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    Format::PRIORITY
        .iter()
        .flat_map(|format| format.extensions().iter().copied())
        .collect()
});

/// Every extension claimed by some format, in dispatch order.
pub fn supported_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Lowercased text after the last `.` of the file name.
///
/// Unlike [`Path::extension`], a dotfile such as `.csv` yields `csv`.
fn extension_of(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Parse one file with its format, without default substitution or recovery.
pub fn parse_file(path: &Path) -> Result<Vec<Quote>, IngestError> {
    let format =
        Format::for_path(path).ok_or_else(|| IngestError::UnsupportedFormat(path.to_path_buf()))?;
    format.parse(path)
}

/// Parse each file strictly, pairing every path with its own outcome.
///
/// Unlike [`Ingestor::parse`], a missing file is reported as an error under
/// its own name rather than replaced by the default quote file.
pub fn parse_each(paths: Vec<PathBuf>) -> Vec<(PathBuf, Result<Vec<Quote>, IngestError>)> {
    paths
        .into_par_iter()
        .map(|path| {
            let result = parse_file(&path);
            (path, result)
        })
        .collect()
}

/// Split `<body> - <author>` into a quote.
///
/// Parts after the second separator are dropped. Lines without a separator,
/// or with an empty body or author, yield `None`.
pub(crate) fn split_quote_line(line: &str) -> Option<Quote> {
    let mut parts = line.split(" - ");
    let (body, author) = (parts.next()?, parts.next()?);
    let quote = Quote::new(body, author);
    (!quote.body().is_empty() && !quote.author().is_empty()).then_some(quote)
}

/// Quotes from every non-blank line of `text`.
pub(crate) fn quotes_from_lines(text: &str, path: &Path) -> Vec<Quote> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let quote = split_quote_line(line);
            if quote.is_none() {
                tracing::debug!("Skipping line without ' - ' in {}: {line}", path.display());
            }
            quote
        })
        .collect()
}

/// Dispatches quote files to formats, with default substitution and recovery.
#[derive(Debug, Clone, Copy)]
pub struct Ingestor<'a> {
    resources: &'a Resources,
}

impl<'a> Ingestor<'a> {
    pub fn new(resources: &'a Resources) -> Self {
        Self { resources }
    }

    /// Parse a quote file.
    ///
    /// A given path with an unclaimed extension fails with
    /// [`IngestError::UnsupportedFormat`] before touching the filesystem.
    /// `None`, empty or missing paths are replaced by the default quote file.
    /// Parse failures are logged and produce an empty list.
    pub fn parse(&self, candidate: Option<&Path>) -> Result<Vec<Quote>, IngestError> {
        if let Some(path) = candidate.filter(|p| !p.as_os_str().is_empty()) {
            if Format::for_path(path).is_none() {
                return Err(IngestError::UnsupportedFormat(path.to_path_buf()));
            }
        }

        let path = self
            .resources
            .resolve_path(candidate, Category::Quotes)
            .ok_or(IngestError::NoDefault)?;

        match parse_file(&path) {
            Ok(quotes) => Ok(quotes),
            Err(e @ (IngestError::Parse { .. } | IngestError::Io(_))) => {
                tracing::warn!("{e}; skipping");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Parse several files in parallel, keeping input order.
    ///
    /// Files that fail dispatch are logged and skipped.
    pub fn parse_all(&self, paths: &[PathBuf]) -> Vec<Quote> {
        paths
            .par_iter()
            .map(|path| match self.parse(Some(path)) {
                Ok(quotes) => quotes,
                Err(e) => {
                    tracing::warn!("{e}");
                    Vec::new()
                }
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Every supported quote file under the quotes directory.
    pub fn quote_files(&self) -> Vec<PathBuf> {
        self.resources
            .list_files(Category::Quotes, supported_extensions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{fixture_resources, write_docx};
    use std::fs;

    #[test]
    fn parse_each_reports_missing_file_under_its_own_name() {
        let (tmp, _resources) = fixture_resources();
        let present = tmp.path().join("res/quotes/dogs.txt");
        fs::write(&present, "Sit - Trainer\n").unwrap();
        let gone = tmp.path().join("gone.txt");
        let notes = tmp.path().join("notes.xyz");

        let reports = parse_each(vec![present.clone(), gone.clone(), notes.clone()]);

        let paths: Vec<&PathBuf> = reports.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, [&present, &gone, &notes]);
        assert_eq!(
            reports[0].1.as_ref().unwrap(),
            &vec![Quote::new("Sit", "Trainer")]
        );
        assert!(reports[1].1.is_err());
        assert!(matches!(reports[2].1, Err(IngestError::UnsupportedFormat(_))));
    }

    #[test]
    fn each_extension_claimed_by_exactly_one_format() {
        for ext in ["csv", "docx", "txt", "pdf", "CSV", "Docx", "TXT", "PdF"] {
            let path = PathBuf::from(format!("/quotes/file.{ext}"));
            let claims = Format::PRIORITY
                .iter()
                .filter(|f| f.can_ingest(&path))
                .count();
            assert_eq!(claims, 1, "{ext} claimed by {claims} formats");
        }
    }

    #[test]
    fn unknown_extension_claimed_by_none() {
        for name in ["file.xyz", "file", "file.csv.bak", "docx"] {
            assert_eq!(Format::for_path(Path::new(name)), None, "{name}");
        }
    }

    #[test]
    fn extension_uses_text_after_last_dot() {
        assert_eq!(extension_of(Path::new("a.b.TXT")), Some("txt".into()));
        assert_eq!(extension_of(Path::new(".csv")), Some("csv".into()));
        assert_eq!(extension_of(Path::new("noext")), None);
    }

    #[test]
    fn supported_extensions_in_priority_order() {
        assert_eq!(supported_extensions(), ["csv", "docx", "txt", "pdf"]);
    }

    #[test]
    fn split_keeps_first_two_parts() {
        let q = split_quote_line("To bork - or not to bork - Bork").unwrap();
        assert_eq!(q.body(), "To bork");
        assert_eq!(q.author(), "or not to bork");
    }

    #[test]
    fn split_rejects_missing_separator() {
        assert_eq!(split_quote_line("Just a line"), None);
        assert_eq!(split_quote_line("Hyphen-ated-words"), None);
    }

    #[test]
    fn split_rejects_empty_parts() {
        assert_eq!(split_quote_line("\"\" - Nobody"), None);
    }

    #[test]
    fn parse_file_unsupported_extension() {
        let result = parse_file(Path::new("/quotes/file.xyz"));
        assert!(matches!(result, Err(IngestError::UnsupportedFormat(_))));
    }

    #[test]
    fn empty_files_yield_no_quotes() {
        let tmp = tempfile::TempDir::new().unwrap();
        for name in ["e.csv", "e.docx", "e.txt", "e.pdf"] {
            let path = tmp.path().join(name);
            fs::write(&path, "").unwrap();
            assert!(parse_file(&path).unwrap().is_empty(), "{name}");
        }
    }

    #[test]
    fn ingestor_rejects_unsupported_extension_even_if_missing() {
        let (tmp, resources) = fixture_resources();
        let result = Ingestor::new(&resources).parse(Some(&tmp.path().join("quotes.xyz")));
        assert!(matches!(result, Err(IngestError::UnsupportedFormat(_))));
    }

    #[test]
    fn ingestor_substitutes_default_for_missing_path() {
        let (tmp, resources) = fixture_resources();
        let ingestor = Ingestor::new(&resources);

        let from_missing = ingestor
            .parse(Some(&tmp.path().join("gone.txt")))
            .unwrap();
        let from_none = ingestor.parse(None).unwrap();

        assert_eq!(from_missing, vec![Quote::new("Default wisdom", "Fallback")]);
        assert_eq!(from_none, from_missing);
    }

    #[test]
    fn ingestor_without_default_errors() {
        let (tmp, resources) = fixture_resources();
        let mut config = resources.config().clone();
        config.files.default.clear();
        config.files.quotes.clear();
        let resources = Resources::new(tmp.path(), config);

        let result = Ingestor::new(&resources).parse(None);
        assert!(matches!(result, Err(IngestError::NoDefault)));
    }

    #[test]
    fn ingestor_recovers_from_corrupt_docx() {
        let (tmp, resources) = fixture_resources();
        let bad = tmp.path().join("res/quotes/broken.docx");
        fs::write(&bad, b"PK not really a zip").unwrap();

        assert!(matches!(parse_file(&bad), Err(IngestError::Parse { .. })));
        assert!(Ingestor::new(&resources).parse(Some(&bad)).unwrap().is_empty());
    }

    #[test]
    fn parse_all_keeps_order_and_skips_unsupported() {
        let (tmp, resources) = fixture_resources();
        let quotes_dir = tmp.path().join("res/quotes");
        let csv = quotes_dir.join("a.csv");
        fs::write(&csv, "body,author\nFirst,One\n").unwrap();
        let docx = quotes_dir.join("b.docx");
        write_docx(&docx, &["Second - Two"]);
        let txt = quotes_dir.join("c.txt");
        fs::write(&txt, "Third - Three\n").unwrap();
        let unsupported = quotes_dir.join("d.xyz");
        fs::write(&unsupported, "Nope - Nobody\n").unwrap();

        let quotes = Ingestor::new(&resources).parse_all(&[csv, unsupported, docx, txt]);
        let bodies: Vec<&str> = quotes.iter().map(Quote::body).collect();
        assert_eq!(bodies, ["First", "Second", "Third"]);
    }

    #[test]
    fn quote_files_lists_supported_only() {
        let (tmp, resources) = fixture_resources();
        let quotes_dir = tmp.path().join("res/quotes");
        fs::write(quotes_dir.join("a.txt"), "A - B\n").unwrap();
        fs::write(quotes_dir.join("b.xyz"), "").unwrap();

        let files = Ingestor::new(&resources).quote_files();
        assert_eq!(files, vec![quotes_dir.join("a.txt")]);
    }
}
