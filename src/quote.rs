//! The quote value shared by every ingestor and the compositor.

use serde::Serialize;
use std::fmt;

/// A quotation and its attribution.
///
/// Immutable once built: fields are private and only exposed by reference.
/// Surrounding whitespace and a single pair of enclosing double quotes
/// (straight or curly) are stripped on construction, so `"\"Woof\" "` and
/// `Woof` produce the same body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    body: String,
    author: String,
}

impl Quote {
    pub fn new(body: impl AsRef<str>, author: impl AsRef<str>) -> Self {
        Self {
            body: clean(body.as_ref()),
            author: clean(author.as_ref()),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn author(&self) -> &str {
        &self.author
    }
}

/// Renders as `"body" - author`, the line format the TXT ingestor reads back.
impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - {}", self.body, self.author)
    }
}

fn clean(raw: &str) -> String {
    let trimmed = raw.trim();
    for (open, close) in [('"', '"'), ('\u{201C}', '\u{201D}')] {
        if let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim().to_string();
        }
    }
    trimmed.to_string()
}
