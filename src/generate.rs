//! The meme generation use case shared by the CLI and the web form.
//!
//! A [`MemeRequest`] carries up to three caller inputs. Whatever is missing
//! is picked at random:
//!
//! | Input | Given | Absent |
//! |---|---|---|
//! | `path` | used as is; relative paths join the project root | random file from the images directory, else the default image |
//! | `body` + `author` | both or neither | random quote from every quote file, else the default quote file |
//!
//! Validation runs first, so a half-specified quote never touches the disk.

use crate::caption::{CompositionError, Compositor};
use crate::config::Category;
use crate::ingest::{IngestError, Ingestor};
use crate::quote::Quote;
use crate::resources::{Resources, supported_image_extensions};
use rand::Rng;
use rand::seq::SliceRandom;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Composition(#[from] CompositionError),
    #[error("No quotes available")]
    NoQuotes,
}

/// Caller inputs for one meme. Blank strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct MemeRequest {
    pub path: Option<PathBuf>,
    pub body: Option<String>,
    pub author: Option<String>,
}

impl MemeRequest {
    /// The caller's quote, `None` when one should be picked at random.
    ///
    /// Fails when only one of body and author is given.
    pub fn quote(&self) -> Result<Option<Quote>, GenerateError> {
        let given = |field: &Option<String>| {
            field
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        match (given(&self.body), given(&self.author)) {
            (Some(body), Some(author)) => Ok(Some(Quote::new(body, author))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(GenerateError::Validation(
                "author is required when body is given".into(),
            )),
            (None, Some(_)) => Err(GenerateError::Validation(
                "body is required when author is given".into(),
            )),
        }
    }
}

/// Every image under the images directory, sorted.
pub fn image_pool(resources: &Resources) -> Vec<PathBuf> {
    resources.list_files(Category::Images, supported_image_extensions())
}

/// Every quote in the quotes directory, falling back to the default quote file.
pub fn quote_pool(resources: &Resources) -> Vec<Quote> {
    let ingestor = Ingestor::new(resources);
    let quotes = ingestor.parse_all(&ingestor.quote_files());
    if !quotes.is_empty() {
        return quotes;
    }
    tracing::warn!("No quotes found in the quotes directory, trying the default quote file");
    ingestor.parse(None).unwrap_or_else(|e| {
        tracing::warn!("{e}");
        Vec::new()
    })
}

/// Generate one meme and return the written file's path.
pub fn generate_meme<R: Rng>(
    resources: &Resources,
    request: &MemeRequest,
    rng: &mut R,
) -> Result<PathBuf, GenerateError> {
    let requested_quote = request.quote()?;

    let image = match &request.path {
        Some(path) if path.is_relative() => Some(resources.root().join(path)),
        Some(path) => Some(path.clone()),
        None => image_pool(resources).choose(rng).cloned(),
    };
    if image.is_none() {
        tracing::warn!("No images found, using the default image");
    }

    let quote = match requested_quote {
        Some(quote) => quote,
        None => quote_pool(resources)
            .choose(rng)
            .cloned()
            .ok_or(GenerateError::NoQuotes)?,
    };
    tracing::debug!("Captioning with {quote}");

    let mut compositor = Compositor::with_rng(resources, &mut *rng);
    let path = compositor.make_meme(image.as_deref(), quote.body(), quote.author())?;
    Ok(path)
}
