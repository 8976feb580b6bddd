//! # Memeforge
//!
//! Caption images with quotes. Quotes are ingested from CSV, DOCX, TXT and
//! PDF files; a caption is wrapped, sized to the image, dropped at a random
//! spot and the result is written as a JPEG.
//!
//! # Architecture
//!
//! ```text
//! quote files ──► ingest ──► Quote ─┐
//!                                   ├──► caption::Compositor ──► meme_<n>.jpg
//! image files ──► resources ────────┘
//! ```
//!
//! Both the CLI (`memeforge generate`) and the web form (`memeforge serve`)
//! go through [`generate::generate_meme`] or the [`caption::Compositor`]
//! directly; neither does any I/O of its own beyond argument handling.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | JSON config discovery, validation, process-wide `init` |
//! | [`resources`] | Category → path resolution with logged default substitution |
//! | [`quote`] | The immutable `Quote` value |
//! | [`ingest`] | Format dispatch (CSV, DOCX, TXT, PDF) and parallel bulk ingestion |
//! | [`caption`] | Font sizing, word wrap, placement, drawing, JPEG output |
//! | [`generate`] | Request validation and random image/quote selection |
//! | [`output`] | CLI output formatting |
//! | `web` | axum routes and maud pages (feature `server`) |
//!
//! # Design Decisions
//!
//! ## Substitute, Don't Fail
//!
//! A missing, empty, hidden or undecodable input path is replaced with the
//! category's configured default and the substitution is logged. Only an
//! unrecognised quote format, a half-specified quote, or a failure while
//! compositing reaches the caller as an error.
//!
//! ## Injected Randomness
//!
//! Caption placement and output file names are random. The RNG is owned by
//! the [`caption::Compositor`] and passed into [`generate::generate_meme`], so
//! tests seed it and get reproducible coordinates and names.
//!
//! ## Configuration Passed Explicitly
//!
//! [`config::init`] stores the loaded config once per process, but components
//! never read the global. [`resources::Resources`] owns its config, which
//! makes alternate configs in tests a one-liner.
//!
//! ## Bitmap Fallback Font
//!
//! When no TrueType font resolves, captions are drawn with the built-in 8x8
//! bitmap glyphs from `font8x8`. Together with the bundled `res/default/`
//! image and quote file, a bare checkout still produces memes.

pub mod caption;
pub mod config;
pub mod generate;
pub mod ingest;
pub mod output;
pub mod quote;
pub mod resources;
#[cfg(feature = "server")]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
