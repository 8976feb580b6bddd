//! Caption rendering: sizing, wrapping, placement and compositing.
//!
//! ## Architecture
//!
//! ```text
//! calculations.rs  Pure math: font size policy, aspect scaling, anchor bounds
//! font.rs          TextMeasure trait, CaptionFont (TrueType or 8x8 bitmap)
//! layout.rs        Greedy wrap, body/author segments, random placement
//! compositor.rs    Resolve → decode → resize → lay out → draw → encode
//! ```
//!
//! Layout depends only on [`TextMeasure`], so it is tested with a fixed-width
//! measurer and no font files.

mod calculations;
mod compositor;
mod font;
mod layout;

pub use calculations::{anchor_bounds, caption_length, font_size, scaled_dimensions};
pub use compositor::{CompositionError, Compositor};
pub use font::{CaptionFont, FontError, TEXT_COLOR, TextMeasure};
pub use layout::{Layout, LayoutRequest, PlacedSegment, TextSegment, fit_font, layout, segments, wrap_text};
