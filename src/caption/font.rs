//! Caption fonts: a TrueType face when one loads, an 8x8 bitmap otherwise.
//!
//! Layout only needs to measure text, so it works against the
//! [`TextMeasure`] trait. Drawing goes through [`CaptionFont::draw`], which
//! the compositor calls once per positioned line.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Caption colour.
pub const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Side of a fallback glyph cell, in unscaled pixels.
const GLYPH_CELL: u32 = 8;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid font {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ab_glyph::InvalidFont,
    },
}

/// Text measurement primitives used by layout.
pub trait TextMeasure {
    /// Advance width of `text` on one line, in pixels.
    fn text_width(&self, text: &str) -> u32;

    /// Vertical distance between consecutive baselines, in pixels.
    fn line_height(&self) -> u32;
}

/// A font ready to measure and draw captions.
pub enum CaptionFont {
    TrueType { font: FontVec, scale: PxScale },
    /// Built-in 8x8 glyphs upscaled by an integer factor.
    Fallback { scale: u32 },
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptionFont::TrueType { scale, .. } => {
                write!(f, "TrueType({}px)", scale.y)
            }
            CaptionFont::Fallback { scale } => write!(f, "Fallback(x{scale})"),
        }
    }
}

impl CaptionFont {
    /// Load a TrueType/OpenType face from disk at a provisional 1px size.
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let bytes = fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|source| FontError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(CaptionFont::TrueType {
            font,
            scale: PxScale::from(1.0),
        })
    }

    /// Load `path` if given, else (or on failure) the bitmap fallback.
    pub fn load_or_fallback(path: Option<&Path>, fallback_scale: u32) -> Self {
        let fallback = CaptionFont::Fallback {
            scale: fallback_scale.max(1),
        };
        let Some(path) = path else {
            tracing::warn!("No caption font available, using built-in bitmap font");
            return fallback;
        };
        match CaptionFont::load(path) {
            Ok(font) => font,
            Err(e) => {
                tracing::warn!("{e}, using built-in bitmap font");
                fallback
            }
        }
    }

    /// Resize a TrueType face to `px`. The bitmap fallback keeps its scale.
    pub fn with_size(self, px: f32) -> Self {
        match self {
            CaptionFont::TrueType { font, .. } => CaptionFont::TrueType {
                font,
                scale: PxScale::from(px.max(1.0)),
            },
            fallback @ CaptionFont::Fallback { .. } => fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, CaptionFont::Fallback { .. })
    }

    /// Draw one line with its top-left corner at `(x, y)`.
    ///
    /// `bold` overstrikes the line one pixel to the right.
    pub fn draw(&self, canvas: &mut RgbImage, text: &str, x: u32, y: u32, bold: bool) {
        let passes: &[u32] = if bold { &[0, 1] } else { &[0] };
        for dx in passes {
            match self {
                CaptionFont::TrueType { font, scale } => draw_text_mut(
                    canvas,
                    TEXT_COLOR,
                    (x + dx) as i32,
                    y as i32,
                    *scale,
                    font,
                    text,
                ),
                CaptionFont::Fallback { scale } => {
                    draw_bitmap_line(canvas, text, x + dx, y, *scale)
                }
            }
        }
    }
}

impl TextMeasure for CaptionFont {
    fn text_width(&self, text: &str) -> u32 {
        match self {
            CaptionFont::TrueType { font, scale } => text_size(*scale, font, text).0,
            CaptionFont::Fallback { scale } => {
                text.chars().count() as u32 * GLYPH_CELL * scale
            }
        }
    }

    fn line_height(&self) -> u32 {
        match self {
            CaptionFont::TrueType { font, scale } => {
                let scaled = font.as_scaled(*scale);
                (scaled.height() + scaled.line_gap()).ceil().max(1.0) as u32
            }
            // One blank glyph row between lines.
            CaptionFont::Fallback { scale } => (GLYPH_CELL + 1) * scale,
        }
    }
}

/// Bitmap rows for `c`; characters outside the basic and Latin-1 sets draw as `?`.
fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or_default()
}

fn draw_bitmap_line(canvas: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32) {
    for (i, c) in text.chars().enumerate() {
        let origin_x = x + i as u32 * GLYPH_CELL * scale;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_CELL {
                // Least significant bit is the leftmost pixel.
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = origin_x + col * scale;
                let py = y + row as u32 * scale;
                if px >= canvas.width() || py >= canvas.height() {
                    continue;
                }
                draw_filled_rect_mut(
                    canvas,
                    Rect::at(px as i32, py as i32).of_size(scale, scale),
                    TEXT_COLOR,
                );
            }
        }
    }
}
