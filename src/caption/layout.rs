//! Caption layout: wrapping, stacking and placement of the text block.
//!
//! The body is wrapped greedily to the available width and the author line
//! (`- author`) follows underneath. The whole block is then placed at a
//! uniformly random anchor that keeps it inside the image when it fits.

use super::calculations::{anchor_bounds, author_line, caption_length, font_size};
use super::font::{CaptionFont, TextMeasure};
use rand::Rng;
use std::path::PathBuf;

/// Everything needed to lay out one caption.
#[derive(Debug, Clone)]
pub struct LayoutRequest {
    pub body_text: String,
    pub author_text: String,
    pub image_width: u32,
    pub image_height: u32,
    /// Font to load; `None` uses the bitmap fallback.
    pub font_path: Option<PathBuf>,
    /// Maximum line width before wrapping.
    pub max_width_px: u32,
}

/// One line of caption text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    pub is_author: bool,
}

/// A segment with its position inside the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedSegment {
    pub segment: TextSegment,
    pub x: u32,
    pub y: u32,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub segments: Vec<PlacedSegment>,
    pub block_width: u32,
    pub block_height: u32,
    /// Top-left corner of the block.
    pub anchor: (u32, u32),
}

/// Size a TrueType face for the request. The bitmap fallback is left as is.
pub fn fit_font(font: CaptionFont, request: &LayoutRequest) -> CaptionFont {
    if font.is_fallback() {
        return font;
    }
    let len = caption_length(&request.body_text, &request.author_text);
    font.with_size(font_size(len, request.image_height))
}

/// Greedy word wrap.
///
/// Words are added to the current line while it stays within `max_width`.
/// A single word wider than `max_width` gets a line of its own.
pub fn wrap_text(text: &str, measure: &impl TextMeasure, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure.text_width(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Body lines followed by the author lines, in drawing order.
pub fn segments(
    body: &str,
    author: &str,
    measure: &impl TextMeasure,
    max_width: u32,
) -> Vec<TextSegment> {
    let body_lines = wrap_text(body, measure, max_width)
        .into_iter()
        .map(|text| TextSegment {
            text,
            is_author: false,
        });
    let author_lines = if author.trim().is_empty() {
        Vec::new()
    } else {
        wrap_text(&author_line(author.trim()), measure, max_width)
    };
    body_lines
        .chain(author_lines.into_iter().map(|text| TextSegment {
            text,
            is_author: true,
        }))
        .collect()
}

/// Lay out the caption and pick a random anchor for it.
pub fn layout(request: &LayoutRequest, measure: &impl TextMeasure, rng: &mut impl Rng) -> Layout {
    let lines = segments(
        &request.body_text,
        &request.author_text,
        measure,
        request.max_width_px,
    );
    let line_height = measure.line_height();

    let widths: Vec<u32> = lines
        .iter()
        // The bold overstrike is one pixel wider.
        .map(|s| measure.text_width(&s.text) + u32::from(s.is_author))
        .collect();
    let block_width = widths.iter().copied().max().unwrap_or(0);
    let block_height = line_height * lines.len() as u32;

    let (max_x, max_y) = anchor_bounds(
        (request.image_width, request.image_height),
        (block_width, block_height),
    );
    let anchor = (rng.gen_range(0..=max_x), rng.gen_range(0..=max_y));

    let segments = lines
        .into_iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (segment, width))| PlacedSegment {
            segment,
            x: anchor.0,
            y: anchor.1 + i as u32 * line_height,
            width,
        })
        .collect();

    Layout {
        segments,
        block_width,
        block_height,
        anchor,
    }
}
