//! Pure calculation functions for caption sizing and placement.
//!
//! All functions here are pure and testable without any I/O or images.

/// Font size never drops below this fraction of the canvas height.
pub const MIN_SIZE_RATIO: f32 = 0.02;

/// Font size in pixels for a caption of `text_len` characters on a canvas
/// `height` pixels tall.
///
/// Piecewise-linear in the caption length, continuous at the breakpoints:
///
/// | Length | Size (× height) |
/// |---|---|
/// | `L ≤ 128` | `0.05 − 0.01 × L/128` |
/// | `128 < L ≤ 256` | `0.04 − 0.01 × (L−128)/128` |
/// | `L > 256` | `0.03 − 0.01 × (L−256)/256`, floored at `0.02` |
///
/// The result is at least 1px.
///
/// # Examples
/// ```
/// # use memeforge::caption::font_size;
/// assert!((font_size(0, 300) - 15.0).abs() < 1e-3);
/// assert!((font_size(128, 300) - 12.0).abs() < 1e-3);
/// assert!((font_size(256, 300) - 9.0).abs() < 1e-3);
/// ```
pub fn font_size(text_len: usize, height: u32) -> f32 {
    let len = text_len as f32;
    let ratio = if text_len <= 128 {
        0.05 - 0.01 * (len / 128.0)
    } else if text_len <= 256 {
        0.04 - 0.01 * ((len - 128.0) / 128.0)
    } else {
        0.03 - 0.01 * ((len - 256.0) / 256.0)
    };
    (height as f32 * ratio.max(MIN_SIZE_RATIO)).max(1.0)
}

/// Character count that drives [`font_size`]: the body plus the author as
/// rendered, `"- "` prefix included.
pub fn caption_length(body: &str, author: &str) -> usize {
    body.chars().count() + author_line(author).chars().count()
}

/// The author as drawn under the body.
pub fn author_line(author: &str) -> String {
    format!("- {author}")
}

/// Scale `source` to `target_width`, preserving aspect ratio.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target_width` - Output width in pixels
///
/// # Returns
/// * `(width, height)` - Output dimensions; height is rounded and at least 1
pub fn scaled_dimensions(source: (u32, u32), target_width: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let height = (target_width as f64 * src_h as f64 / src_w.max(1) as f64).round() as u32;
    (target_width, height.max(1))
}

/// Largest top-left anchor that keeps a `block` inside `canvas`.
///
/// Each axis clamps to 0 when the block is larger than the canvas, so an
/// oversized block anchors at the origin and overflows right/bottom.
pub fn anchor_bounds(canvas: (u32, u32), block: (u32, u32)) -> (u32, u32) {
    (
        canvas.0.saturating_sub(block.0),
        canvas.1.saturating_sub(block.1),
    )
}
