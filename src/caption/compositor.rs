//! Overlay a caption on an image and write the result as JPEG.
//!
//! ## Pipeline
//!
//! | Step | Crate / function |
//! |---|---|
//! | Resolve image | [`Resources::resolve_image`] (default substitution) |
//! | Decode | `image::ImageReader` with format sniffing |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Font | `ab_glyph::FontVec`, else `font8x8` bitmap |
//! | Layout | [`layout`](super::layout::layout) with the injected RNG |
//! | Draw | `imageproc::drawing::draw_text_mut` |
//! | Encode | `image::codecs::jpeg::JpegEncoder` |
//!
//! Randomness (anchor and file name) comes from the RNG the compositor owns.
//! Seed it with [`Compositor::with_rng`] for reproducible output.

use super::calculations::scaled_dimensions;
use super::font::CaptionFont;
use super::layout::{LayoutRequest, fit_font, layout};
use crate::config::Category;
use crate::resources::Resources;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("No usable {0} file and no default is configured")]
    MissingDefault(Category),
}

/// Produces memes into the configured output directory.
pub struct Compositor<'a, R = StdRng> {
    resources: &'a Resources,
    rng: R,
}

impl<'a> Compositor<'a, StdRng> {
    /// A compositor seeded from OS entropy.
    pub fn new(resources: &'a Resources) -> Self {
        Self::with_rng(resources, StdRng::from_entropy())
    }
}

impl<'a, R: Rng> Compositor<'a, R> {
    pub fn with_rng(resources: &'a Resources, rng: R) -> Self {
        Self { resources, rng }
    }

    /// Caption `image` at the configured width. See [`make_meme_with_width`](Self::make_meme_with_width).
    pub fn make_meme(
        &mut self,
        image: Option<&Path>,
        body: &str,
        author: &str,
    ) -> Result<PathBuf, CompositionError> {
        let width = self.resources.config().meme.width;
        self.make_meme_with_width(image, body, author, width)
    }

    /// Caption `image` and return the path of the written JPEG.
    ///
    /// A missing, hidden or undecodable `image` is replaced by the default
    /// image. Failures after resolution are logged before being returned.
    pub fn make_meme_with_width(
        &mut self,
        image: Option<&Path>,
        body: &str,
        author: &str,
        width: u32,
    ) -> Result<PathBuf, CompositionError> {
        let source = self
            .resources
            .resolve_image(image)
            .ok_or(CompositionError::MissingDefault(Category::Images))?;

        let result = self.compose(&source, body, author, width.max(1));
        match &result {
            Ok(out) => tracing::info!("Meme created at {}", out.display()),
            Err(e) => tracing::error!("Meme generation failed for {}: {e}", source.display()),
        }
        result
    }

    fn compose(
        &mut self,
        source: &Path,
        body: &str,
        author: &str,
        width: u32,
    ) -> Result<PathBuf, CompositionError> {
        let resources = self.resources;
        let meme = &resources.config().meme;

        let img = ImageReader::open(source)?.with_guessed_format()?.decode()?;
        let (w, h) = scaled_dimensions((img.width(), img.height()), width);
        let mut canvas = img.resize_exact(w, h, FilterType::Lanczos3).to_rgb8();
        tracing::debug!(
            "Resized {} from {}x{} to {w}x{h}",
            source.display(),
            img.width(),
            img.height()
        );

        let request = LayoutRequest {
            body_text: body.to_string(),
            author_text: author.to_string(),
            image_width: w,
            image_height: h,
            font_path: resources.font_path(),
            max_width_px: w.saturating_sub(meme.text_margin.saturating_mul(2)).max(1),
        };
        let font = fit_font(
            CaptionFont::load_or_fallback(request.font_path.as_deref(), meme.fallback_scale),
            &request,
        );
        let placed = layout(&request, &font, &mut self.rng);
        for line in &placed.segments {
            font.draw(
                &mut canvas,
                &line.segment.text,
                line.x,
                line.y,
                line.segment.is_author,
            );
        }

        let out_dir = resources.output_directory();
        fs::create_dir_all(&out_dir)?;
        let out = self.unique_output_path(&out_dir);
        save_jpeg(canvas, &out, meme.jpeg_quality)?;
        Ok(out)
    }

    /// `meme_<random u32>.jpg` in `dir`, redrawn until the name is free.
    fn unique_output_path(&mut self, dir: &Path) -> PathBuf {
        loop {
            let candidate = dir.join(format!("meme_{}.jpg", self.rng.r#gen::<u32>()));
            if !candidate.exists() {
                return candidate;
            }
        }
    }
}

fn save_jpeg(canvas: RgbImage, path: &Path, quality: u8) -> Result<(), CompositionError> {
    let file = fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality);
    DynamicImage::ImageRgb8(canvas).write_with_encoder(encoder)?;
    Ok(())
}
