//! Shared test utilities for the memeforge test suite.
//!
//! Builds throwaway resource trees so tests can exercise path resolution,
//! ingestion and composition without touching the real `res/` directory.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let (tmp, resources) = fixture_resources();
//! create_test_jpeg(&tmp.path().join("res/images/cat.jpg"), 640, 480);
//! write_docx(&tmp.path().join("res/quotes/q.docx"), &["Woof - Rex"]);
//! install_test_font(tmp.path());
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::Config;
use crate::resources::Resources;
use image::{ImageBuffer, ImageEncoder, Rgb, RgbImage};

// =========================================================================
// Fixture setup
// =========================================================================

/// A project root in a temp directory, laid out as:
///
/// ```text
/// res/images/dog.jpg          40x30 gradient
/// res/default/default.jpg     64x48 gradient
/// res/default/default.txt     "Default wisdom - Fallback"
/// res/quotes/                 empty
/// ```
///
/// No fonts are installed, so captions use the fallback bitmap font
/// unless [`install_test_font`] is called. Memes are written to `out/`.
pub fn fixture_resources() -> (TempDir, Resources) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    create_test_jpeg(&root.join("res/images/dog.jpg"), 40, 30);
    create_test_jpeg(&root.join("res/default/default.jpg"), 64, 48);
    fs::write(
        root.join("res/default/default.txt"),
        "Default wisdom - Fallback\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("res/quotes")).unwrap();

    let mut config = Config::default();
    config.paths.output = "out".to_string();
    let resources = Resources::new(root, config);
    (tmp, resources)
}

/// DejaVu Sans, checked in under `fixtures/fonts/`.
pub fn test_font_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/fonts/DejaVuSans.ttf")
}

/// Copy the test font to `res/fonts/` under the name the default config expects.
pub fn install_test_font(root: &Path) -> PathBuf {
    let dest = root.join("res/fonts/OpenSans-Regular.ttf");
    fs::create_dir_all(dest.parent().unwrap()).unwrap();
    fs::copy(test_font_path(), &dest).unwrap();
    dest
}

// =========================================================================
// File writers
// =========================================================================

/// Write a gradient JPEG of the given size, creating parent directories.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    });
    let file = fs::File::create(path).unwrap();
    let encoder = image::codecs::jpeg::JpegEncoder::new(file);
    encoder
        .write_image(
            img.as_raw(),
            width,
            height,
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
}

/// Write a DOCX with one paragraph per entry.
pub fn write_docx(path: &Path, paragraphs: &[&str]) {
    use docx_rs::{Docx, Paragraph, Run};

    let doc = paragraphs.iter().fold(Docx::new(), |doc, text| {
        doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)))
    });
    let file = fs::File::create(path).unwrap();
    doc.build().pack(file).unwrap();
}

/// Write a one-page PDF with one Courier text line per entry.
pub fn write_pdf(path: &Path, lines: &[&str]) {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("TL", vec![16.into()]),
        Operation::new("Td", vec![72.into(), 720.into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
    }
    operations.push(Operation::new("ET", vec![]));
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}
