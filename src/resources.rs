//! Resource resolution: logical categories to filesystem paths.
//!
//! Every lookup either yields a path that exists or the category's configured
//! default. A dangling path is never handed to the ingestors or the
//! compositor; substitutions are logged at `warn`.
//!
//! ## Defaults
//!
//! The fallback for a category is, in order:
//!
//! 1. the first file listed under `files.default` (in `paths.default`) whose
//!    extension belongs to the category and which exists;
//! 2. the first file listed under `files.<category>` (in `paths.<category>`)
//!    which exists.
//!
//! ```text
//! paths.default = "res/default", files.default = ["default.jpg", "default.txt"]
//!
//! default_path(Images) → <root>/res/default/default.jpg
//! default_path(Quotes) → <root>/res/default/default.txt
//! ```

use crate::config::{Category, Config};
use image::{ImageFormat, ImageReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Image extensions paired with the decoder that must be compiled in.
const IMAGE_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static IMAGE_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    IMAGE_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Image file extensions that have working decoders compiled in.
pub fn supported_image_extensions() -> &'static [&'static str] {
    &IMAGE_EXTENSIONS
}

pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

/// Lowercased extension of `path`, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Whether the file name starts with a dot.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Whether the file's header decodes as a supported image.
///
/// Reads only the header (format sniffing + dimensions), not the pixels.
pub fn is_valid_image(path: &Path) -> bool {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .ok()
        .and_then(|reader| reader.into_dimensions().ok())
        .is_some()
}

/// Whether `path`'s extension belongs to `category`. Everything fits `Default`.
fn fits_category(path: &Path, category: Category) -> bool {
    let Some(ext) = extension_of(path) else {
        return category == Category::Default;
    };
    match category {
        Category::Images => supported_image_extensions().contains(&ext.as_str()),
        Category::Quotes => crate::ingest::supported_extensions().contains(&ext.as_str()),
        Category::Fonts => FONT_EXTENSIONS.contains(&ext.as_str()),
        Category::Default => true,
    }
}

/// Read-only view of the configured resource tree, anchored at a project root.
#[derive(Debug, Clone)]
pub struct Resources {
    root: PathBuf,
    config: Config,
}

impl Resources {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Configured directory for a category.
    pub fn resolve_directory(&self, category: Category) -> PathBuf {
        self.root.join(self.config.paths.get(category))
    }

    /// Directory generated memes are written to.
    pub fn output_directory(&self) -> PathBuf {
        self.root.join(&self.config.paths.output)
    }

    /// Path of a file listed under `files.<category>`.
    ///
    /// Returns `None` when `name` is not listed for the category.
    pub fn file_path(&self, category: Category, name: &str) -> Option<PathBuf> {
        self.config
            .files
            .get(category)
            .iter()
            .any(|listed| listed == name)
            .then(|| self.resolve_directory(category).join(name))
    }

    /// The category's fallback file. See the [module docs](self).
    pub fn default_path(&self, category: Category) -> Option<PathBuf> {
        let from_defaults = self
            .config
            .files
            .get(Category::Default)
            .iter()
            .map(|name| self.resolve_directory(Category::Default).join(name))
            .find(|path| fits_category(path, category) && path.is_file());
        if from_defaults.is_some() || category == Category::Default {
            return from_defaults;
        }
        self.config
            .files
            .get(category)
            .iter()
            .map(|name| self.resolve_directory(category).join(name))
            .find(|path| path.is_file())
    }

    /// Return `candidate` if it names an existing file, else the category default.
    ///
    /// `None`, empty, and missing candidates are all substituted.
    pub fn resolve_path(&self, candidate: Option<&Path>, category: Category) -> Option<PathBuf> {
        match candidate {
            Some(path) if !path.as_os_str().is_empty() && path.is_file() => {
                Some(path.to_path_buf())
            }
            Some(path) if !path.as_os_str().is_empty() => {
                self.substitute(category, &format!("{} not found", path.display()))
            }
            _ => self.substitute(category, "no path provided"),
        }
    }

    /// Resolve an image path, also rejecting hidden files and undecodable images.
    pub fn resolve_image(&self, candidate: Option<&Path>) -> Option<PathBuf> {
        let path = self.resolve_path(candidate, Category::Images)?;
        if is_hidden(&path) {
            return self.substitute(
                Category::Images,
                &format!("{} is a hidden file", path.display()),
            );
        }
        if !is_valid_image(&path) {
            return self.substitute(
                Category::Images,
                &format!("{} is not a valid image", path.display()),
            );
        }
        Some(path)
    }

    /// The caption font: the first configured font file that exists.
    pub fn font_path(&self) -> Option<PathBuf> {
        self.resolve_path(None, Category::Fonts)
    }

    /// All non-hidden files under the category directory with one of `extensions`.
    ///
    /// Walks recursively; results are sorted by path. A missing directory
    /// yields an empty list.
    pub fn list_files(&self, category: Category, extensions: &[&str]) -> Vec<PathBuf> {
        let dir = self.resolve_directory(category);
        if !dir.is_dir() {
            tracing::debug!("{category} directory {} does not exist", dir.display());
            return Vec::new();
        }
        WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.path()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                extension_of(path).is_some_and(|ext| extensions.contains(&ext.as_str()))
            })
            .collect()
    }

    fn substitute(&self, category: Category, reason: &str) -> Option<PathBuf> {
        let fallback = self.default_path(category);
        match &fallback {
            Some(path) => tracing::warn!(
                "{reason}; using default {category} file {}",
                path.display()
            ),
            None => tracing::warn!("{reason}; no default {category} file is configured"),
        }
        fallback
    }
}
