//! Configuration loading and validation.
//!
//! Configuration is a single JSON file mapping logical resource categories to
//! directories and listing the files known in each category. It is read once
//! per process and never mutated afterwards.
//!
//! ## Config File Location
//!
//! Without an explicit `--config`, the project root is found by walking up
//! from the working directory to the first directory containing the root
//! marker. The file is then read from `<root>/config/memeforge.json`. A
//! missing file means stock defaults.
//!
//! Discovery always walks up to the stock marker (`.git`): the config that
//! could name another marker lives under the root being searched for. A
//! `root_marker` in the file is honoured only when the file is passed with
//! `--config`.
//!
//! ## Configuration Options
//!
//! ```json
//! {
//!   "root_marker": ".git",
//!   "paths": {
//!     "fonts": "res/fonts",
//!     "images": "res/images",
//!     "quotes": "res/quotes",
//!     "default": "res/default",
//!     "output": "static"
//!   },
//!   "files": {
//!     "fonts": ["OpenSans-Regular.ttf"],
//!     "images": [],
//!     "quotes": ["DogQuotesCSV.csv", "DogQuotesDOCX.docx", "DogQuotesPDF.pdf", "DogQuotesTXT.txt"],
//!     "default": ["default.jpg", "default.txt"]
//!   },
//!   "meme": {
//!     "width": 500,
//!     "jpeg_quality": 90,
//!     "text_margin": 10,
//!     "fallback_scale": 2
//!   }
//! }
//! ```
//!
//! Every section and key is optional. Unknown keys are rejected to catch
//! typos early.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Config file location relative to the project root.
pub const CONFIG_FILE: &str = "config/memeforge.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("No directory containing '{marker}' found above {start}")]
    RootNotFound { marker: String, start: PathBuf },
}

/// Logical resource buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fonts,
    Images,
    Quotes,
    Default,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Fonts,
        Category::Images,
        Category::Quotes,
        Category::Default,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Fonts => "fonts",
            Category::Images => "images",
            Category::Quotes => "quotes",
            Category::Default => "default",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// File or directory name that marks the project root.
    ///
    /// Only used with an explicit `--config`; [`discover`] always looks for
    /// the stock `.git` marker.
    pub root_marker: String,
    /// Category → directory, relative to the project root.
    pub paths: PathsConfig,
    /// Category → known file names.
    pub files: FilesConfig,
    /// Rendering settings.
    pub meme: MemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_marker: ".git".to_string(),
            paths: PathsConfig::default(),
            files: FilesConfig::default(),
            meme: MemeConfig::default(),
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_marker.trim().is_empty() {
            return Err(ConfigError::Validation(
                "root_marker must not be empty".into(),
            ));
        }
        if self.meme.width == 0 {
            return Err(ConfigError::Validation("meme.width must be > 0".into()));
        }
        if !(1..=100).contains(&self.meme.jpeg_quality) {
            return Err(ConfigError::Validation(
                "meme.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.meme.fallback_scale == 0 {
            return Err(ConfigError::Validation(
                "meme.fallback_scale must be > 0".into(),
            ));
        }
        if self.meme.text_margin.saturating_mul(2) >= self.meme.width {
            return Err(ConfigError::Validation(
                "meme.text_margin leaves no room for text".into(),
            ));
        }
        for category in Category::ALL {
            if self.paths.get(category).trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "paths.{category} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Directories for each category plus the output directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub fonts: String,
    pub images: String,
    pub quotes: String,
    pub default: String,
    /// Where generated memes are written.
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            fonts: "res/fonts".to_string(),
            images: "res/images".to_string(),
            quotes: "res/quotes".to_string(),
            default: "res/default".to_string(),
            output: "static".to_string(),
        }
    }
}

impl PathsConfig {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Fonts => &self.fonts,
            Category::Images => &self.images,
            Category::Quotes => &self.quotes,
            Category::Default => &self.default,
        }
    }
}

/// Known file names per category, in preference order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    pub fonts: Vec<String>,
    pub images: Vec<String>,
    pub quotes: Vec<String>,
    pub default: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            fonts: vec!["OpenSans-Regular.ttf".to_string()],
            images: Vec::new(),
            quotes: vec![
                "DogQuotesCSV.csv".to_string(),
                "DogQuotesDOCX.docx".to_string(),
                "DogQuotesPDF.pdf".to_string(),
                "DogQuotesTXT.txt".to_string(),
            ],
            default: vec!["default.jpg".to_string(), "default.txt".to_string()],
        }
    }
}

impl FilesConfig {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Fonts => &self.fonts,
            Category::Images => &self.images,
            Category::Quotes => &self.quotes,
            Category::Default => &self.default,
        }
    }
}

/// Rendering settings for generated memes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemeConfig {
    /// Output width in pixels; height follows the source aspect ratio.
    pub width: u32,
    /// JPEG encoding quality (1-100).
    pub jpeg_quality: u8,
    /// Horizontal padding in pixels; lines wrap at `width - 2 * text_margin`.
    pub text_margin: u32,
    /// Integer upscale of the 8x8 fallback font.
    pub fallback_scale: u32,
}

impl Default for MemeConfig {
    fn default() -> Self {
        Self {
            width: 500,
            jpeg_quality: 90,
            text_margin: 10,
            fallback_scale: 2,
        }
    }
}

/// Parse and validate a config from JSON text.
pub fn parse_config(json: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Load a config file. A missing file yields validated stock defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Walk up from `start` to the first directory containing `marker`.
pub fn locate_project_root(start: &Path, marker: &str) -> Result<PathBuf, ConfigError> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).exists())
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigError::RootNotFound {
            marker: marker.to_string(),
            start: start.to_path_buf(),
        })
}

/// Find the project root from `start` and load `<root>/config/memeforge.json`.
///
/// The walk uses the stock root marker, not the `root_marker` of the file it
/// finds. When no root marker is found, `start` itself is used as the root.
pub fn discover(start: &Path) -> Result<(PathBuf, Config), ConfigError> {
    let marker = Config::default().root_marker;
    let root = match locate_project_root(start, &marker) {
        Ok(root) => root,
        Err(e) => {
            tracing::warn!("{e}; using {} as project root", start.display());
            start.to_path_buf()
        }
    };
    let config = load_config(&root.join(CONFIG_FILE))?;
    Ok((root, config))
}

static GLOBAL: OnceLock<Config> = OnceLock::new();

/// Install the process-wide configuration.
///
/// The first call stores `config`; every later call ignores its argument and
/// returns the value installed first.
pub fn init(config: Config) -> &'static Config {
    let mut installed = false;
    let stored = GLOBAL.get_or_init(|| {
        installed = true;
        config
    });
    if !installed {
        tracing::debug!("Configuration already initialized, ignoring reload");
    }
    stored
}

/// Returns the stock config as pretty-printed JSON.
///
/// JSON has no comments, so the key explanations live in
/// [`stock_config_notes`], which `gen-config` prints to stderr.
pub fn stock_config_json() -> String {
    serde_json::to_string_pretty(&Config::default()).unwrap_or_default()
}

pub fn stock_config_notes() -> &'static str {
    r##"memeforge configuration
=======================
Save the JSON below as config/memeforge.json under your project root
(the nearest directory above the working directory containing root_marker).
All keys are optional; values shown are the defaults. Unknown keys are errors.

  root_marker        file/dir that identifies the project root; only read
                     with --config, discovery always looks for .git
  paths.*            category directories, relative to the project root
  paths.output       where generated memes are written
  files.*            known file names per category; the first entry of
                     files.default matching a category is its fallback
  meme.width         output width in pixels (height keeps aspect ratio)
  meme.jpeg_quality  JPEG quality, 1-100
  meme.text_margin   horizontal padding; text wraps at width - 2 * margin
  meme.fallback_scale  pixel scale of the built-in 8x8 font
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_paths() {
        let config = Config::default();
        assert_eq!(config.paths.get(Category::Fonts), "res/fonts");
        assert_eq!(config.paths.get(Category::Default), "res/default");
        assert_eq!(config.paths.output, "static");
        assert_eq!(config.root_marker, ".git");
    }

    #[test]
    fn default_config_has_meme_settings() {
        let config = Config::default();
        assert_eq!(config.meme.width, 500);
        assert_eq!(config.meme.jpeg_quality, 90);
        assert_eq!(config.meme.text_margin, 10);
        assert_eq!(config.meme.fallback_scale, 2);
    }

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(r#"{"paths": {"images": "pics"}}"#).unwrap();
        assert_eq!(config.paths.images, "pics");
        // Defaults preserved
        assert_eq!(config.paths.quotes, "res/quotes");
        assert_eq!(config.meme.width, 500);
    }

    #[test]
    fn parse_files_section() {
        let config =
            parse_config(r#"{"files": {"default": ["fallback.png"], "fonts": []}}"#).unwrap();
        assert_eq!(config.files.get(Category::Default), ["fallback.png"]);
        assert!(config.files.get(Category::Fonts).is_empty());
        assert_eq!(config.files.quotes.len(), 4);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result = parse_config(r#"{"paths": {"music": "x"}}"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn invalid_quality_rejected() {
        let result = parse_config(r#"{"meme": {"jpeg_quality": 0}}"#);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn margin_wider_than_canvas_rejected() {
        let result = parse_config(r#"{"meme": {"width": 100, "text_margin": 50}}"#);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_directory_rejected() {
        let result = parse_config(r#"{"paths": {"fonts": ""}}"#);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("missing.json")).unwrap();
        assert_eq!(config.meme.width, 500);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memeforge.json");
        fs::write(&path, r#"{"meme": {"width": 640}}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.meme.width, 640);
        assert_eq!(config.meme.jpeg_quality, 90);
    }

    #[test]
    fn locate_root_walks_upward() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        let root = locate_project_root(&nested, ".git").unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn locate_root_errors_without_marker() {
        let tmp = TempDir::new().unwrap();
        let result = locate_project_root(tmp.path(), "no-such-marker-7f3a");
        assert!(matches!(result, Err(ConfigError::RootNotFound { .. })));
    }

    #[test]
    fn discover_reads_config_under_root() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::create_dir(tmp.path().join("config")).unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"{"paths": {"output": "memes"}}"#,
        )
        .unwrap();
        let nested = tmp.path().join("src");
        fs::create_dir(&nested).unwrap();

        let (root, config) = discover(&nested).unwrap();
        assert_eq!(root, tmp.path());
        assert_eq!(config.paths.output, "memes");
    }

    #[test]
    fn discover_ignores_root_marker_from_discovered_file() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::create_dir(tmp.path().join("config")).unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"{"root_marker": "PROJECT_ROOT"}"#,
        )
        .unwrap();
        let nested = tmp.path().join("app");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("PROJECT_ROOT"), "").unwrap();

        let (root, config) = discover(&nested).unwrap();
        assert_eq!(root, tmp.path());
        assert_eq!(config.root_marker, "PROJECT_ROOT");
    }

    #[test]
    fn init_keeps_first_config() {
        let mut first = Config::default();
        first.meme.width = 321;
        let stored = init(first);
        let mut second = Config::default();
        second.meme.width = 999;
        let again = init(second);
        assert!(std::ptr::eq(stored, again));
        assert_eq!(again.meme.width, stored.meme.width);
    }

    #[test]
    fn stock_config_roundtrips() {
        let config = parse_config(&stock_config_json()).unwrap();
        assert_eq!(config.meme.width, 500);
        assert_eq!(config.files.quotes.len(), 4);
    }
}
