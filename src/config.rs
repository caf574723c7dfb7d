//! Run configuration module.
//!
//! Holds the tunables for one batch run. Values come from CLI flags with
//! environment-variable fallbacks (see `main.rs` for the clap surface);
//! the input directory is always an explicit argument, never a compiled-in
//! default.
//!
//! ## Configuration surface
//!
//! | Flag | Env var | Default |
//! |---|---|---|
//! | `--min-width` | `MIN_WIDTH` | 600 |
//! | `--quality` | `QUALITY` | 85 |
//! | `--max-file-size-mb` | `MAX_FILE_SIZE_MB` | 10 |
//! | `--cache-dir` | `CACHE_DIR` | `cache` |
//! | `--no-cache` | — | caching on |
//! | `--retry-attempts` | `RETRY_ATTEMPTS` | 3 |
//! | `--retry-delay` | `RETRY_DELAY` | 1 |
//! | `--output` | — | `<input>/ready-images` |
//!
//! Supported extensions are fixed in code: `.jpg`, `.jpeg`, `.png`.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Extensions accepted for processing, matched as case-insensitive suffixes.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// Configuration for one batch run. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Config {
    /// Minimum output width in pixels; narrower images get letterboxed.
    pub min_width: u32,
    /// JPEG encoding quality (0-100).
    pub quality: u32,
    /// Files larger than this are rejected during validation.
    pub max_file_size_mb: u64,
    /// When false, every file is treated as uncached and nothing is marked.
    pub enable_caching: bool,
    /// Directory holding `<hash>.txt` marker files.
    pub cache_dir: PathBuf,
    /// Number of transform attempts before giving up on transient I/O errors.
    pub retry_attempts: u32,
    /// Delay between retry attempts, in seconds.
    pub retry_delay_secs: u64,
    /// Root directory scanned (recursively) for images.
    pub input_dir: PathBuf,
    /// Flat directory receiving all processed JPEGs.
    pub output_dir: PathBuf,
}

impl Config {
    /// Build a config with stock defaults for the given input directory.
    ///
    /// The output directory defaults to `ready-images` inside the input root,
    /// matching where users expect results next to their originals.
    pub fn new(input_dir: PathBuf) -> Self {
        let output_dir = input_dir.join("ready-images");
        Self {
            min_width: 600,
            quality: 85,
            max_file_size_mb: 10,
            enable_caching: true,
            cache_dir: PathBuf::from("cache"),
            retry_attempts: 3,
            retry_delay_secs: 1,
            input_dir,
            output_dir,
        }
    }

    /// Check if a filename has a supported image extension.
    pub fn is_valid_image_format(&self, filename: &str) -> bool {
        let lower = filename.to_ascii_lowercase();
        SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
    }

    /// The supported extensions joined for user-facing messages.
    pub fn supported_formats(&self) -> String {
        SUPPORTED_EXTENSIONS.join(", ")
    }

    /// Ensure input, output, and (if caching) cache directories exist.
    ///
    /// Idempotent; existing directories are not an error. Creation failure
    /// (permissions, invalid path) is fatal and aborts the run.
    pub fn create_directories(&self) -> Result<(), ConfigError> {
        let mut directories = vec![&self.input_dir, &self.output_dir];
        if self.enable_caching {
            directories.push(&self.cache_dir);
        }
        for dir in directories {
            ensure_dir(dir)?;
        }
        Ok(())
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 0-100".into()));
        }
        if self.min_width == 0 {
            return Err(ConfigError::Validation("min-width must be non-zero".into()));
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::Validation(
                "retry-attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn ensure_dir(path: &Path) -> Result<(), ConfigError> {
    fs::create_dir_all(path).map_err(|source| ConfigError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
