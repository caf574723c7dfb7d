//! Per-file validation and the batch processing pipeline.
//!
//! The heart of the crate: each eligible file runs through
//! validate → decide border strategy → transform → encode → mark cached,
//! applied across a directory walk with aggregate statistics.
//!
//! ## Per-file flow
//!
//! ```text
//! cached?  ──yes──▶ skipped
//!   │no
//! validate ──fail─▶ error (reason reported as an event)
//!   │ok (needs_borders decided here)
//! transform ─fail─▶ error (after retry_attempts on transient I/O errors)
//!   │ok
//! mark cached ───▶ processed
//! ```
//!
//! ## Error isolation
//!
//! Per-file failures never abort the batch: each file increments exactly one
//! of the processed/skipped/errors counters, so
//! `total == processed + skipped + errors` holds by construction. Failure
//! reasons surface only through [`ProcessEvent`]s and the aggregate counts.
//!
//! ## Reporting
//!
//! Progress is reported through an optional `mpsc::Sender<ProcessEvent>`
//! rather than ambient global logging — the caller decides where events go
//! (the CLI prints them from a dedicated thread, tests collect them).

use crate::cache::MarkerCache;
use crate::config::Config;
use crate::imaging::{BackendError, ImageBackend, ProcessParams, Quality, bytes_to_mb};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Fatal batch-level failure. Per-file errors are counted, not raised.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single file was rejected before any transform ran.
///
/// Checks short-circuit in declaration order; the first failure wins.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid image extension. Supported formats are {0}")]
    UnsupportedFormat(String),
    #[error("File does not exist")]
    Missing,
    #[error("File too large ({size_mb:.1}MB). Maximum allowed: {limit_mb}MB")]
    TooLarge { size_mb: f64, limit_mb: u64 },
    #[error("Error validating image: {0}")]
    Undecodable(String),
}

/// Progress event emitted once per notable step of the run.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    Skipped {
        path: PathBuf,
    },
    Processed {
        path: PathBuf,
        output: PathBuf,
        bordered: bool,
    },
    Invalid {
        path: PathBuf,
        reason: String,
    },
    Failed {
        path: PathBuf,
        reason: String,
    },
    Retrying {
        path: PathBuf,
        attempt: u32,
    },
}

/// Aggregate counts for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStats {
    pub processed: u32,
    pub skipped: u32,
    pub errors: u32,
    /// Files discovered by the walk (before any per-file outcome).
    pub total: u32,
}

impl fmt::Display for ProcessStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} skipped, {} errors ({} found)",
            self.processed, self.skipped, self.errors, self.total
        )
    }
}

/// Outcome of processing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Processed,
    Skipped,
    Failed,
}

/// Derive the output filename for a source image.
///
/// Strips the original extension, appends the processing suffix, and forces
/// `.jpg`. Outputs are flat — nesting under the input root is not mirrored,
/// so differently-nested inputs sharing a basename collide.
pub fn output_filename(input: &Path, needs_borders: bool) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix = if needs_borders {
        "_processed_with_borders"
    } else {
        "_processed"
    };
    format!("{stem}{suffix}.jpg")
}

/// Sequential single-threaded pipeline over a configured backend.
pub struct Processor<'a, B> {
    config: &'a Config,
    backend: B,
    cache: MarkerCache,
    events: Option<Sender<ProcessEvent>>,
}

impl<'a, B: ImageBackend> Processor<'a, B> {
    pub fn new(config: &'a Config, backend: B) -> Self {
        let cache = MarkerCache::new(config.cache_dir.clone(), config.enable_caching);
        Self {
            config,
            backend,
            cache,
            events: None,
        }
    }

    /// Attach a progress-event sender. Events are best-effort; a hung or
    /// dropped receiver never fails the run.
    pub fn with_events(mut self, events: Sender<ProcessEvent>) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: ProcessEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    /// Validate one file. Returns whether it needs letterbox borders.
    ///
    /// Checks run in order and short-circuit: extension, existence, size
    /// limit, then decodability (which also yields the width used for the
    /// border decision).
    pub fn validate_image(&self, path: &Path) -> Result<bool, ValidationError> {
        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if !self.config.is_valid_image_format(filename) {
            return Err(ValidationError::UnsupportedFormat(
                self.config.supported_formats(),
            ));
        }

        if !path.exists() {
            return Err(ValidationError::Missing);
        }

        let meta = fs::metadata(path).map_err(|e| ValidationError::Undecodable(e.to_string()))?;
        let size_mb = bytes_to_mb(meta.len());
        if size_mb > self.config.max_file_size_mb as f64 {
            return Err(ValidationError::TooLarge {
                size_mb,
                limit_mb: self.config.max_file_size_mb,
            });
        }

        let dims = self
            .backend
            .identify(path)
            .map_err(|e| ValidationError::Undecodable(e.to_string()))?;
        Ok(dims.width < self.config.min_width)
    }

    /// Transform one validated file, retrying transient I/O failures.
    ///
    /// Only `BackendError::Io` is retried — decode and encode failures are
    /// deterministic and repeat attempts would just repeat the failure.
    pub fn process_image(
        &self,
        input: &Path,
        output: &Path,
        add_borders: bool,
    ) -> Result<(), BackendError> {
        let params = ProcessParams {
            source: input.to_path_buf(),
            output: output.to_path_buf(),
            quality: Quality::new(self.config.quality),
            letterbox: add_borders.then_some(self.config.min_width),
        };

        let mut attempt = 1;
        loop {
            match self.backend.process(&params) {
                Ok(()) => return Ok(()),
                Err(BackendError::Io(_)) if attempt < self.config.retry_attempts => {
                    attempt += 1;
                    self.emit(ProcessEvent::Retrying {
                        path: input.to_path_buf(),
                        attempt,
                    });
                    thread::sleep(Duration::from_secs(self.config.retry_delay_secs));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run the full per-file pipeline: cache check, validation, transform,
    /// cache marking. Exactly one [`Outcome`] per call.
    pub fn process_single_image(&self, input: &Path) -> Outcome {
        if self.cache.is_cached(input) {
            self.emit(ProcessEvent::Skipped {
                path: input.to_path_buf(),
            });
            return Outcome::Skipped;
        }

        let needs_borders = match self.validate_image(input) {
            Ok(needs_borders) => needs_borders,
            Err(e) => {
                self.emit(ProcessEvent::Invalid {
                    path: input.to_path_buf(),
                    reason: e.to_string(),
                });
                return Outcome::Failed;
            }
        };

        let output = self
            .config
            .output_dir
            .join(output_filename(input, needs_borders));

        match self.process_image(input, &output, needs_borders) {
            Ok(()) => {
                // A marker write failure only costs a cache miss next run.
                let _ = self.cache.mark(input);
                self.emit(ProcessEvent::Processed {
                    path: input.to_path_buf(),
                    output,
                    bordered: needs_borders,
                });
                Outcome::Processed
            }
            Err(e) => {
                self.emit(ProcessEvent::Failed {
                    path: input.to_path_buf(),
                    reason: e.to_string(),
                });
                Outcome::Failed
            }
        }
    }

    /// Process every eligible file under `root`, sequentially.
    ///
    /// Discovery walks the tree recursively and keeps files passing the
    /// extension check, excluding anything already under the output
    /// directory (which may live inside the input root). Files are visited
    /// in sorted path order for reproducible runs.
    pub fn process_directory(&self, root: &Path) -> Result<ProcessStats, ProcessError> {
        fs::create_dir_all(&self.config.output_dir)?;

        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| !path.starts_with(&self.config.output_dir))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| self.config.is_valid_image_format(n))
            })
            .collect();
        files.sort();

        let mut stats = ProcessStats {
            total: files.len() as u32,
            ..ProcessStats::default()
        };

        for file in &files {
            match self.process_single_image(file) {
                Outcome::Processed => stats.processed += 1,
                Outcome::Skipped => stats.skipped += 1,
                Outcome::Failed => stats.errors += 1,
            }
        }

        Ok(stats)
    }
}
