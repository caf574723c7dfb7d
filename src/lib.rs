//! # ready-images
//!
//! Batch-validates and normalizes image folders into web-ready JPEGs.
//! Point it at a directory: every `.jpg`/`.jpeg`/`.png` under it is
//! validated, flattened to plain RGB, EXIF-rotated upright, letterboxed up
//! to a minimum width when too narrow, and re-encoded as JPEG into a flat
//! output directory.
//!
//! # Architecture: Per-File Pipeline
//!
//! Each discovered file runs through a short sequential pipeline:
//!
//! ```text
//! cached? → validate → decide borders → transform → encode → mark cached
//! ```
//!
//! A marker-file cache keyed on path + mtime + size makes repeat runs cheap:
//! untouched files are skipped without decoding a single pixel. Per-file
//! failures are counted, never fatal — one broken photo doesn't sink a
//! folder of good ones.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`process`] | The pipeline — validation, single-file orchestration, directory walk, stats |
//! | [`config`] | Run configuration: tunables, extension checks, directory creation |
//! | [`cache`] | Marker-file cache keyed on path/mtime/size |
//! | [`imaging`] | Pixel work behind the [`imaging::ImageBackend`] trait: flatten, orient, letterbox, encode |
//! | [`output`] | CLI output formatting — banner, per-file events, results summary |
//!
//! # Design Decisions
//!
//! ## Backend Trait Seam
//!
//! All pixel work sits behind the [`imaging::ImageBackend`] trait. The
//! production backend is pure Rust (the `image` crate — no ImageMagick, no
//! system dependencies), and the pipeline tests run against a recording mock,
//! so orchestration logic is exercised without encoding a single JPEG.
//!
//! ## Existence-Only Cache
//!
//! The cache is a flat directory of marker files whose presence alone means
//! "already processed". No manifest to parse, no index to corrupt: a changed
//! file gets a new key and is simply reprocessed. See [`cache`].
//!
//! ## Events Over Global Logging
//!
//! The pipeline reports progress through an `mpsc` channel of
//! [`process::ProcessEvent`]s instead of a process-wide logger. The binary
//! prints them from a dedicated thread; tests collect them into a `Vec`.

pub mod cache;
pub mod config;
pub mod imaging;
pub mod output;
pub mod process;
