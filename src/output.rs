//! CLI output formatting for the batch run.
//!
//! Each piece of output has a `format_*` function (returns lines or a single
//! `String`) for testability and a `print_*` wrapper that writes to stdout.
//! Format functions are pure — no I/O, no side effects.
//!
//! # Output format
//!
//! ```text
//! ============================================================
//! ready-images
//! ============================================================
//! Input directory:  /photos
//! Output directory: /photos/ready-images
//! Minimum width:    600px
//! Supported formats: .jpg, .jpeg, .png
//! ------------------------------------------------------------
//! Processed: narrow.jpg -> narrow_processed_with_borders.jpg (with dark borders)
//! Skipped (cached): done.jpg
//! Invalid broken.jpg: Error validating image: ...
//!
//! ============================================================
//! PROCESSING RESULTS
//! ============================================================
//! Total files found:      4
//! Successfully processed: 3
//! Skipped (cached):       0
//! Errors:                 1
//! Processing time:        2.31 seconds
//!
//! Processed images saved to: /photos/ready-images
//! ```

use crate::config::Config;
use crate::process::{ProcessEvent, ProcessStats};
use std::path::Path;
use std::time::Duration;

const RULE_WIDTH: usize = 60;

fn heavy_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn light_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Basename of a path for event lines; falls back to the full display form.
fn short_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format the startup banner with the resolved configuration.
pub fn format_banner(config: &Config) -> Vec<String> {
    vec![
        heavy_rule(),
        "ready-images".to_string(),
        heavy_rule(),
        format!("Input directory:  {}", config.input_dir.display()),
        format!("Output directory: {}", config.output_dir.display()),
        format!("Minimum width:    {}px", config.min_width),
        format!("JPEG quality:     {}", config.quality),
        format!("Max file size:    {}MB", config.max_file_size_mb),
        format!(
            "Caching:          {}",
            if config.enable_caching {
                format!("enabled ({})", config.cache_dir.display())
            } else {
                "disabled".to_string()
            }
        ),
        format!("Supported formats: {}", config.supported_formats()),
        light_rule(),
    ]
}

/// Format a single progress event as one line.
pub fn format_event(event: &ProcessEvent) -> String {
    match event {
        ProcessEvent::Skipped { path } => {
            format!("Skipped (cached): {}", short_name(path))
        }
        ProcessEvent::Processed {
            path,
            output,
            bordered,
        } => {
            let border_info = if *bordered { " (with dark borders)" } else { "" };
            format!(
                "Processed: {} -> {}{}",
                short_name(path),
                short_name(output),
                border_info
            )
        }
        ProcessEvent::Invalid { path, reason } => {
            format!("Invalid {}: {}", short_name(path), reason)
        }
        ProcessEvent::Failed { path, reason } => {
            format!("Failed {}: {}", short_name(path), reason)
        }
        ProcessEvent::Retrying { path, attempt } => {
            format!("Retrying {} (attempt {})", short_name(path), attempt)
        }
    }
}

/// Format the end-of-run summary.
///
/// `output_dir` should already be absolute so users can copy-paste it.
pub fn format_summary(stats: &ProcessStats, elapsed: Duration, output_dir: &Path) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        heavy_rule(),
        "PROCESSING RESULTS".to_string(),
        heavy_rule(),
        format!("Total files found:      {}", stats.total),
        format!("Successfully processed: {}", stats.processed),
        format!("Skipped (cached):       {}", stats.skipped),
        format!("Errors:                 {}", stats.errors),
        format!("Processing time:        {:.2} seconds", elapsed.as_secs_f64()),
    ];

    if stats.processed > 0 {
        lines.push(String::new());
        lines.push(format!(
            "Processed images saved to: {}",
            output_dir.display()
        ));
    }

    if stats.errors > 0 {
        lines.push(String::new());
        lines.push(format!(
            "{} files had errors and were not processed.",
            stats.errors
        ));
        lines.push("Check the lines above for specific error messages.".to_string());
    }

    lines
}

pub fn print_banner(config: &Config) {
    for line in format_banner(config) {
        println!("{}", line);
    }
}

pub fn print_event(event: &ProcessEvent) {
    println!("{}", format_event(event));
}

pub fn print_summary(stats: &ProcessStats, elapsed: Duration, output_dir: &Path) {
    for line in format_summary(stats, elapsed, output_dir) {
        println!("{}", line);
    }
}
