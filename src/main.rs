use clap::Parser;
use ready_images::imaging::RustBackend;
use ready_images::process::Processor;
use ready_images::{config, output};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "ready-images")]
#[command(about = "Batch-validate and normalize image folders into web-ready JPEGs")]
#[command(long_about = "\
Batch-validate and normalize image folders into web-ready JPEGs

Every .jpg/.jpeg/.png under the input directory is validated, flattened to
plain RGB, EXIF-rotated upright, letterboxed up to the minimum width when too
narrow, and re-encoded as JPEG into a flat output directory. A marker cache
keyed on path + mtime + size skips files already processed in earlier runs.

Output naming:
  photo.png   → photo_processed.jpg
  narrow.jpg  → narrow_processed_with_borders.jpg (when below --min-width)

Most flags fall back to environment variables (MIN_WIDTH, QUALITY,
MAX_FILE_SIZE_MB, CACHE_DIR, RETRY_ATTEMPTS, RETRY_DELAY).")]
#[command(version)]
struct Cli {
    /// Directory to scan for images (recursive)
    input: PathBuf,

    /// Output directory for processed JPEGs (default: <INPUT>/ready-images)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Minimum output width in pixels; narrower images get dark borders
    #[arg(long, env = "MIN_WIDTH", default_value_t = 600)]
    min_width: u32,

    /// JPEG encoding quality (0-100)
    #[arg(long, env = "QUALITY", default_value_t = 85)]
    quality: u32,

    /// Reject source files larger than this many megabytes
    #[arg(long, env = "MAX_FILE_SIZE_MB", default_value_t = 10)]
    max_file_size_mb: u64,

    /// Directory for processed-file markers
    #[arg(long, env = "CACHE_DIR", default_value = "cache")]
    cache_dir: PathBuf,

    /// Disable the marker cache — reprocess every file
    #[arg(long)]
    no_cache: bool,

    /// Transform attempts before giving up on transient I/O errors
    #[arg(long, env = "RETRY_ATTEMPTS", default_value_t = 3)]
    retry_attempts: u32,

    /// Delay between retry attempts, in seconds
    #[arg(long, env = "RETRY_DELAY", default_value_t = 1)]
    retry_delay: u64,

    /// Exit immediately instead of waiting for Enter
    #[arg(long)]
    no_pause: bool,
}

impl Cli {
    fn into_config(self) -> (config::Config, bool) {
        let mut config = config::Config::new(self.input);
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        config.min_width = self.min_width;
        config.quality = self.quality;
        config.max_file_size_mb = self.max_file_size_mb;
        config.cache_dir = self.cache_dir;
        config.enable_caching = !self.no_cache;
        config.retry_attempts = self.retry_attempts;
        config.retry_delay_secs = self.retry_delay;
        (config, self.no_pause)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (config, no_pause) = cli.into_config();

    config.validate()?;

    if !config.input_dir.exists() {
        return Err(format!(
            "Input directory does not exist: {}",
            config.input_dir.display()
        )
        .into());
    }

    config.create_directories()?;

    output::print_banner(&config);

    // Events from the pipeline are printed on a dedicated thread so the
    // pipeline itself stays free of console concerns.
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_event(&event);
        }
    });

    let processor = Processor::new(&config, RustBackend::new()).with_events(tx);
    let start = Instant::now();
    let stats = processor.process_directory(&config.input_dir)?;
    let elapsed = start.elapsed();

    drop(processor); // closes the channel so the printer drains and exits
    printer.join().expect("printer thread panicked");

    let absolute_output =
        std::path::absolute(&config.output_dir).unwrap_or_else(|_| config.output_dir.clone());
    output::print_summary(&stats, elapsed, &absolute_output);

    if !no_pause {
        println!("\nPress Enter to exit...");
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
    }

    Ok(())
}
