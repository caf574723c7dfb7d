//! Pure Rust image processing backend — zero external dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` |
//! | Decode (JPEG, PNG) | `image` crate (pure Rust decoders) |
//! | EXIF orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::letterbox_dimensions;
use super::params::ProcessParams;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, Rgb, RgbImage, imageops};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Composite any alpha or palette channel onto an opaque white canvas.
///
/// JPEG has no alpha, so transparent pixels must land on *something* — white
/// matches what viewers render for transparent PNGs on a light page. Images
/// without alpha are converted to RGB directly.
fn flatten_to_rgb(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as u32;
        let inv = 255 - alpha;
        let blend = |c: u8| (((c as u32 * alpha) + 255 * inv + 127) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    out
}

/// Scale a narrow image up to `min_width` and paste it onto a black canvas.
///
/// Placement is flush top-left, with the dark fill exposed only toward the
/// right/bottom edges. Images at or above `min_width` pass through unchanged.
fn letterbox(rgb: RgbImage, min_width: u32) -> RgbImage {
    let Some((new_width, new_height)) = letterbox_dimensions(min_width, rgb.dimensions()) else {
        return rgb;
    };

    let resized = imageops::resize(&rgb, new_width, new_height, FilterType::Lanczos3);
    let mut canvas = RgbImage::from_pixel(new_width, new_height, Rgb([0, 0, 0]));
    imageops::replace(&mut canvas, &resized, 0, 0);
    canvas
}

/// Encode as JPEG at the given quality, removing any partial file on failure.
fn save_jpeg(rgb: &RgbImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let result = write_jpeg(rgb, path, quality);
    if result.is_err() {
        let _ = std::fs::remove_file(path);
    }
    result
}

fn write_jpeg(rgb: &RgbImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality as u8);
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn process(&self, params: &ProcessParams) -> Result<(), BackendError> {
        let mut decoder = ImageReader::open(&params.source)
            .map_err(BackendError::Io)?
            .into_decoder()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: {}",
                    params.source.display(),
                    e
                ))
            })?;
        // Formats without orientation metadata (PNG) report NoTransforms.
        let orientation = decoder
            .orientation()
            .unwrap_or(Orientation::NoTransforms);
        let img = DynamicImage::from_decoder(decoder).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to decode {}: {}",
                params.source.display(),
                e
            ))
        })?;

        // Flatten first, then bake the orientation into the pixel data so the
        // output JPEG needs no orientation tag.
        let mut img = DynamicImage::ImageRgb8(flatten_to_rgb(img));
        img.apply_orientation(orientation);
        let mut rgb = img.into_rgb8();

        if let Some(min_width) = params.letterbox {
            rgb = letterbox(rgb, min_width);
        }

        save_jpeg(&rgb, &params.output, params.quality.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use image::{Rgba, RgbaImage};

    /// Create a small valid JPEG file with the given dimensions.
    fn create_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        save_jpeg(&img, path, 90).unwrap();
    }

    fn params(source: &Path, output: &Path, letterbox: Option<u32>) -> ProcessParams {
        ProcessParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            quality: Quality::new(85),
            letterbox,
        }
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let dims = backend.identify(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let backend = RustBackend::new();
        assert!(backend.identify(Path::new("/nonexistent/image.jpg")).is_err());
    }

    #[test]
    fn identify_corrupt_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, b"this is not a jpeg").unwrap();

        let backend = RustBackend::new();
        assert!(backend.identify(&path).is_err());
    }

    #[test]
    fn process_passthrough_keeps_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 800, 400);

        let output = tmp.path().join("out.jpg");
        let backend = RustBackend::new();
        backend.process(&params(&source, &output, None)).unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (800, 400));
    }

    #[test]
    fn process_letterbox_scales_to_min_width() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("narrow.jpg");
        create_test_jpeg(&source, 200, 400);

        let output = tmp.path().join("out.jpg");
        let backend = RustBackend::new();
        backend.process(&params(&source, &output, Some(600))).unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (600, 1200));
    }

    #[test]
    fn process_letterbox_leaves_wide_image_alone() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("wide.jpg");
        create_test_jpeg(&source, 800, 400);

        let output = tmp.path().join("out.jpg");
        let backend = RustBackend::new();
        backend.process(&params(&source, &output, Some(600))).unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (800, 400));
    }

    #[test]
    fn process_flattens_transparent_png_onto_white() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("transparent.png");
        // Fully transparent image — flattening should produce pure white.
        let img = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 0]));
        img.save(&source).unwrap();

        let output = tmp.path().join("out.jpg");
        let backend = RustBackend::new();
        backend.process(&params(&source, &output, None)).unwrap();

        let decoded = image::open(&output).unwrap().into_rgb8();
        let Rgb([r, g, b]) = *decoded.get_pixel(5, 5);
        // JPEG is lossy; allow a small tolerance around white.
        assert!(r > 250 && g > 250 && b > 250, "got ({r}, {g}, {b})");
    }

    #[test]
    fn process_opaque_alpha_keeps_color() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("opaque.png");
        let img = RgbaImage::from_pixel(10, 10, Rgba([200, 50, 50, 255]));
        img.save(&source).unwrap();

        let output = tmp.path().join("out.jpg");
        let backend = RustBackend::new();
        backend.process(&params(&source, &output, None)).unwrap();

        let decoded = image::open(&output).unwrap().into_rgb8();
        let Rgb([r, g, b]) = *decoded.get_pixel(5, 5);
        assert!(r > 180, "red channel washed out: ({r}, {g}, {b})");
        assert!(g < 80 && b < 80, "got ({r}, {g}, {b})");
    }

    #[test]
    fn process_corrupt_source_errors_without_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("broken.jpg");
        std::fs::write(&source, b"garbage").unwrap();

        let output = tmp.path().join("out.jpg");
        let backend = RustBackend::new();
        assert!(backend.process(&params(&source, &output, None)).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn flatten_half_transparent_blends_toward_white() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 128]));
        let rgb = flatten_to_rgb(DynamicImage::ImageRgba8(img));
        let Rgb([r, _, _]) = *rgb.get_pixel(0, 0);
        // Black at ~50% alpha over white → mid gray
        assert!((120..=135).contains(&r), "got {r}");
    }

    #[test]
    fn letterbox_output_is_fully_covered_by_resized_content() {
        // The scaled image matches the canvas exactly, so no black remains.
        let img = RgbImage::from_pixel(100, 50, Rgb([200, 200, 200]));
        let boxed = letterbox(img, 300);
        assert_eq!(boxed.dimensions(), (300, 150));
        let Rgb([r, _, _]) = *boxed.get_pixel(299, 149);
        assert!(r > 150, "expected resized content at bottom-right, got {r}");
    }
}
