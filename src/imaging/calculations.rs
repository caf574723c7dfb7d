//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the letterbox target for an image narrower than `min_width`.
///
/// The image is scaled up so its width equals `min_width`, preserving the
/// aspect ratio: `height' = round(min_width * height / width)`.
///
/// Returns `None` when the image already meets the minimum — including the
/// boundary case `width == min_width`, which is never letterboxed.
///
/// # Examples
/// ```
/// # use ready_images::imaging::letterbox_dimensions;
/// // 200x400 at min width 600 → scaled to 600x1200
/// assert_eq!(letterbox_dimensions(600, (200, 400)), Some((600, 1200)));
///
/// // Already wide enough → unchanged
/// assert_eq!(letterbox_dimensions(600, (800, 400)), None);
/// ```
pub fn letterbox_dimensions(min_width: u32, source: (u32, u32)) -> Option<(u32, u32)> {
    let (width, height) = source;
    if width >= min_width {
        return None;
    }
    let new_height = (min_width as f64 * height as f64 / width as f64).round() as u32;
    Some((min_width, new_height))
}

/// Convert a byte count to megabytes (1 MB = 1024 * 1024 bytes).
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
