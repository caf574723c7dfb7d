//! Image processing — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Flatten alpha → RGB** | white-canvas composite |
//! | **EXIF orientation** | `DynamicImage::apply_orientation` |
//! | **Letterbox** | Lanczos3 resize + dark canvas |
//! | **Encode → JPEG** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{bytes_to_mb, letterbox_dimensions};
pub use params::{ProcessParams, Quality};
pub use rust_backend::RustBackend;
