//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`process`](crate::process) pipeline (which decides
//! which images to transform) and the [`backend`](super::backend) (which does
//! the actual pixel work). This separation allows swapping backends (e.g. for
//! testing with a mock) without changing pipeline logic.

use std::path::PathBuf;

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Full specification for one normalization pass: decode, flatten to RGB,
/// bake in EXIF orientation, optionally letterbox, encode as JPEG.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub quality: Quality,
    /// When set, images narrower than this width are resized up to it and
    /// pasted onto a dark canvas. `None` leaves dimensions untouched.
    pub letterbox: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_85() {
        assert_eq!(Quality::default().value(), 85);
    }
}
