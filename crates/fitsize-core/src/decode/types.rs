//! Core types for image decoding.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No bytes were supplied.
    #[error("Empty image data")]
    Empty,

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose,
    Rotate90CW,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Color representation of a decoded image, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
    /// High bit depth or floating point samples.
    Wide,
}

impl ColorMode {
    /// Classify a decoded image.
    pub fn of(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(_) => ColorMode::Gray,
            DynamicImage::ImageLumaA8(_) => ColorMode::GrayAlpha,
            DynamicImage::ImageRgb8(_) => ColorMode::Rgb,
            DynamicImage::ImageRgba8(_) => ColorMode::Rgba,
            _ if image.color().has_alpha() => ColorMode::Rgba,
            _ => ColorMode::Wide,
        }
    }

    /// Whether the mode carries an alpha channel.
    ///
    /// Palette images are expanded by the decoders into RGB or RGBA, so a
    /// transparent palette shows up here as `Rgba`.
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::GrayAlpha | ColorMode::Rgba)
    }
}
