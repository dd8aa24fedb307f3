//! Lossy encoding used by the quality probes.
//!
//! Both adapters funnel through [`encode_jpeg`]: the image adapter for the
//! whole artifact, the document adapter for embedded JPEG images when image
//! recompression is enabled.

mod jpeg;

use thiserror::Error;

pub use jpeg::{encode_jpeg, PixelLayout};

/// Errors a single quality probe can fail with.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG frames are limited to 65535 pixels per side
    #[error("Image too large for JPEG: {width}x{height} (max 65535 per side)")]
    DimensionsTooLarge { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),

    /// Writing the rewritten PDF failed
    #[error("PDF serialization failed: {0}")]
    DocumentFailed(String),
}
