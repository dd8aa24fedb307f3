//! JPEG encoding for quality probes.
//!
//! Every probe of the size search ends up here, so the encoder must be
//! deterministic: the same pixels and quality always produce the same bytes.
//! Huffman tables are optimized per image, which trims a few percent off
//! every probe without touching the quality/size ordering.

use jpeg_encoder::{ColorType, Encoder};

use super::EncodeError;

/// Channel layout of the pixel buffer handed to [`encode_jpeg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// 3 bytes per pixel, R G B.
    Rgb,
    /// 1 byte per pixel.
    Gray,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Gray => 1,
        }
    }

    fn color_type(self) -> ColorType {
        match self {
            PixelLayout::Rgb => ColorType::Rgb,
            PixelLayout::Gray => ColorType::Luma,
        }
    }
}

/// Encode pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - Pixel data in row-major order, laid out as `layout`
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `layout` - RGB or grayscale
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// Quality outside 1-100 is clamped.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let (frame_width, frame_height) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(EncodeError::DimensionsTooLarge { width, height }),
    };

    let expected_len = (width as usize) * (height as usize) * layout.channels();
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);

    let mut buffer = Vec::new();
    let mut encoder = Encoder::new(&mut buffer, quality);
    encoder.set_optimized_huffman_tables(true);

    encoder
        .encode(pixels, frame_width, frame_height, layout.color_type())
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
