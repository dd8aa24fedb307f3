//! Image adapter: decode once, normalize once, encode per probe.

use image::DynamicImage;

use crate::config::ImageOptions;
use crate::decode::{decode_image, normalize_color, DecodeError, NormalizedImage};
use crate::encode::{encode_jpeg, EncodeError};
use crate::search::QualityEncoder;

/// A raster image prepared for JPEG re-encoding.
///
/// Color coercion happens in the constructor, so [`QualityEncoder::encode`]
/// depends on nothing but the quality argument.
#[derive(Debug, Clone)]
pub struct ImageArtifact {
    image: NormalizedImage,
}

impl ImageArtifact {
    /// Output mimetype, whatever the input format was.
    pub const MIME_TYPE: &'static str = "image/jpeg";

    /// Decode and normalize raw image bytes.
    pub fn decode(bytes: &[u8], options: &ImageOptions) -> Result<Self, DecodeError> {
        let img = decode_image(bytes, options.apply_orientation)?;
        Ok(Self::from_image(img, options))
    }

    /// Normalize an already decoded image.
    pub fn from_image(img: DynamicImage, options: &ImageOptions) -> Self {
        let image = normalize_color(img, options.background);
        if image.was_coerced() {
            log::debug!(
                "coerced {:?} image to {:?} for JPEG output",
                image.source_mode,
                image.layout
            );
        }
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }

    pub fn image(&self) -> &NormalizedImage {
        &self.image
    }
}

impl QualityEncoder for ImageArtifact {
    fn encode(&self, quality: u8) -> Result<Vec<u8>, EncodeError> {
        encode_jpeg(
            &self.image.pixels,
            self.image.width,
            self.image.height,
            self.image.layout,
            quality,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ColorMode;
    use crate::encode::PixelLayout;
    use crate::search::{NullSink, SearchStatus, SizeTargetingSearch};
    use crate::test_fixtures::{noisy_rgb, png_bytes};
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_rgba_png_is_coerced_to_rgb() {
        let mut rgba = RgbaImage::new(16, 16);
        for (x, y, px) in rgba.enumerate_pixels_mut() {
            *px = Rgba([(x * 16) as u8, (y * 16) as u8, 80, (x * y) as u8]);
        }
        let png = png_bytes(&DynamicImage::ImageRgba8(rgba));

        let artifact = ImageArtifact::decode(&png, &ImageOptions::default()).unwrap();

        assert_eq!(artifact.image().layout, PixelLayout::Rgb);
        assert_eq!(artifact.image().source_mode, ColorMode::Rgba);
        let jpeg = artifact.encode(80).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_grayscale_stays_grayscale() {
        let png = png_bytes(&DynamicImage::new_luma8(20, 10));
        let artifact = ImageArtifact::decode(&png, &ImageOptions::default()).unwrap();

        assert_eq!(artifact.image().layout, PixelLayout::Gray);
        assert_eq!((artifact.width(), artifact.height()), (20, 10));
        assert!(artifact.encode(50).is_ok());
    }

    #[test]
    fn test_encode_is_idempotent() {
        let artifact = ImageArtifact::from_image(noisy_rgb(64, 48, 7), &ImageOptions::default());

        for quality in [1, 37, 90, 100] {
            assert_eq!(
                artifact.encode(quality).unwrap(),
                artifact.encode(quality).unwrap()
            );
        }
    }

    #[test]
    fn test_malformed_bytes_fail_to_decode() {
        let result = ImageArtifact::decode(b"definitely not a png", &ImageOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_search_over_real_encoder() {
        let artifact = ImageArtifact::from_image(noisy_rgb(256, 256, 3), &ImageOptions::default());
        let full = artifact.encode(100).unwrap().len() as u64;
        let target = full / 3;

        let result = SizeTargetingSearch::new(artifact)
            .run(target, &NullSink)
            .unwrap();

        assert_eq!(result.status, SearchStatus::Converged);
        assert!(result.achieved_quality < 100);
        assert!(result.attempts <= 20);
        assert_eq!(result.achieved_size_bytes, result.encoded.len() as u64);
    }

    #[test]
    fn test_one_byte_target_terminates() {
        let artifact = ImageArtifact::from_image(noisy_rgb(32, 32, 1), &ImageOptions::default());

        let result = SizeTargetingSearch::new(artifact).run(1, &NullSink).unwrap();

        assert!(result.achieved_quality < 50);
        assert!(result.attempts <= 20);
        assert!(matches!(
            result.status,
            SearchStatus::Converged | SearchStatus::AttemptsExhausted
        ));
    }

    #[test]
    fn test_generous_target_short_circuits() {
        let artifact = ImageArtifact::from_image(noisy_rgb(32, 32, 1), &ImageOptions::default());
        let full = artifact.encode(100).unwrap();

        let result = SizeTargetingSearch::new(artifact)
            .run(10 * 1024 * 1024, &NullSink)
            .unwrap();

        assert_eq!(result.status, SearchStatus::AlreadySmaller);
        assert_eq!(result.achieved_quality, 100);
        assert_eq!(result.encoded, full);
    }
}
