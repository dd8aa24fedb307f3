//! Color normalization ahead of lossy encoding.
//!
//! JPEG has no alpha channel and no palette. Images carrying either are
//! coerced to three-channel RGB once, before the size search starts, so the
//! search's encode step is a pure function of quality.

use image::{DynamicImage, GrayImage, RgbImage};

use super::ColorMode;
use crate::encode::PixelLayout;

/// An image ready for JPEG encoding: 8-bit RGB or 8-bit grayscale.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data in row-major order, `layout.channels()` bytes per pixel.
    pub pixels: Vec<u8>,
    /// Channel layout of `pixels`.
    pub layout: PixelLayout,
    /// Color mode of the source before normalization.
    pub source_mode: ColorMode,
}

impl NormalizedImage {
    fn from_rgb_image(img: RgbImage, source_mode: ColorMode) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
            layout: PixelLayout::Rgb,
            source_mode,
        }
    }

    fn from_gray_image(img: GrayImage, source_mode: ColorMode) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
            layout: PixelLayout::Gray,
            source_mode,
        }
    }

    /// Whether normalization changed the channel layout of the source.
    pub fn was_coerced(&self) -> bool {
        match self.source_mode {
            ColorMode::Gray => false,
            ColorMode::Rgb => false,
            ColorMode::GrayAlpha | ColorMode::Rgba | ColorMode::Wide => true,
        }
    }
}

/// Coerce a decoded image into a JPEG-compatible layout.
///
/// * Alpha-bearing images become RGB. With `background == None` the alpha
///   channel is dropped and the color samples are kept as-is; with
///   `Some(rgb)` each pixel is composited over that color.
/// * Grayscale without alpha stays single-channel.
/// * Anything else (16-bit, float) is converted to 8-bit RGB.
pub fn normalize_color(img: DynamicImage, background: Option<[u8; 3]>) -> NormalizedImage {
    let mode = ColorMode::of(&img);

    match (mode, img) {
        (ColorMode::Gray, img) => NormalizedImage::from_gray_image(img.into_luma8(), mode),
        (ColorMode::GrayAlpha | ColorMode::Rgba, img) => match background {
            Some(bg) => NormalizedImage::from_rgb_image(flatten_over(&img, bg), mode),
            None => NormalizedImage::from_rgb_image(img.into_rgb8(), mode),
        },
        (_, img) => NormalizedImage::from_rgb_image(img.into_rgb8(), mode),
    }
}

/// Alpha-composite every pixel over an opaque background.
fn flatten_over(img: &DynamicImage, background: [u8; 3]) -> RgbImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut out = RgbImage::new(width, height);
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let [r, g, b, a] = src.0;
        dst.0 = [
            blend(r, background[0], a),
            blend(g, background[1], a),
            blend(b, background[2], a),
        ];
    }
    out
}

#[inline]
fn blend(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{LumaA, Rgba, RgbaImage};

    fn translucent_red() -> DynamicImage {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([255, 0, 0, 0])); // fully transparent
        rgba.put_pixel(1, 0, Rgba([255, 0, 0, 255])); // opaque
        DynamicImage::ImageRgba8(rgba)
    }

    #[test]
    fn test_rgba_drops_alpha_without_background() {
        let out = normalize_color(translucent_red(), None);

        assert_eq!(out.layout, PixelLayout::Rgb);
        assert_eq!(out.source_mode, ColorMode::Rgba);
        assert!(out.was_coerced());
        // Transparent pixel keeps its stored color
        assert_eq!(out.pixels, vec![255, 0, 0, 255, 0, 0]);
    }

    #[test]
    fn test_rgba_composites_over_background() {
        let out = normalize_color(translucent_red(), Some([255, 255, 255]));

        assert_eq!(out.layout, PixelLayout::Rgb);
        // Transparent pixel becomes the background, opaque pixel is unchanged
        assert_eq!(out.pixels, vec![255, 255, 255, 255, 0, 0]);
    }

    #[test]
    fn test_gray_alpha_becomes_rgb() {
        let mut la = image::GrayAlphaImage::new(1, 1);
        la.put_pixel(0, 0, LumaA([100, 255]));
        let out = normalize_color(DynamicImage::ImageLumaA8(la), None);

        assert_eq!(out.layout, PixelLayout::Rgb);
        assert_eq!(out.pixels, vec![100, 100, 100]);
    }

    #[test]
    fn test_gray_stays_single_channel() {
        let out = normalize_color(DynamicImage::new_luma8(4, 3), None);

        assert_eq!(out.layout, PixelLayout::Gray);
        assert_eq!(out.pixels.len(), 12);
        assert!(!out.was_coerced());
    }

    #[test]
    fn test_rgb_passthrough() {
        let out = normalize_color(DynamicImage::new_rgb8(4, 3), Some([0, 0, 0]));

        assert_eq!(out.layout, PixelLayout::Rgb);
        assert_eq!((out.width, out.height), (4, 3));
        assert_eq!(out.pixels.len(), 36);
        assert!(!out.was_coerced());
    }

    #[test]
    fn test_wide_depth_downconverted() {
        let out = normalize_color(DynamicImage::new_rgb16(2, 2), None);

        assert_eq!(out.layout, PixelLayout::Rgb);
        assert_eq!(out.source_mode, ColorMode::Wide);
        assert_eq!(out.pixels.len(), 12);
    }

    #[test]
    fn test_blend_extremes() {
        assert_eq!(blend(200, 10, 255), 200);
        assert_eq!(blend(200, 10, 0), 10);
        assert_eq!(blend(255, 0, 128), 128);
    }
}
