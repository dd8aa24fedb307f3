//! Compression options.
//!
//! Defaults reproduce the behavior the service has always had: 20 probes,
//! 512-byte tolerance, alpha dropped without a matte, PDF images left alone.

use serde::{Deserialize, Serialize};

use crate::search::SearchParams;

/// Options for the image adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Bake the EXIF orientation into the pixels before encoding.
    pub apply_orientation: bool,
    /// Matte color for translucent pixels. `None` drops alpha as-is.
    pub background: Option<[u8; 3]>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            apply_orientation: true,
            background: None,
        }
    }
}

/// Options for the document adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    /// Re-encode embedded JPEG images at the probe quality.
    ///
    /// Off by default: pages are copied verbatim and only the metadata
    /// records the quality, so output size barely depends on it.
    pub recompress_images: bool,
}

/// Everything the pipeline needs besides the request itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressOptions {
    pub search: SearchParams,
    pub image: ImageOptions,
    pub document: DocumentOptions,
}

/// Parse a `RRGGBB` hex color (an optional leading `#` is accepted).
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TOLERANCE_BYTES};

    #[test]
    fn test_defaults() {
        let options = CompressOptions::default();
        assert_eq!(options.search.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(options.search.tolerance_bytes, DEFAULT_TOLERANCE_BYTES);
        assert!(options.image.apply_orientation);
        assert_eq!(options.image.background, None);
        assert!(!options.document.recompress_images);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("ffffff"), Some([255, 255, 255]));
        assert_eq!(parse_hex_color("#10A0fF"), Some([16, 160, 255]));
        assert_eq!(parse_hex_color(" 000000 "), Some([0, 0, 0]));
        assert_eq!(parse_hex_color("fff"), None);
        assert_eq!(parse_hex_color("gggggg"), None);
        assert_eq!(parse_hex_color("ééé"), None);
    }
}
