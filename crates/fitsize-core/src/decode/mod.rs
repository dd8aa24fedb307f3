//! Image decoding and normalization for the image adapter.
//!
//! This module provides functionality for:
//! - Decoding PNG, JPEG, GIF and WebP input
//! - Applying EXIF orientation before the metadata is lost on re-encode
//! - Coercing alpha, palette and high bit depth images to 8-bit RGB
//!
//! # Examples
//!
//! ```ignore
//! use fitsize_core::decode::{decode_image, normalize_color};
//!
//! let bytes = std::fs::read("logo.png").unwrap();
//! let image = normalize_color(decode_image(&bytes, true).unwrap(), None);
//! println!("Normalized {}x{} image", image.width, image.height);
//! ```

mod normalize;
mod raster;
mod types;

pub use normalize::{normalize_color, NormalizedImage};
pub use raster::decode_image;
pub use types::{ColorMode, DecodeError, Orientation};
