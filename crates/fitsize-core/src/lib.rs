//! fitsize core - compress images and PDFs to a target size
//!
//! This crate re-encodes an artifact at different quality levels and
//! binary-searches for the quality whose output size lands closest to a
//! requested byte count.
//!
//! # Example
//!
//! ```ignore
//! use fitsize_core::{compress, ArtifactKind, CompressOptions, CompressionRequest, LogSink};
//!
//! let request = CompressionRequest::from_kilobytes(bytes, 100.0, ArtifactKind::Image)?;
//! let out = compress(&request, &CompressOptions::default(), &LogSink)?;
//! println!("{}", out.result.message);
//! ```

pub mod artifact;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod request;
pub mod search;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use artifact::{DocumentArtifact, DocumentError, ImageArtifact};
pub use config::{parse_hex_color, CompressOptions, DocumentOptions, ImageOptions};
pub use decode::{decode_image, normalize_color, ColorMode, DecodeError, NormalizedImage};
pub use encode::{encode_jpeg, EncodeError, PixelLayout};
pub use error::CompressError;
pub use pipeline::{compress, CompressedArtifact};
pub use request::{
    check_upload_size, download_name, parse_target_size_kb, sanitize_filename, validate_upload,
    ArtifactKind, CompressionRequest, ValidatedUpload, MAX_UPLOAD_BYTES,
};
pub use search::{
    CompressionResult, EventSink, LogSink, NullSink, QualityEncoder, SearchError, SearchEvent,
    SearchParams, SearchStatus, SizeTargetingSearch,
};
