//! Artifact adapters.
//!
//! Each adapter parses its input once and then implements
//! [`QualityEncoder`](crate::search::QualityEncoder), so the search can ask
//! it for a serialization at any quality.

mod document;
mod image;

pub use document::{DocumentArtifact, DocumentError};
pub use image::ImageArtifact;
