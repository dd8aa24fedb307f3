//! Caller-facing error taxonomy.

use thiserror::Error;

use crate::request::ArtifactKind;

/// Everything a compression request can fail with.
///
/// The `Display` text of the validation variants is meant to be shown to the
/// end user as-is. `EncodingFailed` carries internal detail and should be
/// logged rather than echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressError {
    #[error("No file provided")]
    NoFileProvided,

    #[error("No file selected")]
    NoFileSelected,

    /// The original filename has no allowed extension.
    #[error("Invalid file type")]
    InvalidFileType,

    #[error("{0}")]
    InvalidTargetSize(String),

    /// The sanitized filename no longer resolves to a known kind.
    #[error("Unsupported file type")]
    UnsupportedFileType,

    #[error("File is too large (max {}MB)", .limit_bytes / (1024 * 1024))]
    TooLarge { limit_bytes: usize },

    /// Decoding the artifact or encoding one of its probes failed.
    #[error("Failed to compress {kind}: {detail}")]
    EncodingFailed { kind: ArtifactKind, detail: String },
}

impl CompressError {
    pub(crate) const INVALID_TARGET_SIZE: &'static str = "Invalid target size";
    pub(crate) const TARGET_NOT_POSITIVE: &'static str = "Target size must be greater than 0";

    /// True for problems with the request itself rather than with encoding.
    pub fn is_validation(&self) -> bool {
        !matches!(self, CompressError::EncodingFailed { .. })
    }

    pub(crate) fn invalid_target_size() -> Self {
        CompressError::InvalidTargetSize(Self::INVALID_TARGET_SIZE.to_string())
    }

    pub(crate) fn target_not_positive() -> Self {
        CompressError::InvalidTargetSize(Self::TARGET_NOT_POSITIVE.to_string())
    }

    pub(crate) fn encoding(kind: ArtifactKind, detail: impl std::fmt::Display) -> Self {
        CompressError::EncodingFailed {
            kind,
            detail: detail.to_string(),
        }
    }
}
