//! Compression requests and upload validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CompressError;

/// Extensions accepted as raster images.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Extensions accepted as documents.
pub const DOCUMENT_EXTENSIONS: [&str; 1] = ["pdf"];

/// Default upload limit.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Target used when the request does not name one.
pub const DEFAULT_TARGET_SIZE_KB: f64 = 100.0;

/// Which adapter handles the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Image,
    Document,
}

impl ArtifactKind {
    /// Resolve the kind from a filename's last extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = extension(filename)?;
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(ArtifactKind::Image)
        } else if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            Some(ArtifactKind::Document)
        } else {
            None
        }
    }

    /// Mimetype of the compressed output.
    pub fn mime_type(self) -> &'static str {
        match self {
            ArtifactKind::Image => crate::artifact::ImageArtifact::MIME_TYPE,
            ArtifactKind::Document => crate::artifact::DocumentArtifact::MIME_TYPE,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Image => f.write_str("Image"),
            ArtifactKind::Document => f.write_str("PDF"),
        }
    }
}

fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// One artifact plus the size it should be compressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRequest {
    raw_bytes: Vec<u8>,
    target_size_bytes: u64,
    artifact_kind: ArtifactKind,
}

impl CompressionRequest {
    /// Fails with `InvalidTargetSize` when the target is zero.
    pub fn new(
        raw_bytes: Vec<u8>,
        target_size_bytes: u64,
        artifact_kind: ArtifactKind,
    ) -> Result<Self, CompressError> {
        if target_size_bytes == 0 {
            return Err(CompressError::target_not_positive());
        }
        Ok(Self {
            raw_bytes,
            target_size_bytes,
            artifact_kind,
        })
    }

    /// Build a request from a target in kilobytes (1 KB = 1024 bytes).
    ///
    /// The byte count is truncated, so targets below one byte are rejected.
    pub fn from_kilobytes(
        raw_bytes: Vec<u8>,
        target_size_kb: f64,
        artifact_kind: ArtifactKind,
    ) -> Result<Self, CompressError> {
        Self::new(raw_bytes, kilobytes_to_bytes(target_size_kb)?, artifact_kind)
    }

    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    pub fn target_size_bytes(&self) -> u64 {
        self.target_size_bytes
    }

    pub fn artifact_kind(&self) -> ArtifactKind {
        self.artifact_kind
    }
}

fn kilobytes_to_bytes(kb: f64) -> Result<u64, CompressError> {
    if !kb.is_finite() {
        return Err(CompressError::invalid_target_size());
    }
    if kb <= 0.0 {
        return Err(CompressError::target_not_positive());
    }
    // Saturating float-to-int cast; anything past u64::MAX is "no limit" anyway
    Ok((kb * 1024.0) as u64)
}

/// Parse the `targetSize` form value. A missing value means 100 KB.
pub fn parse_target_size_kb(value: Option<&str>) -> Result<f64, CompressError> {
    let Some(value) = value else {
        return Ok(DEFAULT_TARGET_SIZE_KB);
    };

    let kb: f64 = value
        .trim()
        .parse()
        .map_err(|_| CompressError::invalid_target_size())?;

    if !kb.is_finite() {
        return Err(CompressError::invalid_target_size());
    }
    if kb <= 0.0 {
        return Err(CompressError::target_not_positive());
    }
    Ok(kb)
}

/// Reduce an uploaded filename to something safe to echo back.
///
/// Path separators count as whitespace, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9._-]` is dropped, and `.`/`_` are trimmed from both
/// ends. The result may be empty.
pub fn sanitize_filename(filename: &str) -> String {
    let spaced = filename.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Name offered for the compressed download.
///
/// Images always come back as JPEG, so their extension is replaced.
pub fn download_name(sanitized: &str, kind: ArtifactKind) -> String {
    match kind {
        ArtifactKind::Image => {
            let stem = sanitized
                .rsplit_once('.')
                .map_or(sanitized, |(stem, _)| stem);
            format!("compressed_{stem}.jpg")
        }
        ArtifactKind::Document => format!("compressed_{sanitized}"),
    }
}

pub fn check_upload_size(len: usize, max_bytes: usize) -> Result<(), CompressError> {
    if len > max_bytes {
        return Err(CompressError::TooLarge {
            limit_bytes: max_bytes,
        });
    }
    Ok(())
}

/// An upload that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    /// Sanitized filename.
    pub filename: String,
    pub request: CompressionRequest,
}

impl ValidatedUpload {
    pub fn kind(&self) -> ArtifactKind {
        self.request.artifact_kind()
    }

    pub fn download_name(&self) -> String {
        download_name(&self.filename, self.kind())
    }
}

/// Validate a form upload: the file part (name and bytes) and the raw
/// `targetSize` value.
///
/// Checks run in a fixed order and the first failure wins: presence, size
/// against `max_bytes`, empty name, extension, target size, then the
/// sanitized name's kind.
pub fn validate_upload(
    file: Option<(&str, Vec<u8>)>,
    target_size: Option<&str>,
    max_bytes: usize,
) -> Result<ValidatedUpload, CompressError> {
    let Some((filename, bytes)) = file else {
        return Err(CompressError::NoFileProvided);
    };
    check_upload_size(bytes.len(), max_bytes)?;

    if filename.is_empty() {
        return Err(CompressError::NoFileSelected);
    }
    if ArtifactKind::from_filename(filename).is_none() {
        return Err(CompressError::InvalidFileType);
    }

    let target_size_kb = parse_target_size_kb(target_size)?;
    let target_size_bytes = kilobytes_to_bytes(target_size_kb)?;

    let sanitized = sanitize_filename(filename);
    let kind = ArtifactKind::from_filename(&sanitized).ok_or(CompressError::UnsupportedFileType)?;

    Ok(ValidatedUpload {
        filename: sanitized,
        request: CompressionRequest::new(bytes, target_size_bytes, kind)?,
    })
}
