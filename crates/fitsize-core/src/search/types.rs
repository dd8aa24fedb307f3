//! Samples, results and errors of the size search.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::EncodeError;

/// Errors that end a search without a result.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The encoder failed at the given quality. The search stops on the
    /// first failure; there is no retry.
    #[error("encoding failed at quality {quality}: {source}")]
    EncodingFailed {
        quality: u8,
        #[source]
        source: EncodeError,
    },

    /// The loop finished without taking a single sample.
    #[error("search produced no candidate")]
    NoCandidate,
}

/// One (quality, encoded bytes) observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualitySample {
    pub quality: u8,
    pub encoded: Vec<u8>,
}

impl QualitySample {
    pub fn new(quality: u8, encoded: Vec<u8>) -> Self {
        Self { quality, encoded }
    }

    #[inline]
    pub fn size_bytes(&self) -> u64 {
        self.encoded.len() as u64
    }

    /// Absolute distance between this sample's size and `target`.
    #[inline]
    pub fn distance_to(&self, target: u64) -> u64 {
        self.size_bytes().abs_diff(target)
    }
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// The quality-100 encoding already fit; no search was run.
    AlreadySmaller,
    /// The tolerance was met or the quality bounds crossed.
    Converged,
    /// The attempt cap ended the loop with bounds still open.
    AttemptsExhausted,
}

impl SearchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchStatus::AlreadySmaller => "already_smaller",
            SearchStatus::Converged => "converged",
            SearchStatus::AttemptsExhausted => "attempts_exhausted",
        }
    }
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The chosen encoding plus a human-readable outcome.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub encoded: Vec<u8>,
    pub achieved_size_bytes: u64,
    pub achieved_quality: u8,
    pub status: SearchStatus,
    pub message: String,
    /// Number of probes taken inside the search loop (0 on short circuit).
    pub attempts: u32,
}

impl CompressionResult {
    pub(crate) fn already_smaller(sample: QualitySample) -> Self {
        let size = sample.size_bytes();
        Self {
            message: format!(
                "Original size ({}KB) is already smaller than target",
                size / 1024
            ),
            achieved_size_bytes: size,
            achieved_quality: sample.quality,
            encoded: sample.encoded,
            status: SearchStatus::AlreadySmaller,
            attempts: 0,
        }
    }

    pub(crate) fn from_best(sample: QualitySample, status: SearchStatus, attempts: u32) -> Self {
        let size = sample.size_bytes();
        Self {
            message: format!(
                "Compressed to {}KB (Quality: {}%)",
                size / 1024,
                sample.quality
            ),
            achieved_size_bytes: size,
            achieved_quality: sample.quality,
            encoded: sample.encoded,
            status,
            attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_distance_is_symmetric() {
        let sample = QualitySample::new(50, vec![0u8; 1000]);
        assert_eq!(sample.size_bytes(), 1000);
        assert_eq!(sample.distance_to(1200), 200);
        assert_eq!(sample.distance_to(800), 200);
        assert_eq!(sample.distance_to(1000), 0);
    }

    #[test]
    fn test_already_smaller_message_floors_kilobytes() {
        let result = CompressionResult::already_smaller(QualitySample::new(100, vec![0u8; 2047]));
        assert_eq!(result.status, SearchStatus::AlreadySmaller);
        assert_eq!(result.achieved_quality, 100);
        assert_eq!(result.achieved_size_bytes, 2047);
        assert_eq!(result.message, "Original size (1KB) is already smaller than target");
    }

    #[test]
    fn test_compressed_message() {
        let result = CompressionResult::from_best(
            QualitySample::new(42, vec![0u8; 10 * 1024 + 1]),
            SearchStatus::Converged,
            6,
        );
        assert_eq!(result.message, "Compressed to 10KB (Quality: 42%)");
        assert_eq!(result.attempts, 6);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(SearchStatus::AlreadySmaller.to_string(), "already_smaller");
        assert_eq!(SearchStatus::AttemptsExhausted.as_str(), "attempts_exhausted");
    }
}
