//! Quality search toward a target byte size.
//!
//! The search only sees an encoder capability, `encode(quality) -> bytes`,
//! and the sizes it returns. It assumes output size grows with quality; when
//! that doesn't hold (see the document adapter) it still terminates and
//! returns the closest sample it saw.
//!
//! ## Algorithm
//!
//! 1. Encode at quality 100. If that already fits, stop.
//! 2. Binary search the closed range 1..=100:
//!    - probe `q = (min + max) / 2`
//!    - keep the probe if it is strictly closer to the target than the best
//!      so far (ties keep the earlier probe)
//!    - too big: `max = q - 1`, otherwise `min = q + 1`
//!    - stop once a probe lands within the tolerance, the bounds cross, or
//!      the attempt cap is reached.
//!
//! With the default cap of 20 the encoder runs at most 21 times.

mod events;
mod types;

use serde::{Deserialize, Serialize};

use crate::encode::EncodeError;

pub use events::{EventSink, LogSink, NullSink, SearchEvent};
pub use types::{CompressionResult, QualitySample, SearchError, SearchStatus};

/// Lowest quality the search will probe.
pub const MIN_QUALITY: u8 = 1;
/// Highest quality; also the short-circuit probe.
pub const MAX_QUALITY: u8 = 100;
/// Iteration cap of the search loop.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;
/// A probe this close to the target ends the search.
pub const DEFAULT_TOLERANCE_BYTES: u64 = 512;

/// Something that can produce an encoding of itself at a given quality.
///
/// Implementations must be deterministic: the same quality always yields
/// the same bytes.
pub trait QualityEncoder {
    fn encode(&self, quality: u8) -> Result<Vec<u8>, EncodeError>;
}

impl<F> QualityEncoder for F
where
    F: Fn(u8) -> Result<Vec<u8>, EncodeError>,
{
    fn encode(&self, quality: u8) -> Result<Vec<u8>, EncodeError> {
        self(quality)
    }
}

/// Tuning knobs of the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Maximum number of probes inside the loop.
    pub max_attempts: u32,
    /// Early-exit window around the target, in bytes.
    pub tolerance_bytes: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            tolerance_bytes: DEFAULT_TOLERANCE_BYTES,
        }
    }
}

/// Binary search over encoder quality for the output closest to a target size.
#[derive(Debug, Clone)]
pub struct SizeTargetingSearch<E> {
    encoder: E,
    params: SearchParams,
}

impl<E: QualityEncoder> SizeTargetingSearch<E> {
    /// Create a search with the default cap and tolerance.
    pub fn new(encoder: E) -> Self {
        Self::with_params(encoder, SearchParams::default())
    }

    pub fn with_params(encoder: E, params: SearchParams) -> Self {
        Self { encoder, params }
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn params(&self) -> SearchParams {
        self.params
    }

    /// Find the encoding whose size is closest to `target_size_bytes`.
    ///
    /// Callers guarantee `target_size_bytes > 0`. Running out of attempts is
    /// not an error; the closest sample is returned with
    /// [`SearchStatus::AttemptsExhausted`].
    ///
    /// # Errors
    ///
    /// `SearchError::EncodingFailed` on the first encoder failure,
    /// `SearchError::NoCandidate` if the loop never probed (only possible
    /// with `max_attempts == 0`).
    pub fn run(
        &self,
        target_size_bytes: u64,
        sink: &dyn EventSink,
    ) -> Result<CompressionResult, SearchError> {
        let target = target_size_bytes;

        let top = self.probe(MAX_QUALITY)?;
        if top.size_bytes() <= target {
            sink.record(&SearchEvent::ShortCircuit {
                size_bytes: top.size_bytes(),
                target_bytes: target,
            });
            return Ok(CompressionResult::already_smaller(top));
        }
        drop(top);

        let mut min_quality = MIN_QUALITY;
        let mut max_quality = MAX_QUALITY;
        let mut best: Option<QualitySample> = None;
        let mut attempts = 0u32;
        let mut within_tolerance = false;

        while min_quality <= max_quality && attempts < self.params.max_attempts {
            attempts += 1;
            let quality = midpoint(min_quality, max_quality);
            let sample = self.probe(quality)?;
            let size = sample.size_bytes();
            let distance = sample.distance_to(target);

            sink.record(&SearchEvent::Probe {
                attempt: attempts,
                quality,
                size_bytes: size,
                target_bytes: target,
            });

            if size > target {
                max_quality = quality - 1;
            } else {
                min_quality = quality + 1;
            }

            if best
                .as_ref()
                .map_or(true, |current| distance < current.distance_to(target))
            {
                best = Some(sample);
            }

            if distance <= self.params.tolerance_bytes {
                within_tolerance = true;
                break;
            }
        }

        let best = best.ok_or(SearchError::NoCandidate)?;

        let capped = attempts >= self.params.max_attempts && min_quality <= max_quality;
        let status = if !within_tolerance && capped {
            SearchStatus::AttemptsExhausted
        } else {
            SearchStatus::Converged
        };

        sink.record(&SearchEvent::Finished {
            status,
            quality: best.quality,
            size_bytes: best.size_bytes(),
            attempts,
        });

        Ok(CompressionResult::from_best(best, status, attempts))
    }

    fn probe(&self, quality: u8) -> Result<QualitySample, SearchError> {
        self.encoder
            .encode(quality)
            .map(|encoded| QualitySample::new(quality, encoded))
            .map_err(|source| SearchError::EncodingFailed { quality, source })
    }
}

#[inline]
fn midpoint(min: u8, max: u8) -> u8 {
    ((min as u16 + max as u16) / 2) as u8
}


// ============================================================================
// Property-Based Tests
// ============================================================================
