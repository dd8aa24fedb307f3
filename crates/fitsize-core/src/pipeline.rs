//! Request-level entry point: pick the adapter, run the search.

use crate::artifact::{DocumentArtifact, ImageArtifact};
use crate::config::CompressOptions;
use crate::error::CompressError;
use crate::request::{ArtifactKind, CompressionRequest};
use crate::search::{CompressionResult, EventSink, QualityEncoder, SizeTargetingSearch};

/// A search result together with the mimetype of its bytes.
#[derive(Debug, Clone)]
pub struct CompressedArtifact {
    pub result: CompressionResult,
    pub mime_type: &'static str,
}

/// Compress one request.
///
/// Decoding the artifact and every probe encode run synchronously on the
/// calling thread.
pub fn compress(
    request: &CompressionRequest,
    options: &CompressOptions,
    sink: &dyn EventSink,
) -> Result<CompressedArtifact, CompressError> {
    let kind = request.artifact_kind();
    let bytes = request.raw_bytes();

    let result = match kind {
        ArtifactKind::Image => {
            let artifact = ImageArtifact::decode(bytes, &options.image)
                .map_err(|e| CompressError::encoding(kind, e))?;
            log::debug!("decoded {}x{} image", artifact.width(), artifact.height());
            run_search(artifact, request, options, sink)?
        }
        ArtifactKind::Document => {
            let artifact = DocumentArtifact::load(bytes, &options.document)
                .map_err(|e| CompressError::encoding(kind, e))?;
            run_search(artifact, request, options, sink)?
        }
    };

    Ok(CompressedArtifact {
        result,
        mime_type: kind.mime_type(),
    })
}

fn run_search<E: QualityEncoder>(
    artifact: E,
    request: &CompressionRequest,
    options: &CompressOptions,
    sink: &dyn EventSink,
) -> Result<CompressionResult, CompressError> {
    SizeTargetingSearch::with_params(artifact, options.search)
        .run(request.target_size_bytes(), sink)
        .map_err(|e| CompressError::encoding(request.artifact_kind(), e))
}
