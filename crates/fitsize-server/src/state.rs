//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Instant;

use fitsize_core::{CompressOptions, MAX_UPLOAD_BYTES};

/// Shared application state.
///
/// Requests only read from it; each compression owns everything else.
#[derive(Debug, Clone)]
pub struct AppState {
    pub options: Arc<CompressOptions>,
    pub max_upload_bytes: usize,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(options: CompressOptions, max_upload_bytes: usize) -> Self {
        Self {
            options: Arc::new(options),
            max_upload_bytes,
            start_time: Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CompressOptions::default(), MAX_UPLOAD_BYTES)
    }
}
