//! WASM-compatible wrapper types for compression results.

use fitsize_core::{CompressedArtifact, SearchStatus};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The outcome of [`compress_file`](crate::compress_file).
///
/// The compressed bytes stay in WASM memory until `bytes` is read, which
/// copies them into a `Uint8Array`.
#[wasm_bindgen]
pub struct JsCompressionResult {
    bytes: Vec<u8>,
    mime_type: &'static str,
    message: String,
    quality: u8,
    status: SearchStatus,
    attempts: u32,
    download_name: String,
}

/// Plain-object view of a result, without the payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompressionSummary<'a> {
    mime_type: &'a str,
    message: &'a str,
    quality: u8,
    size_bytes: usize,
    status: SearchStatus,
    attempts: u32,
    download_name: &'a str,
}

#[wasm_bindgen]
impl JsCompressionResult {
    /// Compressed bytes as a `Uint8Array` (copied out of WASM memory).
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// `image/jpeg` or `application/pdf`
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }

    /// Quality the returned bytes were encoded at (1-100).
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.quality
    }

    #[wasm_bindgen(getter)]
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// `already_smaller`, `converged` or `attempts_exhausted`
    #[wasm_bindgen(getter)]
    pub fn status(&self) -> String {
        self.status.as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Suggested filename for saving the result.
    #[wasm_bindgen(getter)]
    pub fn download_name(&self) -> String {
        self.download_name.clone()
    }

    /// Everything except the bytes, as a plain JS object.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.to_summary())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsCompressionResult {
    pub(crate) fn from_compressed(compressed: CompressedArtifact, download_name: String) -> Self {
        let result = compressed.result;
        Self {
            bytes: result.encoded,
            mime_type: compressed.mime_type,
            message: result.message,
            quality: result.achieved_quality,
            status: result.status,
            attempts: result.attempts,
            download_name,
        }
    }

    pub(crate) fn to_summary(&self) -> CompressionSummary<'_> {
        CompressionSummary {
            mime_type: self.mime_type,
            message: &self.message,
            quality: self.quality,
            size_bytes: self.bytes.len(),
            status: self.status,
            attempts: self.attempts,
            download_name: &self.download_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitsize_core::CompressionResult;

    fn sample() -> JsCompressionResult {
        let compressed = CompressedArtifact {
            result: CompressionResult {
                encoded: vec![0xFF, 0xD8, 0xFF, 0xD9],
                achieved_size_bytes: 4,
                achieved_quality: 42,
                status: SearchStatus::Converged,
                message: "Compressed to 0KB (Quality: 42%)".to_string(),
                attempts: 6,
            },
            mime_type: "image/jpeg",
        };
        JsCompressionResult::from_compressed(compressed, "compressed_cat.jpg".to_string())
    }

    #[test]
    fn test_getters() {
        let result = sample();
        assert_eq!(result.bytes(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
        assert_eq!(result.mime_type(), "image/jpeg");
        assert_eq!(result.quality(), 42);
        assert_eq!(result.size_bytes(), 4);
        assert_eq!(result.status(), "converged");
        assert_eq!(result.attempts(), 6);
        assert_eq!(result.download_name(), "compressed_cat.jpg");
    }

    #[test]
    fn test_summary_mirrors_getters() {
        let result = sample();
        let summary = result.to_summary();
        assert_eq!(summary.message, result.message());
        assert_eq!(summary.size_bytes, 4);
        assert_eq!(summary.status, SearchStatus::Converged);
    }
}
