//! Compression WASM bindings.
//!
//! Runs the same validation and search as the HTTP service, entirely in the
//! browser.
//!
//! # Example
//!
//! ```typescript
//! import { compress_file } from '@fitsize/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_file(bytes, file.name, 100);
//! const blob = new Blob([result.bytes], { type: result.mime_type });
//! console.log(result.message);
//! ```

use fitsize_core::{
    compress, validate_upload, CompressError, CompressOptions, EventSink, MAX_UPLOAD_BYTES,
};
use wasm_bindgen::prelude::*;

use crate::console::ConsoleSink;
use crate::types::JsCompressionResult;

/// Compress a file to roughly `target_size_kb` kilobytes.
///
/// # Arguments
///
/// * `bytes` - File contents as a `Uint8Array`
/// * `filename` - Original filename; its extension picks image or PDF handling
/// * `target_size_kb` - Target size in kilobytes (1 KB = 1024 bytes)
///
/// # Errors
///
/// Throws an `Error` whose message is the validation failure ("Invalid file
/// type", "Target size must be greater than 0", ...) or the encoding failure.
#[wasm_bindgen]
pub fn compress_file(
    bytes: Vec<u8>,
    filename: &str,
    target_size_kb: f64,
) -> Result<JsCompressionResult, JsValue> {
    run(
        bytes,
        filename,
        target_size_kb,
        &CompressOptions::default(),
        &ConsoleSink,
    )
    .map_err(to_js_error)
}

/// Like [`compress_file`], with options given as a plain object, e.g.
/// `{ search: { max_attempts: 10 }, image: { background: [255, 255, 255] } }`.
/// Missing fields keep their defaults.
#[wasm_bindgen]
pub fn compress_file_with_options(
    bytes: Vec<u8>,
    filename: &str,
    target_size_kb: f64,
    options: JsValue,
) -> Result<JsCompressionResult, JsValue> {
    let options: CompressOptions = if options.is_undefined() || options.is_null() {
        CompressOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))?
    };

    run(bytes, filename, target_size_kb, &options, &ConsoleSink).map_err(to_js_error)
}

/// Validation and compression without any JS types involved.
pub(crate) fn run(
    bytes: Vec<u8>,
    filename: &str,
    target_size_kb: f64,
    options: &CompressOptions,
    sink: &dyn EventSink,
) -> Result<JsCompressionResult, CompressError> {
    // Form values arrive as text; a JS number goes through the same parser
    let target = target_size_kb.to_string();
    let validated = validate_upload(Some((filename, bytes)), Some(&target), MAX_UPLOAD_BYTES)?;

    let compressed = compress(&validated.request, options, sink)?;
    Ok(JsCompressionResult::from_compressed(
        compressed,
        validated.download_name(),
    ))
}

fn to_js_error(err: CompressError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
