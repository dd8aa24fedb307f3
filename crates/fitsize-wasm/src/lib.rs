//! fitsize WASM - WebAssembly bindings for fitsize
//!
//! This crate exposes the fitsize-core compression pipeline to
//! JavaScript/TypeScript, so files can be shrunk to a target size without
//! leaving the browser.
//!
//! # Module Structure
//!
//! - `compress` - Upload validation and size-targeting compression
//! - `types` - WASM-compatible result wrapper
//! - `console` - Search diagnostics routed to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_file } from '@fitsize/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_file(bytes, file.name, 100);
//! console.log(result.summary());
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod console;
mod types;

// Re-export public types
pub use compress::{compress_file, compress_file_with_options};
pub use console::ConsoleSink;
pub use types::JsCompressionResult;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Upload limit enforced by `compress_file`, in bytes.
#[wasm_bindgen]
pub fn max_upload_bytes() -> usize {
    fitsize_core::MAX_UPLOAD_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_max_upload_bytes() {
        assert_eq!(max_upload_bytes(), 16 * 1024 * 1024);
    }
}
