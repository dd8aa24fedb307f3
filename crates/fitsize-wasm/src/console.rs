//! Search diagnostics for the browser console.

use fitsize_core::{EventSink, SearchEvent};
use wasm_bindgen::JsValue;

/// Writes search events to the browser console.
///
/// Probes go to `console.debug`, so they are hidden unless the devtools
/// verbosity includes them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn record(&self, event: &SearchEvent) {
        let line = JsValue::from_str(&describe(event));
        match event {
            SearchEvent::Probe { .. } => web_sys::console::debug_1(&line),
            _ => web_sys::console::info_1(&line),
        }
    }
}

pub(crate) fn describe(event: &SearchEvent) -> String {
    match *event {
        SearchEvent::ShortCircuit {
            size_bytes,
            target_bytes,
        } => format!("[fitsize] full quality is {size_bytes} bytes, within target {target_bytes}"),
        SearchEvent::Probe {
            attempt,
            quality,
            size_bytes,
            target_bytes,
        } => format!(
            "[fitsize] probe {attempt}: quality {quality} -> {size_bytes} bytes (target {target_bytes})"
        ),
        SearchEvent::Finished {
            status,
            quality,
            size_bytes,
            attempts,
        } => format!(
            "[fitsize] {status} after {attempts} probes: quality {quality}, {size_bytes} bytes"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitsize_core::SearchStatus;

    #[test]
    fn test_describe() {
        let probe = SearchEvent::Probe {
            attempt: 3,
            quality: 37,
            size_bytes: 1200,
            target_bytes: 1000,
        };
        assert_eq!(
            describe(&probe),
            "[fitsize] probe 3: quality 37 -> 1200 bytes (target 1000)"
        );

        let finished = SearchEvent::Finished {
            status: SearchStatus::Converged,
            quality: 39,
            size_bytes: 990,
            attempts: 7,
        };
        assert_eq!(
            describe(&finished),
            "[fitsize] converged after 7 probes: quality 39, 990 bytes"
        );
    }
}
