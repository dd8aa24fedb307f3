//! Diagnostic events emitted while searching.
//!
//! The search never talks to a logger directly. It is handed an
//! [`EventSink`], initialized once per process by whoever hosts the core,
//! and reports each step through it.

use super::SearchStatus;

/// A single step of the size search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The quality-100 encoding already fits the target.
    ShortCircuit { size_bytes: u64, target_bytes: u64 },
    /// One probe inside the search loop.
    Probe {
        attempt: u32,
        quality: u8,
        size_bytes: u64,
        target_bytes: u64,
    },
    /// The search picked its answer.
    Finished {
        status: SearchStatus,
        quality: u8,
        size_bytes: u64,
        attempts: u32,
    },
}

/// Narrow capability for recording search diagnostics.
///
/// Implementations must tolerate concurrent callers; every event is written
/// as a unit.
pub trait EventSink {
    fn record(&self, event: &SearchEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&self, event: &SearchEvent) {
        match *event {
            SearchEvent::ShortCircuit {
                size_bytes,
                target_bytes,
            } => log::info!(
                "quality 100 yields {} bytes, already within target of {} bytes",
                size_bytes,
                target_bytes
            ),
            SearchEvent::Probe {
                attempt,
                quality,
                size_bytes,
                target_bytes,
            } => log::debug!(
                "probe {}: quality {} -> {} bytes (target {}, off by {})",
                attempt,
                quality,
                size_bytes,
                target_bytes,
                size_bytes.abs_diff(target_bytes)
            ),
            SearchEvent::Finished {
                status,
                quality,
                size_bytes,
                attempts,
            } => log::info!(
                "search {} after {} probes: quality {} at {} bytes",
                status,
                attempts,
                quality,
                size_bytes
            ),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &SearchEvent) {}
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn record(&self, event: &SearchEvent) {
        (**self).record(event)
    }
}
