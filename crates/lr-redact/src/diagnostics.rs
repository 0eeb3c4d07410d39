//! Diagnostic channel for pipeline failures.
//!
//! When the filter falls back to whole-message redaction it reports why
//! through a [`DiagnosticSink`]. Events carry recognizer names and byte
//! counts only, never message text.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::RecognizerFailure;

/// `tracing` target used by [`TracingSink`].
pub const DIAGNOSTICS_TARGET: &str = "lr_redact::diagnostics";

/// Event name for a whole-message fallback.
pub const FALLBACK_EVENT: &str = "redaction.fallback";

/// Why a message was redacted in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum FallbackCause {
    /// One or more recognizers could not complete.
    RecognizerFailures(Vec<RecognizerFailure>),
    /// A span broke the offset invariant.
    InvalidSpan(String),
}

impl std::fmt::Display for FallbackCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackCause::RecognizerFailures(failures) => {
                let names: Vec<&str> = failures.iter().map(|f| f.recognizer.as_str()).collect();
                write!(f, "recognizer failures: {}", names.join(", "))
            }
            FallbackCause::InvalidSpan(detail) => write!(f, "invalid span: {}", detail),
        }
    }
}

/// Event reported to a [`DiagnosticSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiagnosticEvent {
    /// The filter emitted the fallback placeholder instead of the message.
    Fallback {
        cause: FallbackCause,
        /// Size of the discarded message.
        input_bytes: usize,
    },
}

impl DiagnosticEvent {
    /// Stable event name.
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticEvent::Fallback { .. } => FALLBACK_EVENT,
        }
    }
}

/// Receiver for diagnostic events. Called synchronously on the logging
/// thread, so implementations should be quick.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, event: &DiagnosticEvent);
}

/// Emits each event as a `tracing` error under [`DIAGNOSTICS_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, event: &DiagnosticEvent) {
        match event {
            DiagnosticEvent::Fallback { cause, input_bytes } => {
                error!(
                    target: DIAGNOSTICS_TARGET,
                    event = FALLBACK_EVENT,
                    cause = %cause,
                    input_bytes = *input_bytes,
                    "log message redacted in full after pipeline failure"
                );
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&self, _event: &DiagnosticEvent) {}
}

/// Keeps events in memory, for tests and alert polling.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return recorded events.
    pub fn drain(&self) -> Vec<DiagnosticEvent> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DiagnosticEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, event: &DiagnosticEvent) {
        self.lock().push(event.clone());
    }
}
