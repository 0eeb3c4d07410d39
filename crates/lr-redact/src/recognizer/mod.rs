//! Recognizers: single-purpose matchers for one entity kind.
//!
//! Every recognizer is immutable after construction and safe to call from
//! many threads at once. Unmatched or malformed text yields no spans; an
//! `Err` is reserved for a recognizer that cannot run at all.

pub mod builtin;
pub mod name;
pub mod pattern;

pub use name::NameRecognizer;
pub use pattern::{PatternRecognizer, Validator};

use crate::{EntityKind, RecognizerFailure, Span};

/// Capability: find instances of one entity kind in text.
pub trait Recognizer: Send + Sync {
    /// Stable name, used in diagnostics and tie-break traces.
    fn name(&self) -> &str;

    /// The entity kind this recognizer emits.
    fn kind(&self) -> EntityKind;

    /// Scan `text` and return candidate spans (byte offsets into `text`).
    fn scan(&self, text: &str) -> std::result::Result<Vec<Span>, RecognizerFailure>;
}

impl std::fmt::Debug for dyn Recognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recognizer")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}
