//! Error types for the redaction pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for redaction operations.
pub type Result<T> = std::result::Result<T, RedactionError>;

/// A single recognizer could not complete a scan.
///
/// The reason is written by the recognizer and must never echo input text.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("recognizer '{recognizer}' failed: {reason}")]
pub struct RecognizerFailure {
    /// Name of the failing recognizer.
    pub recognizer: String,
    /// Short, text-free description of what went wrong.
    pub reason: String,
}

impl RecognizerFailure {
    pub fn new(recognizer: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            recognizer: recognizer.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while building or running the pipeline.
#[derive(Error, Debug)]
pub enum RedactionError {
    /// A recognizer failed during a scan.
    #[error(transparent)]
    Recognizer(#[from] RecognizerFailure),

    /// A span violated the offset invariant. This is a defect, not a
    /// runtime condition.
    #[error("invalid span {start}..{end} for text of {len} bytes: {reason}")]
    InvalidSpan {
        start: usize,
        end: usize,
        len: usize,
        reason: &'static str,
    },

    /// Failed to compile a regex pattern.
    #[error("pattern error: {0}")]
    Pattern(String),

    /// The requested locale has no recognizer set.
    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// A placeholder would itself be detected as PII, breaking idempotence.
    #[error("placeholder '{placeholder}' is matched by recognizer '{recognizer}'")]
    PlaceholderCollision {
        placeholder: String,
        recognizer: String,
    },

    /// Invalid construction-time configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl RedactionError {
    pub(crate) fn invalid_span(start: usize, end: usize, len: usize, reason: &'static str) -> Self {
        RedactionError::InvalidSpan {
            start,
            end,
            len,
            reason,
        }
    }

    /// Whether this error is raised per call (as opposed to at construction).
    pub fn is_runtime(&self) -> bool {
        matches!(
            self,
            RedactionError::Recognizer(_) | RedactionError::InvalidSpan { .. }
        )
    }
}

impl From<regex::Error> for RedactionError {
    fn from(err: regex::Error) -> Self {
        RedactionError::Pattern(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizer_failure_display() {
        let failure = RecognizerFailure::new("phone_de", "dictionary unavailable");
        assert_eq!(
            failure.to_string(),
            "recognizer 'phone_de' failed: dictionary unavailable"
        );

        let err: RedactionError = failure.into();
        assert!(err.is_runtime());
        assert!(err.to_string().contains("phone_de"));
    }

    #[test]
    fn test_invalid_span_display() {
        let err = RedactionError::invalid_span(4, 2, 10, "start >= end");
        assert_eq!(
            err.to_string(),
            "invalid span 4..2 for text of 10 bytes: start >= end"
        );
        assert!(err.is_runtime());
    }

    #[test]
    fn test_construction_errors_are_not_runtime() {
        assert!(!RedactionError::UnsupportedLocale("xx".into()).is_runtime());
        assert!(!RedactionError::Pattern("bad".into()).is_runtime());
        assert!(!RedactionError::Config("bad".into()).is_runtime());
    }

    #[test]
    fn test_regex_error_conversion() {
        let err: RedactionError = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(matches!(err, RedactionError::Pattern(_)));
    }
}
