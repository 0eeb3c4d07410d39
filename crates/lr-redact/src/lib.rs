//! PII redaction pipeline for log messages.
//!
//! Free-text log messages pass through a [`RedactionFilter`] before they are
//! persisted. The filter scans the text with a [`RecognizerRegistry`],
//! resolves overlapping candidates with a [`SpanResolver`], and rewrites the
//! surviving spans with per-kind placeholders using an [`Anonymizer`].
//!
//! # Key Features
//!
//! - **Locale-aware recognizers**: email, phone, person-name and national-ID
//!   recognizers for `en_US`, `en_GB`, `de_DE` and `he_IL`, with checksum
//!   validation for identifiers.
//! - **Deterministic resolution**: a total ordering over candidates means the
//!   same input always produces the same output.
//! - **Idempotent output**: placeholders are checked at construction never
//!   to match a recognizer, so redacting twice changes nothing.
//! - **Fail-closed**: if any recognizer fails, the whole message becomes
//!   `<REDACTED>` and a [`DiagnosticEvent`] is reported.
//!
//! # Example
//!
//! ```no_run
//! use lr_redact::{RedactionFilter, RegistryConfig};
//!
//! let filter = RedactionFilter::from_config(&RegistryConfig::default()).unwrap();
//! let out = filter.process("Contact John Doe at john.doe@example.com or 555-123-4567");
//! assert_eq!(out, "Contact <PERSON> at <EMAIL_ADDRESS> or <PHONE_NUMBER>");
//! ```

pub mod anonymizer;
pub mod config;
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod filter;
pub mod locale;
pub mod recognizer;
pub mod registry;
pub mod resolver;
pub mod span;

pub use anonymizer::{Anonymizer, FALLBACK_PLACEHOLDER};
pub use config::{CustomPattern, RegistryConfig, DEFAULT_MIN_SCORE};
pub use diagnostics::{
    DiagnosticEvent, DiagnosticSink, FallbackCause, MemorySink, NoopSink, TracingSink,
    DIAGNOSTICS_TARGET,
};
pub use entity::EntityKind;
pub use error::{RecognizerFailure, RedactionError, Result};
pub use filter::RedactionFilter;
pub use locale::Locale;
pub use recognizer::{NameRecognizer, PatternRecognizer, Recognizer};
pub use registry::{RecognizerRegistry, ScanReport};
pub use resolver::SpanResolver;
pub use span::{CandidateSpan, RecognizerId, RedactionResult, ResolvedSpanSet, Span};
