//! The redaction filter: one call per log record.
//!
//! Runs registry, resolver and anonymizer in sequence. The fail-closed
//! contract: [`RedactionFilter::process`] and [`RedactionFilter::redact`]
//! never return text that skipped detection. If any stage fails the whole
//! message becomes the fallback placeholder and one diagnostic event is
//! reported.

use std::sync::Arc;

use tracing::debug;

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, FallbackCause, TracingSink};
use crate::{
    Anonymizer, RecognizerFailure, RecognizerRegistry, RedactionError, RedactionResult,
    RegistryConfig, Result, SpanResolver,
};

/// Thread-safe `text -> text` PII filter.
pub struct RedactionFilter {
    registry: Arc<RecognizerRegistry>,
    resolver: SpanResolver,
    anonymizer: Anonymizer,
    sink: Arc<dyn DiagnosticSink>,
}

impl RedactionFilter {
    /// Assemble a filter.
    ///
    /// Fails if a placeholder is empty or would itself be detected by one of
    /// the registry's recognizers.
    pub fn new(
        registry: Arc<RecognizerRegistry>,
        anonymizer: Anonymizer,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self> {
        check_placeholders(&registry, &anonymizer)?;
        Ok(Self {
            registry,
            resolver: SpanResolver::new(),
            anonymizer,
            sink,
        })
    }

    /// Filter with default placeholders, reporting through `tracing`.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        let registry = RecognizerRegistry::from_config(config)?;
        Self::new(
            Arc::new(registry),
            Anonymizer::default(),
            Arc::new(TracingSink),
        )
    }

    /// Replace the diagnostic sink.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn registry(&self) -> &Arc<RecognizerRegistry> {
        &self.registry
    }

    pub fn anonymizer(&self) -> &Anonymizer {
        &self.anonymizer
    }

    /// Redacted text for `raw`.
    pub fn process(&self, raw: &str) -> String {
        self.redact(raw).text
    }

    /// Redact `raw`, falling back to the whole-message placeholder on any
    /// internal failure.
    pub fn redact(&self, raw: &str) -> RedactionResult {
        match self.run(raw) {
            Ok(result) => result,
            Err(failure) => {
                self.sink.report(&DiagnosticEvent::Fallback {
                    cause: failure.into_cause(),
                    input_bytes: raw.len(),
                });
                self.anonymizer.redact_all(raw)
            }
        }
    }

    /// Redact `raw` without the fallback. Errors are returned as-is and no
    /// diagnostic is reported.
    pub fn try_redact(&self, raw: &str) -> Result<RedactionResult> {
        self.run(raw).map_err(Failure::into_error)
    }

    fn run(&self, raw: &str) -> std::result::Result<RedactionResult, Failure> {
        if raw.is_empty() {
            return Ok(RedactionResult::unchanged(""));
        }

        let report = self.registry.scan(raw).map_err(Failure::Error)?;
        if !report.failures.is_empty() {
            return Err(Failure::Recognizers(report.failures));
        }

        let spans = self.resolver.resolve(&report.candidates);
        let result = self.anonymizer.apply(raw, &spans).map_err(Failure::Error)?;

        debug!(
            candidates = report.candidates.len(),
            applied = result.applied.len(),
            bytes = raw.len(),
            "message redacted"
        );
        Ok(result)
    }
}

/// Pipeline failure for one call.
enum Failure {
    Recognizers(Vec<RecognizerFailure>),
    Error(RedactionError),
}

impl Failure {
    fn into_cause(self) -> FallbackCause {
        match self {
            Failure::Recognizers(failures) => FallbackCause::RecognizerFailures(failures),
            Failure::Error(err) => FallbackCause::InvalidSpan(err.to_string()),
        }
    }

    fn into_error(self) -> RedactionError {
        match self {
            Failure::Recognizers(mut failures) => RedactionError::Recognizer(failures.swap_remove(0)),
            Failure::Error(err) => err,
        }
    }
}

fn check_placeholders(registry: &RecognizerRegistry, anonymizer: &Anonymizer) -> Result<()> {
    for placeholder in anonymizer.all_placeholders() {
        if placeholder.is_empty() {
            return Err(RedactionError::Config("placeholder must not be empty".to_string()));
        }
        let report = registry.scan(placeholder)?;
        if let Some(failure) = report.failures.into_iter().next() {
            return Err(RedactionError::Recognizer(failure));
        }
        if let Some(hit) = report.candidates.first() {
            return Err(RedactionError::PlaceholderCollision {
                placeholder: placeholder.to_string(),
                recognizer: hit.recognizer.name.to_string(),
            });
        }
    }
    Ok(())
}

impl std::fmt::Debug for RedactionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedactionFilter")
            .field("registry", &self.registry)
            .field("anonymizer", &self.anonymizer)
            .finish_non_exhaustive()
    }
}
