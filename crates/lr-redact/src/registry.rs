//! Recognizer registry.
//!
//! The registry is built once from a [`RegistryConfig`] and then shared
//! read-only. A scan runs every recognizer in registry order; one failing
//! or panicking recognizer never stops the others, it is reported in the
//! [`ScanReport`] instead.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::debug;

use crate::recognizer::{builtin, PatternRecognizer, Recognizer};
use crate::{
    CandidateSpan, Locale, RecognizerFailure, RecognizerId, RegistryConfig, Result,
    DEFAULT_MIN_SCORE,
};

/// Output of one registry scan.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Candidates at or above the minimum score, in registry order.
    pub candidates: Vec<CandidateSpan>,
    /// Recognizers that could not complete this scan.
    pub failures: Vec<RecognizerFailure>,
}

impl ScanReport {
    /// True when every recognizer completed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Ordered, immutable set of active recognizers.
pub struct RecognizerRegistry {
    recognizers: Vec<(RecognizerId, Arc<dyn Recognizer>)>,
    locale: Locale,
    min_score: f64,
}

impl RecognizerRegistry {
    /// Registry with no recognizers.
    pub fn empty(locale: Locale) -> Self {
        Self {
            recognizers: Vec::new(),
            locale,
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    /// Built-in recognizers for every kind in `locale`.
    pub fn for_locale(locale: Locale) -> Result<Self> {
        Self::from_config(&RegistryConfig::default().locale(locale))
    }

    /// Build from configuration: built-ins in kind order, then custom
    /// patterns in config order.
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        config.check()?;

        let mut registry = Self::empty(config.locale).with_min_score(config.min_score);

        for kind in &config.entity_kinds {
            for recognizer in builtin::recognizers_for(*kind, config.locale, &config.extra_names)? {
                registry = registry.with_recognizer(recognizer);
            }
        }

        for custom in &config.custom_patterns {
            let recognizer = PatternRecognizer::new(custom.name.clone(), custom.kind)
                .with_pattern(&custom.pattern, custom.score)?;
            registry = registry.with_recognizer(Arc::new(recognizer));
        }

        debug!(
            locale = %config.locale,
            recognizers = registry.len(),
            min_score = config.min_score,
            "recognizer registry built"
        );
        Ok(registry)
    }

    /// Append a recognizer at the end of registry order.
    ///
    /// A recognizer that panics is recorded as a failure, but the process
    /// panic hook still runs first. The default hook prints the panic message
    /// to stderr, and messages such as out-of-range string slicing include the
    /// input text. Install a quiet hook with [`std::panic::set_hook`] when
    /// recognizers may panic on user data.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn Recognizer>) -> Self {
        let id = RecognizerId {
            index: self.recognizers.len(),
            name: Arc::from(recognizer.name()),
        };
        self.recognizers.push((id, recognizer));
        self
    }

    /// Override the minimum candidate score.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    /// Recognizer names in registry order.
    pub fn names(&self) -> Vec<&str> {
        self.recognizers.iter().map(|(id, _)| &*id.name).collect()
    }

    /// Run every recognizer over `text`.
    ///
    /// Fails only when a recognizer returns a span that breaks the offset
    /// invariant; ordinary recognizer failures are collected in the report.
    pub fn scan(&self, text: &str) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        for (id, recognizer) in &self.recognizers {
            let outcome = catch_unwind(AssertUnwindSafe(|| recognizer.scan(text)));
            let spans = match outcome {
                Ok(Ok(spans)) => spans,
                Ok(Err(failure)) => {
                    report.failures.push(failure);
                    continue;
                }
                Err(_) => {
                    report
                        .failures
                        .push(RecognizerFailure::new(&*id.name, "panicked during scan"));
                    continue;
                }
            };

            for span in spans {
                if span.start == span.end {
                    continue;
                }
                span.validate(text)?;
                if span.score < self.min_score {
                    continue;
                }
                report.candidates.push(CandidateSpan::new(span, id.clone()));
            }
        }

        debug!(
            candidates = report.candidates.len(),
            failures = report.failures.len(),
            bytes = text.len(),
            "registry scan complete"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for RecognizerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognizerRegistry")
            .field("locale", &self.locale)
            .field("min_score", &self.min_score)
            .field("recognizers", &self.names())
            .finish()
    }
}
