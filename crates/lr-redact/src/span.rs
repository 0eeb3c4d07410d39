//! Span types shared by recognizers, resolver and anonymizer.
//!
//! All offsets are half-open byte offsets into the ORIGINAL text and must
//! fall on UTF-8 char boundaries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{EntityKind, RedactionError, Result};

/// A half-open range of text flagged as one PII entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: EntityKind,
    /// Confidence in `[0, 1]`.
    pub score: f64,
}

impl Span {
    pub fn new(start: usize, end: usize, kind: EntityKind, score: f64) -> Self {
        Self {
            start,
            end,
            kind,
            score,
        }
    }

    /// Length in bytes (zero for degenerate spans).
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether the two ranges share at least one byte.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check the offset and score invariants against `text`.
    pub fn validate(&self, text: &str) -> Result<()> {
        let len = text.len();
        if self.start >= self.end {
            return Err(RedactionError::invalid_span(self.start, self.end, len, "start >= end"));
        }
        if self.end > len {
            return Err(RedactionError::invalid_span(self.start, self.end, len, "end past text"));
        }
        if !text.is_char_boundary(self.start) || !text.is_char_boundary(self.end) {
            return Err(RedactionError::invalid_span(
                self.start,
                self.end,
                len,
                "not on a char boundary",
            ));
        }
        if !self.score.is_finite() || !(0.0..=1.0).contains(&self.score) {
            return Err(RedactionError::invalid_span(
                self.start,
                self.end,
                len,
                "score outside [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Identity of the recognizer that produced a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecognizerId {
    /// Position in registry order.
    pub index: usize,
    pub name: Arc<str>,
}

/// A span proposed by a single recognizer.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSpan {
    pub span: Span,
    pub recognizer: RecognizerId,
}

impl CandidateSpan {
    pub fn new(span: Span, recognizer: RecognizerId) -> Self {
        Self { span, recognizer }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn kind(&self) -> EntityKind {
        self.span.kind
    }

    pub fn score(&self) -> f64 {
        self.span.score
    }
}

/// Final spans: sorted by start and pairwise non-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedSpanSet(Vec<Span>);

impl ResolvedSpanSet {
    /// Build a set from spans, checking the ordering invariant.
    pub fn new(spans: Vec<Span>) -> Result<Self> {
        for span in &spans {
            if span.is_empty() {
                return Err(RedactionError::invalid_span(
                    span.start,
                    span.end,
                    span.end,
                    "start >= end",
                ));
            }
        }
        for pair in spans.windows(2) {
            if let [a, b] = pair {
                if a.end > b.start {
                    return Err(RedactionError::invalid_span(
                        b.start,
                        b.end,
                        a.end,
                        "spans unsorted or overlapping",
                    ));
                }
            }
        }
        Ok(Self(spans))
    }

    /// The resolver guarantees the invariant itself.
    pub(crate) fn from_resolved(spans: Vec<Span>) -> Self {
        debug_assert!(spans.windows(2).all(|w| w[0].end <= w[1].start));
        Self(spans)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Span> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Span] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Span> {
        self.0
    }

    /// Number of spans of `kind`.
    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.0.iter().filter(|s| s.kind == kind).count()
    }

    /// Whether `offset` lies inside some span.
    pub fn covers(&self, offset: usize) -> bool {
        self.0.iter().any(|s| s.start <= offset && offset < s.end)
    }
}

impl<'a> IntoIterator for &'a ResolvedSpanSet {
    type Item = &'a Span;
    type IntoIter = std::slice::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Output of one redaction call.
///
/// `applied` offsets refer to the ORIGINAL text. Use
/// [`crate::Anonymizer::output_ranges`] for output-relative ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionResult {
    pub text: String,
    pub applied: ResolvedSpanSet,
    /// True when the whole message was replaced after an internal failure.
    #[serde(default)]
    pub fallback: bool,
}

impl RedactionResult {
    /// Result for text with nothing to redact.
    pub fn unchanged(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            applied: ResolvedSpanSet::empty(),
            fallback: false,
        }
    }

    /// Whether the output differs from the input.
    pub fn was_modified(&self) -> bool {
        self.fallback || !self.applied.is_empty()
    }
}
