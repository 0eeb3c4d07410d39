//! Placeholder substitution.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::{EntityKind, RedactionError, RedactionResult, ResolvedSpanSet, Result};

/// Whole-message replacement used when the pipeline cannot be trusted.
pub const FALLBACK_PLACEHOLDER: &str = "<REDACTED>";

/// Replaces resolved spans with per-kind placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Anonymizer {
    overrides: BTreeMap<EntityKind, String>,
    fallback: String,
}

impl Default for Anonymizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Anonymizer {
    /// Anonymizer with the default placeholders.
    pub fn new() -> Self {
        Self {
            overrides: BTreeMap::new(),
            fallback: FALLBACK_PLACEHOLDER.to_string(),
        }
    }

    /// Override the placeholder for `kind`.
    pub fn with_placeholder(mut self, kind: EntityKind, placeholder: impl Into<String>) -> Self {
        self.overrides.insert(kind, placeholder.into());
        self
    }

    /// Override the whole-message fallback marker.
    pub fn with_fallback_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.fallback = placeholder.into();
        self
    }

    pub fn placeholder(&self, kind: EntityKind) -> &str {
        self.overrides
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.placeholder())
    }

    pub fn fallback_placeholder(&self) -> &str {
        &self.fallback
    }

    /// Every marker this anonymizer can emit: one per kind, then the
    /// fallback.
    pub fn all_placeholders(&self) -> Vec<&str> {
        let mut all: Vec<&str> = EntityKind::ALL.iter().map(|k| self.placeholder(*k)).collect();
        all.push(&self.fallback);
        all
    }

    /// Replace each span of `spans` in `text`, in one pass.
    ///
    /// The span set is re-checked against `text`: offsets must be in
    /// bounds, on char boundaries, sorted and disjoint.
    pub fn apply(&self, text: &str, spans: &ResolvedSpanSet) -> Result<RedactionResult> {
        if spans.is_empty() {
            return Ok(RedactionResult::unchanged(text));
        }

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;

        for span in spans {
            span.validate(text)?;
            if span.start < cursor {
                return Err(RedactionError::InvalidSpan {
                    start: span.start,
                    end: span.end,
                    len: text.len(),
                    reason: "spans unsorted or overlapping",
                });
            }
            out.push_str(&text[cursor..span.start]);
            out.push_str(self.placeholder(span.kind));
            cursor = span.end;
        }
        out.push_str(&text[cursor..]);

        Ok(RedactionResult {
            text: out,
            applied: spans.clone(),
            fallback: false,
        })
    }

    /// Whole-message fallback. Empty text stays empty.
    pub fn redact_all(&self, text: &str) -> RedactionResult {
        if text.is_empty() {
            return RedactionResult::unchanged("");
        }
        RedactionResult {
            text: self.fallback.clone(),
            applied: ResolvedSpanSet::empty(),
            fallback: true,
        }
    }

    /// Byte ranges of each placeholder in `result.text`.
    ///
    /// Computed from the cumulative length change of earlier replacements.
    /// A fallback result yields one range spanning the whole output.
    pub fn output_ranges(&self, result: &RedactionResult) -> Vec<Range<usize>> {
        if result.fallback {
            return if result.text.is_empty() {
                Vec::new()
            } else {
                vec![0..result.text.len()]
            };
        }

        let mut delta: isize = 0;
        result
            .applied
            .iter()
            .map(|span| {
                let start = (span.start as isize + delta) as usize;
                let width = self.placeholder(span.kind).len();
                delta += width as isize - span.len() as isize;
                start..start + width
            })
            .collect()
    }
}
