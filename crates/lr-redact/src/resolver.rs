//! Span resolution.
//!
//! Candidates from independent recognizers overlap freely. The resolver
//! turns them into a sorted, disjoint set with a total ordering so the
//! same candidates always give the same result:
//!
//! 1. drop zero-length and inverted candidates;
//! 2. sort by start ascending, score descending, kind discriminant
//!    ascending, registry index ascending (end descending last);
//! 3. sweep left to right. A candidate inside the accepted span is
//!    discarded. A candidate that extends past it widens the accepted span,
//!    and its kind and score win only when strictly more confident.
//!
//! Every byte of every surviving candidate stays covered.

use std::cmp::Ordering;

use crate::{CandidateSpan, ResolvedSpanSet, Span};

/// Stateless conflict resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanResolver;

impl SpanResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve candidates into a non-overlapping set.
    pub fn resolve(&self, candidates: &[CandidateSpan]) -> ResolvedSpanSet {
        let mut ordered: Vec<&CandidateSpan> =
            candidates.iter().filter(|c| c.start() < c.end()).collect();
        ordered.sort_by(|a, b| compare(a, b));

        let mut resolved: Vec<Span> = Vec::new();
        let mut accepted: Option<Span> = None;

        for candidate in ordered {
            let span = candidate.span;
            if let Some(current) = accepted.as_mut() {
                if span.start < current.end {
                    if span.end > current.end {
                        current.end = span.end;
                        if span.score > current.score {
                            current.kind = span.kind;
                            current.score = span.score;
                        }
                    }
                    continue;
                }
            }
            if let Some(done) = accepted.replace(span) {
                resolved.push(done);
            }
        }
        resolved.extend(accepted);

        ResolvedSpanSet::from_resolved(resolved)
    }
}

fn compare(a: &CandidateSpan, b: &CandidateSpan) -> Ordering {
    a.start()
        .cmp(&b.start())
        .then_with(|| b.score().total_cmp(&a.score()))
        .then_with(|| a.kind().cmp(&b.kind()))
        .then_with(|| a.recognizer.index.cmp(&b.recognizer.index))
        .then_with(|| b.end().cmp(&a.end()))
}
