//! Regex-based recognizers.

use regex::Regex;

use super::Recognizer;
use crate::{EntityKind, RecognizerFailure, RedactionError, Result, Span};

/// Post-match check on the matched text (checksums, reserved ranges).
pub type Validator = fn(&str) -> bool;

/// One compiled pattern with its confidence.
#[derive(Debug, Clone)]
struct Pattern {
    regex: Regex,
    score: f64,
    /// Capture group that becomes the span (whole match when `None`).
    group: Option<usize>,
}

/// Recognizer backed by one or more regular expressions.
#[derive(Debug, Clone)]
pub struct PatternRecognizer {
    name: String,
    kind: EntityKind,
    patterns: Vec<Pattern>,
    validator: Option<Validator>,
}

impl PatternRecognizer {
    /// Create a recognizer with no patterns yet.
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            patterns: Vec::new(),
            validator: None,
        }
    }

    /// Add a pattern whose whole match is the span.
    pub fn with_pattern(self, pattern: &str, score: f64) -> Result<Self> {
        self.push(pattern, score, None)
    }

    /// Add a pattern whose capture group `group` is the span.
    pub fn with_group_pattern(self, pattern: &str, score: f64, group: usize) -> Result<Self> {
        self.push(pattern, score, Some(group))
    }

    /// Reject matches for which `validator` returns false.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Number of compiled patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    fn push(mut self, pattern: &str, score: f64, group: Option<usize>) -> Result<Self> {
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(RedactionError::Config(format!(
                "recognizer '{}': score {} outside [0, 1]",
                self.name, score
            )));
        }
        let regex = Regex::new(pattern)
            .map_err(|e| RedactionError::Pattern(format!("{}: {}", self.name, e)))?;
        if let Some(g) = group {
            if g >= regex.captures_len() {
                return Err(RedactionError::Pattern(format!(
                    "{}: capture group {} does not exist",
                    self.name, g
                )));
            }
        }
        self.patterns.push(Pattern {
            regex,
            score,
            group,
        });
        Ok(self)
    }

    fn accept(&self, matched: &str) -> bool {
        self.validator.map_or(true, |validate| validate(matched))
    }
}

impl Recognizer for PatternRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn scan(&self, text: &str) -> std::result::Result<Vec<Span>, RecognizerFailure> {
        let mut spans = Vec::new();

        for pattern in &self.patterns {
            match pattern.group {
                None => {
                    for m in pattern.regex.find_iter(text) {
                        if !m.as_str().is_empty() && self.accept(m.as_str()) {
                            spans.push(Span::new(m.start(), m.end(), self.kind, pattern.score));
                        }
                    }
                }
                Some(group) => {
                    for caps in pattern.regex.captures_iter(text) {
                        if let Some(m) = caps.get(group) {
                            if !m.as_str().is_empty() && self.accept(m.as_str()) {
                                spans.push(Span::new(
                                    m.start(),
                                    m.end(),
                                    self.kind,
                                    pattern.score,
                                ));
                            }
                        }
                    }
                }
            }
        }

        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_match_spans() {
        let r = PatternRecognizer::new("digits", EntityKind::NationalId)
            .with_pattern(r"\b\d{4}\b", 0.7)
            .unwrap();
        let spans = r.scan("pin 1234 and 5678").unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end), (4, 8));
        assert_eq!((spans[1].start, spans[1].end), (13, 17));
        assert!(spans.iter().all(|s| s.score == 0.7));
    }

    #[test]
    fn test_empty_matches_skipped() {
        let r = PatternRecognizer::new("digit_lines", EntityKind::NationalId)
            .with_pattern(r"(?m)^\d*$", 0.9)
            .unwrap();
        let spans = r.scan("call 555\n\n1234").unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (10, 14));
    }

    #[test]
    fn test_group_spans() {
        let r = PatternRecognizer::new("tagged", EntityKind::Person)
            .with_group_pattern(r"name=(\w+)", 0.9, 1)
            .unwrap();
        let spans = r.scan("user name=alice logged in").unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(&"user name=alice logged in"[spans[0].start..spans[0].end], "alice");
    }

    #[test]
    fn test_validator_filters() {
        fn even_only(s: &str) -> bool {
            s.parse::<u32>().map(|n| n % 2 == 0).unwrap_or(false)
        }
        let r = PatternRecognizer::new("even", EntityKind::NationalId)
            .with_pattern(r"\b\d+\b", 1.0)
            .unwrap()
            .with_validator(even_only);
        let spans = r.scan("1 2 3 4").unwrap();
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_bad_pattern_is_error() {
        let err = PatternRecognizer::new("broken", EntityKind::Email)
            .with_pattern("(unclosed", 1.0)
            .unwrap_err();
        assert!(matches!(err, RedactionError::Pattern(_)));
    }

    #[test]
    fn test_bad_score_is_error() {
        let err = PatternRecognizer::new("broken", EntityKind::Email)
            .with_pattern("x", 1.2)
            .unwrap_err();
        assert!(matches!(err, RedactionError::Config(_)));
    }

    #[test]
    fn test_missing_group_is_error() {
        let err = PatternRecognizer::new("broken", EntityKind::Email)
            .with_group_pattern("x(y)", 1.0, 2)
            .unwrap_err();
        assert!(matches!(err, RedactionError::Pattern(_)));
    }

    #[test]
    fn test_no_match_is_empty() {
        let r = PatternRecognizer::new("digits", EntityKind::NationalId)
            .with_pattern(r"\d+", 1.0)
            .unwrap();
        assert!(r.scan("").unwrap().is_empty());
        assert!(r.scan("no numbers here").unwrap().is_empty());
    }
}
