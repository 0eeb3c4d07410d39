//! Registry configuration.
//!
//! Selects which entity kinds are active, the locale whose grammars are
//! used, the minimum candidate score, and any extra patterns or names.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{EntityKind, Locale, RedactionError, Result};

/// Candidates below this score are dropped unless configured otherwise.
pub const DEFAULT_MIN_SCORE: f64 = 0.4;

/// Construction-time configuration for a [`crate::RecognizerRegistry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Entity kinds to detect.
    #[serde(default = "default_entity_kinds")]
    pub entity_kinds: BTreeSet<EntityKind>,

    /// Locale selecting phone, national-ID and name grammars.
    #[serde(default)]
    pub locale: Locale,

    /// Minimum candidate score.
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Extra regex recognizers, registered after the built-ins.
    #[serde(default)]
    pub custom_patterns: Vec<CustomPattern>,

    /// Extra first names for the person recognizer.
    #[serde(default)]
    pub extra_names: Vec<String>,
}

fn default_entity_kinds() -> BTreeSet<EntityKind> {
    EntityKind::ALL.iter().copied().collect()
}

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            entity_kinds: default_entity_kinds(),
            locale: Locale::default(),
            min_score: DEFAULT_MIN_SCORE,
            custom_patterns: Vec::new(),
            extra_names: Vec::new(),
        }
    }
}

impl RegistryConfig {
    /// Default config restricted to `kinds`.
    pub fn with_kinds(kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        Self {
            entity_kinds: kinds.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Set the locale.
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Set the minimum score.
    pub fn min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Add a custom pattern.
    pub fn custom_pattern(mut self, pattern: CustomPattern) -> Self {
        self.custom_patterns.push(pattern);
        self
    }

    /// Whether `kind` is active.
    pub fn is_enabled(&self, kind: EntityKind) -> bool {
        self.entity_kinds.contains(&kind)
    }

    /// Check value ranges. Regexes are compiled when the registry is built.
    pub fn check(&self) -> Result<()> {
        if !self.min_score.is_finite() || !(0.0..=1.0).contains(&self.min_score) {
            return Err(RedactionError::Config(format!(
                "min_score {} outside [0, 1]",
                self.min_score
            )));
        }
        for pattern in &self.custom_patterns {
            if pattern.name.trim().is_empty() {
                return Err(RedactionError::Config(
                    "custom pattern with empty name".to_string(),
                ));
            }
            if !pattern.score.is_finite() || !(0.0..=1.0).contains(&pattern.score) {
                return Err(RedactionError::Config(format!(
                    "custom pattern '{}': score {} outside [0, 1]",
                    pattern.name, pattern.score
                )));
            }
        }
        Ok(())
    }
}

/// A user-supplied regex recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPattern {
    /// Recognizer name reported in diagnostics.
    pub name: String,

    /// Entity kind emitted for matches.
    pub kind: EntityKind,

    /// Regex pattern.
    pub pattern: String,

    /// Score for matches.
    #[serde(default = "default_custom_score")]
    pub score: f64,
}

fn default_custom_score() -> f64 {
    1.0
}

impl CustomPattern {
    pub fn new(
        name: impl Into<String>,
        kind: EntityKind,
        pattern: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            pattern: pattern.into(),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.entity_kinds.len(), 4);
        assert_eq!(config.locale, Locale::EnUs);
        assert_eq!(config.min_score, DEFAULT_MIN_SCORE);
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_empty_json_gets_defaults() {
        let config: RegistryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn test_parse_presidio_style_kinds() {
        let config: RegistryConfig = serde_json::from_str(
            r#"{"entity_kinds": ["EMAIL_ADDRESS", "PHONE_NUMBER"], "locale": "en"}"#,
        )
        .unwrap();
        assert!(config.is_enabled(EntityKind::Email));
        assert!(config.is_enabled(EntityKind::Phone));
        assert!(!config.is_enabled(EntityKind::Person));
    }

    #[test]
    fn test_custom_pattern_default_score() {
        let config: RegistryConfig = serde_json::from_str(
            r#"{"custom_patterns": [{"name": "emp", "kind": "national_id", "pattern": "EMP-\\d{6}"}]}"#,
        )
        .unwrap();
        assert_eq!(config.custom_patterns[0].score, 1.0);
    }

    #[test]
    fn test_check_rejects_bad_scores() {
        assert!(RegistryConfig::default().min_score(1.5).check().is_err());
        assert!(RegistryConfig::default().min_score(f64::NAN).check().is_err());
        let config = RegistryConfig::default().custom_pattern(CustomPattern::new(
            "bad",
            EntityKind::Email,
            "x",
            -0.5,
        ));
        assert!(config.check().is_err());
    }

    #[test]
    fn test_check_rejects_unnamed_pattern() {
        let config = RegistryConfig::default().custom_pattern(CustomPattern::new(
            " ",
            EntityKind::Email,
            "x",
            1.0,
        ));
        assert!(matches!(config.check(), Err(RedactionError::Config(_))));
    }
}
