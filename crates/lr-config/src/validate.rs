//! Configuration validation errors and semantic validation.

use std::collections::BTreeMap;

use lr_redact::{EntityKind, PatternRecognizer, RedactionError};
use thiserror::Error;

use crate::config::LogRedactConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    #[error("Pipeline construction failed: {0}")]
    BuildError(String),
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
            ValidationError::BuildError(_) => 67,
        }
    }
}

impl From<std::io::Error> for ValidationError {
    fn from(err: std::io::Error) -> Self {
        ValidationError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::ParseError(format!("Invalid JSON: {}", err))
    }
}

impl From<toml::de::Error> for ValidationError {
    fn from(err: toml::de::Error) -> Self {
        ValidationError::ParseError(format!("Invalid TOML: {}", err))
    }
}

impl From<RedactionError> for ValidationError {
    fn from(err: RedactionError) -> Self {
        ValidationError::BuildError(err.to_string())
    }
}

/// Accepted `logging.level` values.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Accepted `logging.format` values.
pub const LOG_FORMATS: &[&str] = &["human", "jsonl", "json"];

/// Validate a loaded configuration semantically.
pub fn validate_config(config: &LogRedactConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    let redaction = &config.redaction;
    if redaction.entity_kinds.is_empty() {
        return Err(ValidationError::SemanticError(
            "redaction.entity_kinds must name at least one kind".to_string(),
        ));
    }

    if !redaction.min_score.is_finite() || !(0.0..=1.0).contains(&redaction.min_score) {
        return Err(ValidationError::InvalidValue {
            field: "redaction.min_score".to_string(),
            message: format!("Must be in [0, 1], got {}", redaction.min_score),
        });
    }

    for (i, pattern) in redaction.custom_patterns.iter().enumerate() {
        let field = format!("redaction.custom_patterns[{}]", i);
        if pattern.name.trim().is_empty() {
            return Err(ValidationError::MissingField(format!("{}.name", field)));
        }
        if !pattern.score.is_finite() || !(0.0..=1.0).contains(&pattern.score) {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.score", field),
                message: format!("Must be in [0, 1], got {}", pattern.score),
            });
        }
        PatternRecognizer::new(pattern.name.as_str(), pattern.kind)
            .with_pattern(&pattern.pattern, pattern.score)
            .map_err(|e| ValidationError::InvalidValue {
                field: format!("{}.pattern", field),
                message: e.to_string(),
            })?;
    }

    for (i, name) in redaction.extra_names.iter().enumerate() {
        if name.trim().is_empty() || !name.trim().chars().all(char::is_alphabetic) {
            return Err(ValidationError::InvalidValue {
                field: format!("redaction.extra_names[{}]", i),
                message: format!("'{}' is not a single alphabetic name", name),
            });
        }
    }

    validate_placeholders(config)?;
    validate_logging(config)?;

    Ok(())
}

/// Placeholders must be non-empty and pairwise distinct.
fn validate_placeholders(config: &LogRedactConfig) -> ValidationResult<()> {
    for (kind, placeholder) in &config.placeholders {
        if placeholder.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("placeholders.{}", kind.as_str()),
                message: "Must not be empty".to_string(),
            });
        }
    }
    if config.fallback_placeholder.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "fallback_placeholder".to_string(),
            message: "Must not be empty".to_string(),
        });
    }

    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    let effective = EntityKind::ALL
        .iter()
        .map(|kind| (kind.as_str(), config.placeholder_for(*kind)))
        .chain(std::iter::once((
            "fallback",
            config.fallback_placeholder.as_str(),
        )));
    for (owner, placeholder) in effective {
        if let Some(previous) = seen.insert(placeholder, owner) {
            return Err(ValidationError::SemanticError(format!(
                "placeholder '{}' is shared by {} and {}",
                placeholder, previous, owner
            )));
        }
    }

    Ok(())
}

fn validate_logging(config: &LogRedactConfig) -> ValidationResult<()> {
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ValidationError::InvalidValue {
            field: "logging.level".to_string(),
            message: format!("Expected one of {:?}, got '{}'", LOG_LEVELS, config.logging.level),
        });
    }
    let format = config.logging.format.to_ascii_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        return Err(ValidationError::InvalidValue {
            field: "logging.format".to_string(),
            message: format!(
                "Expected one of {:?}, got '{}'",
                LOG_FORMATS, config.logging.format
            ),
        });
    }
    Ok(())
}
