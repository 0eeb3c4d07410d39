//! The logredact configuration file.
//!
//! TOML (`.toml`) or JSON (`.json`); every field has a default, so an empty
//! file is a valid configuration.

use std::collections::BTreeMap;
use std::path::Path;

use lr_redact::{EntityKind, RegistryConfig, FALLBACK_PLACEHOLDER};
use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRedactConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Recognizer selection and thresholds.
    #[serde(default)]
    pub redaction: RegistryConfig,

    /// Placeholder overrides per entity kind.
    #[serde(default)]
    pub placeholders: BTreeMap<EntityKind, String>,

    /// Whole-message fallback marker.
    #[serde(default = "default_fallback_placeholder")]
    pub fallback_placeholder: String,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingSection,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

fn default_fallback_placeholder() -> String {
    FALLBACK_PLACEHOLDER.to_string()
}

impl Default for LogRedactConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            redaction: RegistryConfig::default(),
            placeholders: BTreeMap::new(),
            fallback_placeholder: default_fallback_placeholder(),
            logging: LoggingSection::default(),
        }
    }
}

/// `[logging]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Level filter (`trace`, `debug`, `info`, `warn`, `error`).
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (`human` or `jsonl`).
    #[serde(default = "default_format")]
    pub format: String,

    /// Whether human-format lines carry a timestamp.
    #[serde(default = "default_true")]
    pub timestamps: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "human".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            timestamps: true,
        }
    }
}

/// File format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Format for `path`, or `None` for an unknown extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

impl LogRedactConfig {
    /// Load from a `.toml` or `.json` file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content, path)
    }

    /// Parse `content` in the format implied by `path`.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ValidationError> {
        match ConfigFormat::from_path(path) {
            Some(ConfigFormat::Toml) => Self::parse_toml(content),
            Some(ConfigFormat::Json) => Self::parse_json(content),
            None => Err(ValidationError::ParseError(format!(
                "Unsupported config extension: {}",
                path.display()
            ))),
        }
    }

    /// Parse from a TOML string.
    pub fn parse_toml(toml_str: &str) -> Result<Self, ValidationError> {
        toml::from_str(toml_str)
            .map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    /// Parse from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Serialize as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ValidationError> {
        toml::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("TOML encode failed: {}", e)))
    }

    /// Effective placeholder for `kind`.
    pub fn placeholder_for(&self, kind: EntityKind) -> &str {
        self.placeholders
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.placeholder())
    }
}
