//! Configuration snapshots.
//!
//! A snapshot records which configuration a process started with, so that
//! redacted logs from different hosts can be traced back to the settings
//! that produced them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::LogRedactConfig;
use crate::resolve::{ConfigPaths, ConfigSource};

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Hostname where snapshot was taken.
    #[serde(default)]
    pub hostname: Option<String>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Where the configuration came from.
    pub source: String,

    /// Path the configuration was loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// SHA-256 of the file content, `None` for built-in defaults.
    #[serde(default)]
    pub content_hash: Option<String>,

    /// SHA-256 of the effective configuration (for quick comparison).
    pub config_hash: String,

    /// Key configuration values for quick reference.
    pub summary: ConfigSummary,
}

/// Summary of key configuration values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub locale: String,
    pub entity_kinds: Vec<String>,
    pub min_score: f64,
    pub custom_pattern_count: usize,
    pub extra_name_count: usize,
    pub placeholder_override_count: usize,
}

impl ConfigSummary {
    fn from_config(config: &LogRedactConfig) -> Self {
        ConfigSummary {
            locale: config.redaction.locale.to_string(),
            entity_kinds: config
                .redaction
                .entity_kinds
                .iter()
                .map(|k| k.as_str().to_string())
                .collect(),
            min_score: config.redaction.min_score,
            custom_pattern_count: config.redaction.custom_patterns.len(),
            extra_name_count: config.redaction.extra_names.len(),
            placeholder_override_count: config.placeholders.len(),
        }
    }
}

impl ConfigSnapshot {
    /// Create a new snapshot from a loaded configuration.
    ///
    /// `content` is the raw file text, when a file was read.
    pub fn new(config: &LogRedactConfig, paths: &ConfigPaths, content: Option<&str>) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            hostname: current_hostname(),
            schema_version: config.schema_version.clone(),
            source: paths.source.to_string(),
            path: paths.config.as_ref().map(|p| p.display().to_string()),
            content_hash: content.map(hash_content),
            config_hash: config_hash(config),
            summary: ConfigSummary::from_config(config),
        }
    }

    /// Create a snapshot with only defaults (no config file loaded).
    pub fn defaults_only() -> Self {
        Self::new(
            &LogRedactConfig::default(),
            &ConfigPaths {
                config: None,
                source: ConfigSource::BuiltinDefault,
            },
            None,
        )
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot matches another (same effective config).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.config_hash == other.config_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.config_hash[..12.min(self.config_hash.len())]
    }

    /// Emit the snapshot as a single `config.loaded` event.
    pub fn log(&self) {
        tracing::info!(
            event = crate::event_names::CONFIG_LOADED,
            source = %self.source,
            path = self.path.as_deref().unwrap_or("-"),
            content_hash = self.content_hash.as_deref().unwrap_or("-"),
            config_id = self.short_id(),
            locale = %self.summary.locale,
            min_score = self.summary.min_score,
            custom_patterns = self.summary.custom_pattern_count,
            "configuration loaded"
        );
    }
}

fn current_hostname() -> Option<String> {
    hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().to_string())
}

/// Hash of the canonical JSON encoding of `config`.
fn config_hash(config: &LogRedactConfig) -> String {
    match serde_json::to_string(config) {
        Ok(json) => hash_content(&json),
        Err(_) => hash_content("unencodable"),
    }
}

/// Hash content with SHA-256 and return hex string.
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
