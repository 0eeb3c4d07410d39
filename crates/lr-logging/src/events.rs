//! Structured event definitions for logging.
//!
//! Every line the redacting layer writes is a [`LogEvent`], rendered either
//! as one JSON object or as a human-readable line.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Log levels for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Upper-case label used in human output.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Config/init events
    pub use lr_config::event_names::{CONFIG_DEFAULT_USED, CONFIG_LOADED};
    pub const LOGGING_INITIALIZED: &str = "logging.initialized";

    // Pipeline events
    pub use lr_config::event_names::FILTER_BUILT;
    pub const REDACTION_FALLBACK: &str = lr_redact::diagnostics::FALLBACK_EVENT;
}

/// A structured log event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// Log level.
    pub level: Level,

    /// Event name, the `tracing` target for captured events.
    pub event: String,

    /// Human-readable message.
    #[serde(default)]
    pub message: String,

    /// Additional structured fields (stable keys).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl LogEvent {
    /// Create a new log event.
    pub fn new(level: Level, event: impl Into<String>, message: impl Into<String>) -> Self {
        LogEvent {
            ts: Utc::now(),
            level,
            event: event.into(),
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field to the event.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.fields.insert(key.into(), v);
        }
        self
    }

    /// Serialize to a single JSON line.
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"error":"serialization_failed","event":"{}"}}"#,
                self.event
            )
        })
    }

    /// Render as a human-readable line.
    pub fn to_human(&self, timestamps: bool) -> String {
        let mut line = String::new();
        if timestamps {
            line.push_str(&self.ts.to_rfc3339_opts(SecondsFormat::Millis, true));
            line.push(' ');
        }
        line.push_str(&format!("{:>5} {}: {}", self.level.label(), self.event, self.message));
        for (key, value) in &self.fields {
            match value {
                serde_json::Value::String(s) => line.push_str(&format!(" {}={:?}", key, s)),
                other => line.push_str(&format!(" {}={}", key, other)),
            }
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_serialization() {
        let event = LogEvent::new(Level::Info, event_names::CONFIG_LOADED, "configuration loaded")
            .with_field("source", "XDG config")
            .with_field("custom_patterns", 2);

        let json = event.to_jsonl();
        assert!(json.contains(r#""event":"config.loaded""#));
        assert!(json.contains(r#""level":"info""#));
        assert!(json.contains(r#""message":"configuration loaded""#));
        assert!(json.contains(r#""custom_patterns":2"#));

        let parsed: LogEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_empty_fields_omitted() {
        let json = LogEvent::new(Level::Warn, "x", "y").to_jsonl();
        assert!(!json.contains("fields"));
    }

    #[test]
    fn test_human_line() {
        let event = LogEvent::new(Level::Warn, "app::db", "slow query")
            .with_field("ms", 1500)
            .with_field("table", "orders");
        assert_eq!(
            event.to_human(false),
            r#" WARN app::db: slow query ms=1500 table="orders""#
        );
        assert!(event.to_human(true).ends_with("slow query ms=1500 table=\"orders\""));
    }

    #[test]
    fn test_level_from_tracing() {
        assert_eq!(Level::from(tracing::Level::INFO), Level::Info);
        assert_eq!(Level::from(tracing::Level::DEBUG), Level::Debug);
        assert_eq!(Level::from(tracing::Level::WARN), Level::Warn);
        assert_eq!(Level::from(tracing::Level::ERROR), Level::Error);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(event_names::CONFIG_LOADED, "config.loaded");
        assert_eq!(event_names::CONFIG_DEFAULT_USED, "config.default_used");
        assert_eq!(event_names::FILTER_BUILT, "filter.built");
        assert_eq!(event_names::REDACTION_FALLBACK, "redaction.fallback");
    }
}
