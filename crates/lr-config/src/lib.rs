//! logredact configuration loading and validation.
//!
//! This crate provides:
//! - The `logredact.toml` / `logredact.json` file model
//! - Config resolution (explicit path → env → XDG → /etc → defaults)
//! - Semantic validation with stable error codes
//! - Presets and config snapshots
//! - Construction of a ready [`lr_redact::RedactionFilter`]

pub mod config;
pub mod load;
pub mod preset;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use config::{ConfigFormat, LogRedactConfig, LoggingSection};
pub use load::{build_anonymizer, build_filter, load_config, LoadedConfig};
pub use preset::{get_preset, list_presets, PresetError, PresetInfo, PresetName};
pub use resolve::{resolve_config, ConfigPaths, ConfigSource};
pub use snapshot::{ConfigSnapshot, ConfigSummary};
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Names carried in the `event` field of this crate's log records.
pub mod event_names {
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const FILTER_BUILT: &str = "filter.built";
}

/// Alias used by callers that treat every config failure alike.
pub type ConfigError = ValidationError;

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
