//! Loading a configuration and turning it into a ready filter.

use std::path::Path;
use std::sync::Arc;

use lr_redact::{Anonymizer, DiagnosticSink, RecognizerRegistry, RedactionFilter};

use crate::config::LogRedactConfig;
use crate::event_names;
use crate::resolve::{resolve_config, ConfigPaths};
use crate::snapshot::ConfigSnapshot;
use crate::validate::{validate_config, ValidationError, ValidationResult};

/// A validated configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: LogRedactConfig,
    pub paths: ConfigPaths,
    pub snapshot: ConfigSnapshot,
}

/// Resolve, read, parse and validate the configuration, then log its
/// snapshot.
///
/// Falls back to built-in defaults when no file is found.
pub fn load_config(explicit: Option<&Path>) -> ValidationResult<LoadedConfig> {
    let paths = resolve_config(explicit);

    let (config, content) = match &paths.config {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
            })?;
            (LogRedactConfig::parse(&content, path)?, Some(content))
        }
        None => {
            tracing::info!(
                event = event_names::CONFIG_DEFAULT_USED,
                "no configuration file found, using built-in defaults"
            );
            (LogRedactConfig::default(), None)
        }
    };

    validate_config(&config)?;

    let snapshot = ConfigSnapshot::new(&config, &paths, content.as_deref());
    snapshot.log();
    Ok(LoadedConfig {
        config,
        paths,
        snapshot,
    })
}

/// Build the anonymizer described by `config`.
pub fn build_anonymizer(config: &LogRedactConfig) -> Anonymizer {
    config.placeholders.iter().fold(
        Anonymizer::new().with_fallback_placeholder(config.fallback_placeholder.clone()),
        |anonymizer, (kind, placeholder)| anonymizer.with_placeholder(*kind, placeholder.clone()),
    )
}

/// Build a ready redaction filter from a configuration.
pub fn build_filter(
    config: &LogRedactConfig,
    sink: Arc<dyn DiagnosticSink>,
) -> ValidationResult<RedactionFilter> {
    validate_config(config)?;
    let registry = RecognizerRegistry::from_config(&config.redaction)?;
    let filter = RedactionFilter::new(Arc::new(registry), build_anonymizer(config), sink)?;
    tracing::debug!(
        event = event_names::FILTER_BUILT,
        recognizers = filter.registry().len(),
        locale = %config.redaction.locale,
        "redaction filter built"
    );
    Ok(filter)
}
