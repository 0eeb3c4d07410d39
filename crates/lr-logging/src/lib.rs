//! Redacting log output for logredact.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for daemon/agent workflows
//!
//! Both modes run every message and text field through a shared
//! [`RedactionFilter`] before writing.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use lr_logging::{init_logging, LogConfig};
//! use lr_redact::{RedactionFilter, RegistryConfig};
//!
//! let filter = Arc::new(RedactionFilter::from_config(&RegistryConfig::default()).unwrap());
//! init_logging(&LogConfig::from_env(None, None), filter).unwrap();
//!
//! tracing::info!(user = "jane@example.org", "password reset requested");
//! // stderr: ... INFO my_app: password reset requested user="<EMAIL_ADDRESS>"
//! ```
//!
//! stdout is left alone; all log output goes to stderr.

pub mod config;
pub mod events;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, Level, LogEvent};
pub use layer::RedactingLayer;

use std::sync::Arc;

use lr_config::{build_filter, LogRedactConfig, ValidationError};
use lr_redact::{RedactionFilter, TracingSink};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Errors from logging setup.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    #[error("failed to install subscriber: {0}")]
    AlreadyInitialized(String),

    /// The configuration could not be turned into a filter.
    #[error(transparent)]
    Config(#[from] ValidationError),
}

/// Install the redacting subscriber as the global default.
///
/// Level filtering honours `RUST_LOG` directives unless `LOGREDACT_LOG` is
/// set, in which case `config.level` applies to every target.
pub fn init_logging(config: &LogConfig, filter: Arc<RedactionFilter>) -> Result<(), LoggingError> {
    let layer = RedactingLayer::stderr(filter, config.format).with_timestamps(config.timestamps);

    tracing_subscriber::registry()
        .with(build_env_filter(config))
        .with(layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(
        event = event_names::LOGGING_INITIALIZED,
        format = %config.format,
        level = %config.level,
        "logging initialized"
    );
    Ok(())
}

/// Build the filter described by a loaded configuration file and install
/// logging with its `[logging]` settings. Returns the shared filter.
pub fn init_from_config(config: &LogRedactConfig) -> Result<Arc<RedactionFilter>, LoggingError> {
    let filter = Arc::new(build_filter(config, Arc::new(TracingSink))?);
    let log_config = LogConfig::from_section(&config.logging, None, None);
    init_logging(&log_config, Arc::clone(&filter))?;
    Ok(filter)
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    if std::env::var_os(config::ENV_LOG_LEVEL).is_none() {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    EnvFilter::default().add_directive(LevelFilter::from(config.level).into())
}
