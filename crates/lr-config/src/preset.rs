//! Configuration presets for common deployment scenarios.
//!
//! - Default: every entity kind at the standard confidence threshold
//! - Strict: every entity kind, every candidate kept regardless of score
//! - Contact: email addresses and phone numbers only

use std::collections::BTreeSet;
use std::fmt;

use lr_redact::{EntityKind, RegistryConfig};
use serde::{Deserialize, Serialize};

use crate::config::LogRedactConfig;

/// Available configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    /// All entity kinds, default threshold
    Default,
    /// All entity kinds, no threshold
    Strict,
    /// Email and phone only
    Contact,
}

impl PresetName {
    /// All available preset names.
    pub const ALL: &'static [PresetName] =
        &[PresetName::Default, PresetName::Strict, PresetName::Contact];

    /// Get preset name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::Default => "default",
            PresetName::Strict => "strict",
            PresetName::Contact => "contact",
        }
    }

    /// Parse preset name from string.
    pub fn parse(s: &str) -> Option<PresetName> {
        match s.to_lowercase().as_str() {
            "default" | "standard" => Some(PresetName::Default),
            "strict" | "paranoid" => Some(PresetName::Strict),
            "contact" | "contacts" => Some(PresetName::Contact),
            _ => None,
        }
    }

    /// Get a description of the preset.
    pub fn description(&self) -> &'static str {
        match self {
            PresetName::Default => "All entity kinds at the standard confidence threshold",
            PresetName::Strict => {
                "All entity kinds, low-confidence name matches included"
            }
            PresetName::Contact => "Email addresses and phone numbers only",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::parse(s).ok_or_else(|| PresetError::UnknownPreset(s.to_string()))
    }
}

/// Errors related to preset operations.
#[derive(Debug, Clone)]
pub enum PresetError {
    /// Unknown preset name.
    UnknownPreset(String),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::UnknownPreset(name) => {
                write!(
                    f,
                    "Unknown preset '{}'. Available: {}",
                    name,
                    PresetName::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
        }
    }
}

impl std::error::Error for PresetError {}

/// Get the configuration for a preset.
pub fn get_preset(name: PresetName) -> LogRedactConfig {
    let redaction = match name {
        PresetName::Default => RegistryConfig::default(),
        PresetName::Strict => RegistryConfig::default().min_score(0.0),
        PresetName::Contact => RegistryConfig::with_kinds([EntityKind::Email, EntityKind::Phone]),
    };
    LogRedactConfig {
        redaction,
        ..LogRedactConfig::default()
    }
}

/// Preset summary for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: String,
    pub description: String,
    pub entity_kinds: Vec<String>,
    pub min_score: f64,
}

impl PresetInfo {
    /// Create info from a preset.
    pub fn from_preset(name: PresetName) -> Self {
        let config = get_preset(name);
        Self {
            name: name.as_str().to_string(),
            description: name.description().to_string(),
            entity_kinds: kind_names(&config.redaction.entity_kinds),
            min_score: config.redaction.min_score,
        }
    }
}

fn kind_names(kinds: &BTreeSet<EntityKind>) -> Vec<String> {
    kinds.iter().map(|k| k.as_str().to_string()).collect()
}

/// List all available presets with summary information.
pub fn list_presets() -> Vec<PresetInfo> {
    PresetName::ALL
        .iter()
        .map(|&name| PresetInfo::from_preset(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_config;

    #[test]
    fn test_preset_name_parsing() {
        assert_eq!(PresetName::parse("default"), Some(PresetName::Default));
        assert_eq!(PresetName::parse("STRICT"), Some(PresetName::Strict));
        assert_eq!(PresetName::parse("contacts"), Some(PresetName::Contact));
        assert_eq!(PresetName::parse("unknown"), None);
    }

    #[test]
    fn test_from_str_error_lists_presets() {
        let err = "loose".parse::<PresetName>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown preset 'loose'. Available: default, strict, contact"
        );
    }

    #[test]
    fn preset_name_serde_lowercase() {
        let json = serde_json::to_string(&PresetName::Contact).unwrap();
        assert_eq!(json, "\"contact\"");
    }

    #[test]
    fn all_presets_validate() {
        for &p in PresetName::ALL {
            assert!(validate_config(&get_preset(p)).is_ok(), "preset {}", p);
        }
    }

    #[test]
    fn strict_keeps_every_score() {
        let config = get_preset(PresetName::Strict);
        assert_eq!(config.redaction.min_score, 0.0);
        assert_eq!(config.redaction.entity_kinds.len(), EntityKind::ALL.len());
    }

    #[test]
    fn contact_is_email_and_phone() {
        let config = get_preset(PresetName::Contact);
        assert!(config.redaction.is_enabled(EntityKind::Email));
        assert!(config.redaction.is_enabled(EntityKind::Phone));
        assert!(!config.redaction.is_enabled(EntityKind::Person));
        assert!(!config.redaction.is_enabled(EntityKind::NationalId));
    }

    #[test]
    fn list_presets_covers_all_names() {
        let infos = list_presets();
        let names: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["default", "strict", "contact"]);
        assert_eq!(infos[2].entity_kinds, vec!["email", "phone"]);
    }
}
