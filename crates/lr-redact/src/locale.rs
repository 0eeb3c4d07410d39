//! Locales with a dedicated recognizer set.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Regional grammar set for phone numbers, national IDs and name dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// United States English (default, also `en`).
    #[default]
    EnUs,
    /// United Kingdom English.
    EnGb,
    /// Germany.
    DeDe,
    /// Israel.
    HeIl,
}

impl Locale {
    /// All supported locales.
    pub const ALL: &'static [Locale] = &[Locale::EnUs, Locale::EnGb, Locale::DeDe, Locale::HeIl];

    /// Canonical `ll_CC` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::EnUs => "en_US",
            Locale::EnGb => "en_GB",
            Locale::DeDe => "de_DE",
            Locale::HeIl => "he_IL",
        }
    }

    /// Short lowercase suffix used in recognizer names.
    pub fn short(&self) -> &'static str {
        match self {
            Locale::EnUs => "us",
            Locale::EnGb => "uk",
            Locale::DeDe => "de",
            Locale::HeIl => "il",
        }
    }

    /// Parse a locale tag. Accepts `-` or `_`, any case, and bare language
    /// codes.
    pub fn parse_str(s: &str) -> Option<Self> {
        let normalized = s.trim().replace('-', "_").to_lowercase();
        match normalized.as_str() {
            "en" | "en_us" | "us" => Some(Locale::EnUs),
            "en_gb" | "en_uk" | "gb" | "uk" => Some(Locale::EnGb),
            "de" | "de_de" => Some(Locale::DeDe),
            "he" | "iw" | "he_il" | "iw_il" | "en_il" | "il" => Some(Locale::HeIl),
            _ => None,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Locale {
    type Err = crate::RedactionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Locale::parse_str(s).ok_or_else(|| crate::RedactionError::UnsupportedLocale(s.to_string()))
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Locale::parse_str(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unsupported locale: {}", s)))
    }
}
