//! Entity kinds detected by the pipeline.

use serde::{Deserialize, Serialize};

/// Kind of PII entity.
///
/// Declaration order is the discriminant order used to break resolver ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Email address.
    #[serde(alias = "EMAIL_ADDRESS", alias = "email_address")]
    Email,
    /// Telephone number.
    #[serde(alias = "PHONE_NUMBER", alias = "phone_number")]
    Phone,
    /// Person name.
    #[serde(alias = "PERSON")]
    Person,
    /// Government-issued identifier (SSN, NINO, Steuer-ID, Teudat Zehut).
    #[serde(alias = "NATIONAL_ID", alias = "US_SSN", alias = "ssn")]
    NationalId,
}

impl EntityKind {
    /// All kinds in discriminant order.
    pub const ALL: &'static [EntityKind] = &[
        EntityKind::Email,
        EntityKind::Phone,
        EntityKind::Person,
        EntityKind::NationalId,
    ];

    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Email => "email",
            EntityKind::Phone => "phone",
            EntityKind::Person => "person",
            EntityKind::NationalId => "national_id",
        }
    }

    /// Default replacement token.
    pub fn placeholder(&self) -> &'static str {
        match self {
            EntityKind::Email => "<EMAIL_ADDRESS>",
            EntityKind::Phone => "<PHONE_NUMBER>",
            EntityKind::Person => "<PERSON>",
            EntityKind::NationalId => "<NATIONAL_ID>",
        }
    }

    /// Parse from a snake_case or upper-case entity name.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "email" | "email_address" => Some(EntityKind::Email),
            "phone" | "phone_number" => Some(EntityKind::Phone),
            "person" | "name" => Some(EntityKind::Person),
            "national_id" | "us_ssn" | "ssn" => Some(EntityKind::NationalId),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        EntityKind::parse_str(s).ok_or_else(|| format!("unknown entity kind: {}", s))
    }
}
