//! Defects reported by a solution verifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Defect type used for the conservative fallback when a collaborator fails.
pub const SYSTEM_ERROR_DEFECT: &str = "system_error";

/// Severity of a single defect.
///
/// Deserialization is lenient: any unrecognised severity string resolves to
/// [`Severity::Medium`] so that a verifier emitting a novel label can never
/// crash the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Every severity, ordered from least to most severe.
    pub const ALL: [Severity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// The key used for this severity in the weight table.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Strict parse; `None` for anything that is not a known severity name.
    pub fn parse_strict(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn is_critical(self) -> bool {
        matches!(self, Self::Critical)
    }
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        Self::parse_strict(&value).unwrap_or(Self::Medium)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured record of a flaw detected in a candidate solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defect {
    /// Defect category (e.g. `"time_conflict"`).
    #[serde(rename = "type")]
    pub defect_type: String,

    pub severity: Severity,

    #[serde(default)]
    pub description: String,
}

impl Defect {
    pub fn new(
        defect_type: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            defect_type: defect_type.into(),
            severity,
            description: description.into(),
        }
    }

    /// The critical `system_error` defect recorded when a collaborator fails.
    pub fn system_error(description: impl Into<String>) -> Self {
        Self::new(SYSTEM_ERROR_DEFECT, Severity::Critical, description)
    }

    pub fn is_critical(&self) -> bool {
        self.severity.is_critical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_severity_defaults_to_medium() {
        let defect: Defect =
            serde_json::from_str(r#"{"type": "x", "severity": "catastrophic"}"#).unwrap();
        assert_eq!(defect.severity, Severity::Medium);
        assert!(defect.description.is_empty());
    }

    #[test]
    fn test_severity_round_trips_lowercase() {
        let json = serde_json::to_string(&Defect::system_error("boom")).unwrap();
        assert!(json.contains(r#""type":"system_error""#));
        assert!(json.contains(r#""severity":"critical""#));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_parse_strict_is_case_insensitive() {
        assert_eq!(Severity::parse_strict("CRITICAL"), Some(Severity::Critical));
        assert_eq!(Severity::parse_strict("severe"), None);
    }
}
