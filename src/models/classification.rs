use serde::{Deserialize, Serialize};

/// Scam likelihood labels, most to least likely
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    /// Clear scam indicators (urgency, suspicious requests, impersonation)
    #[serde(rename = "Very High")]
    VeryHigh,
    /// Strong scam indicators but some uncertainty
    #[serde(rename = "High")]
    High,
    /// Not enough information for a confident assessment
    #[serde(rename = "Not Clear")]
    NotClear,
    /// Unlikely to be a scam but with minor concerning elements
    #[serde(rename = "Low")]
    Low,
    /// Clearly legitimate conversation
    #[serde(rename = "Very Low")]
    VeryLow,
}

impl ConfidenceLevel {
    pub const ALL: [ConfidenceLevel; 5] = [
        ConfidenceLevel::VeryHigh,
        ConfidenceLevel::High,
        ConfidenceLevel::NotClear,
        ConfidenceLevel::Low,
        ConfidenceLevel::VeryLow,
    ];

    /// Wire label, as produced by the backend and returned to clients
    pub fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::VeryHigh => "Very High",
            ConfidenceLevel::High => "High",
            ConfidenceLevel::NotClear => "Not Clear",
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::VeryLow => "Very Low",
        }
    }

    /// Levels at which the receiver should be given a probing reply
    pub fn requires_reply(self) -> bool {
        matches!(self, ConfidenceLevel::High | ConfidenceLevel::NotClear)
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured classifier output
///
/// Unknown fields are rejected so that a backend drifting from the schema
/// fails loudly instead of being half-parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Classification {
    /// Scam likelihood
    pub confidence_level: ConfidenceLevel,
    /// Reply the receiver could use to probe the caller
    #[serde(default)]
    pub suggested_reply: Option<String>,
}

impl Classification {
    pub fn new(confidence_level: ConfidenceLevel, suggested_reply: Option<String>) -> Self {
        Self {
            confidence_level,
            suggested_reply,
        }
    }

    /// Suggested reply as given, or `None` when it is whitespace-only
    pub fn reply(&self) -> Option<&str> {
        self.suggested_reply
            .as_deref()
            .filter(|r| !r.trim().is_empty())
    }

    /// True when the level calls for a reply but none was given
    pub fn is_missing_reply(&self) -> bool {
        self.confidence_level.requires_reply() && self.reply().is_none()
    }
}
