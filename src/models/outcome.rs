use serde::{Deserialize, Serialize};

use super::{Classification, ConfidenceLevel};

/// Label reported when the gate short-circuits the pipeline
pub const INSUFFICIENT_DATA_LABEL: &str = "Insufficient Data";

/// Advisory returned with the insufficient-data outcome
pub const INSUFFICIENT_DATA_REPLY: &str =
    "Add more conversation to start scam detection. At least 2 Caller-Receiver cycles are needed.";

pub const NO_REPLY_NEEDED: &str = "No reply needed.";
pub const NO_SUMMARY_AVAILABLE: &str = "No summary available.";

/// Terminal outcome when the gate finds too few exchange cycles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsufficientData {
    pub confidence_level: String,
    pub suggested_reply: String,
}

impl Default for InsufficientData {
    fn default() -> Self {
        Self {
            confidence_level: INSUFFICIENT_DATA_LABEL.to_string(),
            suggested_reply: INSUFFICIENT_DATA_REPLY.to_string(),
        }
    }
}

/// Terminal outcome of a fully classified conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScamReport {
    pub confidence_level: ConfidenceLevel,
    pub suggested_reply: String,
    pub summary: String,
}

impl ScamReport {
    /// Assemble the report, substituting placeholders for absent text
    pub fn new(classification: Classification, summary: &str) -> Self {
        let suggested_reply = classification
            .reply()
            .unwrap_or(NO_REPLY_NEEDED)
            .to_string();
        let summary = match summary.trim() {
            "" => NO_SUMMARY_AVAILABLE.to_string(),
            _ => summary.to_string(),
        };

        Self {
            confidence_level: classification.confidence_level,
            suggested_reply,
            summary,
        }
    }
}

/// Terminal outcome of a rejected input or a failed stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub error: String,
}

/// The single externally visible result of one pipeline invocation
///
/// Serializes to exactly one of the three response shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Classified(ScamReport),
    Insufficient(InsufficientData),
    Failed(FailureReport),
}

impl Outcome {
    pub fn insufficient() -> Self {
        Outcome::Insufficient(InsufficientData::default())
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Outcome::Failed(FailureReport {
            error: error.into(),
        })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Classified(_) => "classified",
            Outcome::Insufficient(_) => "insufficient_data",
            Outcome::Failed(_) => "failed",
        }
    }
}
