use thiserror::Error;

use crate::models::ConfidenceLevel;

/// Stage of the pipeline that performs a backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Summarizer,
    Classifier,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageKind::Summarizer => write!(f, "summarizer"),
            StageKind::Classifier => write!(f, "classifier"),
        }
    }
}

/// Errors that end a pipeline invocation without a classification
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Transcript missing or blank; the pipeline never starts
    #[error("Empty conversation")]
    EmptyConversation,

    /// Backend call failed or returned unusable output
    #[error("{stage} stage failed: {source:#}")]
    Stage {
        stage: StageKind,
        #[source]
        source: anyhow::Error,
    },

    /// Classifier output did not match the classification schema
    #[error("classifier output does not match schema: {0}")]
    SchemaViolation(String),

    /// Classifier omitted the reply its confidence level requires
    #[error("classifier returned \"{0}\" without a suggested reply")]
    MissingReply(ConfidenceLevel),
}

impl PipelineError {
    pub fn stage(stage: StageKind, source: anyhow::Error) -> Self {
        PipelineError::Stage { stage, source }
    }

    /// True for every failure raised after the pipeline started
    pub fn is_stage_failure(&self) -> bool {
        !matches!(self, PipelineError::EmptyConversation)
    }

    /// Message reported in the failure outcome
    pub fn report_message(&self) -> String {
        match self {
            PipelineError::EmptyConversation => self.to_string(),
            _ => format!("Error during scam detection workflow: {}", self),
        }
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
