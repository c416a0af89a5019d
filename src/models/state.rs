use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Classification;

/// Node of the pipeline control graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStep {
    /// Transcript accepted, gate not yet evaluated
    Start,
    /// Summary produced
    Summarized,
    /// Classification produced
    Classified,
    /// Too few exchange cycles to classify
    Insufficient,
    /// A stage failed
    Failed,
    /// Result assembled
    Done,
}

impl PipelineStep {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PipelineStep::Insufficient | PipelineStep::Failed | PipelineStep::Done
        )
    }
}

/// Per-invocation record threaded through the pipeline stages
///
/// One state is created for every call to the pipeline and dropped once the
/// outcome has been assembled; nothing in it is shared between invocations.
#[derive(Debug, Clone)]
pub struct PipelineState<'a> {
    /// Correlates log lines of one invocation
    pub invocation_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Raw transcript as received
    pub conversation: &'a str,
    /// Complete caller/receiver cycles in the transcript
    pub cycles_count: usize,
    /// Summarizer output, empty until the summarizer has run
    pub summary: String,
    /// Classifier output, absent until the classifier has run
    pub classification: Option<Classification>,
    /// Steps entered so far, in order
    pub trail: Vec<PipelineStep>,
}

impl<'a> PipelineState<'a> {
    pub fn new(conversation: &'a str, cycles_count: usize) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            started_at: Utc::now(),
            conversation,
            cycles_count,
            summary: String::new(),
            classification: None,
            trail: vec![PipelineStep::Start],
        }
    }

    /// The step the invocation is currently at
    pub fn step(&self) -> PipelineStep {
        self.trail.last().copied().unwrap_or(PipelineStep::Start)
    }

    pub fn enter(&mut self, step: PipelineStep) {
        self.trail.push(step);
    }

    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}
