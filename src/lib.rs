pub mod error;
pub mod heuristics;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod stages;
#[cfg(test)]
mod testing;

pub use error::{PipelineError, StageKind};
pub use heuristics::{evaluate_gate, evaluate_gate_with, GateDecision, MIN_CYCLES};
pub use io::{count_cycles, parse_transcript, read_transcript, render_human, render_json, CycleReport};
pub use llm::{
    build_generator, AnthropicClient, AnthropicConfig, GeminiClient, GeminiConfig, ReplyPolicy,
    StageParams, TextGenerator,
};
pub use models::{Classification, ConfidenceLevel, Outcome, ScamReport, Speaker, Transcript};
pub use pipeline::{PipelineConfig, ScamPipeline};
pub use stages::{execute_classifier, execute_summarizer, ClassifierConfig, SummarizerConfig};
