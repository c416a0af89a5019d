use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result, StageKind};
use crate::llm::{
    build_summary_prompt, GenerationRequest, StageParams, TextGenerator, SUMMARIZER_SYSTEM_PROMPT,
};

/// Configuration for Stage 1
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub params: StageParams,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            params: StageParams::SUMMARIZER,
        }
    }
}

/// Execute Stage 1: caller-focused summarization
///
/// Makes exactly one backend call and returns its text unchanged. Backend
/// errors are stage failures; nothing is retried. A blank summary is passed
/// on so the report can fall back to its placeholder.
pub async fn execute_summarizer(
    generator: &dyn TextGenerator,
    conversation: &str,
    config: &SummarizerConfig,
) -> Result<String> {
    let prompt = build_summary_prompt(conversation);
    let request = GenerationRequest {
        system: SUMMARIZER_SYSTEM_PROMPT,
        user: &prompt,
        params: config.params,
    };

    debug!(
        "Summarizer: {} chars of transcript via {}",
        conversation.len(),
        generator.name()
    );

    let summary = generator
        .generate(request)
        .await
        .map_err(|e| PipelineError::stage(StageKind::Summarizer, e))?;

    if summary.trim().is_empty() {
        warn!("Summarizer: backend returned an empty summary");
    } else {
        info!("Summarizer: {} chars of summary", summary.len());
    }
    Ok(summary)
}
