use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result, StageKind};
use crate::heuristics::{evaluate_gate_with, GateDecision, MIN_CYCLES};
use crate::io::count_cycles;
use crate::llm::{ReplyPolicy, TextGenerator};
use crate::models::{Outcome, PipelineState, PipelineStep, ScamReport};
use crate::stages::{execute_classifier, execute_summarizer, ClassifierConfig, SummarizerConfig};

/// Configuration for the whole pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Complete caller/receiver cycles required before any backend call
    pub min_cycles: usize,
    pub summarizer: SummarizerConfig,
    pub classifier: ClassifierConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_cycles: MIN_CYCLES,
            summarizer: SummarizerConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_reply_policy(mut self, policy: ReplyPolicy) -> Self {
        self.classifier.reply_policy = policy;
        self
    }
}

/// Scam detection pipeline: gate → summarizer → classifier
///
/// Built once and shared; it holds no per-invocation data, so concurrent
/// calls to [`ScamPipeline::run`] are independent.
///
/// ```text
///            ┌─ insufficient ─▶ Insufficient
///   Start ───┤
///            └─ proceed ─▶ Summarized ─▶ Classified ─▶ Done
///                              │             │
///                              └──── error ──┴─▶ Failed
/// ```
#[derive(Clone)]
pub struct ScamPipeline {
    generator: Arc<dyn TextGenerator>,
    config: PipelineConfig,
}

impl ScamPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, config: PipelineConfig) -> Self {
        Self { generator, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Classify a transcript, folding every error into the failure outcome
    pub async fn run(&self, conversation: &str) -> Outcome {
        match self.invoke(conversation).await {
            Ok(outcome) => outcome,
            Err(e) => Outcome::failed(e.report_message()),
        }
    }

    /// Classify a transcript
    ///
    /// Returns the insufficient-data or classified outcome, or the error
    /// that stopped the pipeline. A blank transcript is rejected before any
    /// state is created.
    pub async fn invoke(&self, conversation: &str) -> Result<Outcome> {
        if conversation.trim().is_empty() {
            return Err(PipelineError::EmptyConversation);
        }

        let mut state = PipelineState::new(conversation, count_cycles(conversation));
        info!(
            "[{}] Classifying transcript: {} cycles",
            state.invocation_id, state.cycles_count
        );

        let result = self.drive(&mut state).await;

        match &result {
            Ok(outcome) => info!(
                "[{}] Finished: {} in {}ms",
                state.invocation_id,
                outcome.kind(),
                state.elapsed_ms()
            ),
            Err(e) => warn!(
                "[{}] Failed after {}ms: {}",
                state.invocation_id,
                state.elapsed_ms(),
                e
            ),
        }

        result
    }

    /// Walk the control graph from the current step to a terminal one
    async fn drive(&self, state: &mut PipelineState<'_>) -> Result<Outcome> {
        while !state.step().is_terminal() {
            match self.advance(state).await {
                Ok(next) => {
                    debug!(
                        "[{}] {:?} -> {:?}",
                        state.invocation_id,
                        state.step(),
                        next
                    );
                    state.enter(next);
                }
                Err(e) => {
                    state.enter(PipelineStep::Failed);
                    return Err(e);
                }
            }
        }

        match state.step() {
            PipelineStep::Insufficient => Ok(Outcome::insufficient()),
            PipelineStep::Done => {
                let classification = state.classification.take().ok_or_else(|| {
                    PipelineError::stage(
                        StageKind::Classifier,
                        anyhow::anyhow!("pipeline finished without a classification"),
                    )
                })?;
                Ok(Outcome::Classified(ScamReport::new(
                    classification,
                    &state.summary,
                )))
            }
            step => Err(PipelineError::stage(
                StageKind::Classifier,
                anyhow::anyhow!("pipeline stopped at unexpected step {:?}", step),
            )),
        }
    }

    /// Run the work attached to the current step and return the next step
    async fn advance(&self, state: &mut PipelineState<'_>) -> Result<PipelineStep> {
        match state.step() {
            PipelineStep::Start => {
                match evaluate_gate_with(state.cycles_count, self.config.min_cycles) {
                    GateDecision::Insufficient => {
                        info!(
                            "[{}] Gate: {} cycles < {}, skipping classification",
                            state.invocation_id, state.cycles_count, self.config.min_cycles
                        );
                        Ok(PipelineStep::Insufficient)
                    }
                    GateDecision::Proceed => {
                        state.summary = execute_summarizer(
                            self.generator.as_ref(),
                            state.conversation,
                            &self.config.summarizer,
                        )
                        .await?;
                        Ok(PipelineStep::Summarized)
                    }
                }
            }
            PipelineStep::Summarized => {
                let classification = execute_classifier(
                    self.generator.as_ref(),
                    &state.summary,
                    &self.config.classifier,
                )
                .await?;
                state.classification = Some(classification);
                Ok(PipelineStep::Classified)
            }
            PipelineStep::Classified => Ok(PipelineStep::Done),
            terminal => Ok(terminal),
        }
    }
}
