//! Shared support for the integration tests: a backend with scripted answers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use callguard::llm::{GenerationRequest, OutputSchema, StructuredReply, TextGenerator};

/// Backend that answers every call with a fixed reply and counts calls per stage
pub struct ScriptedGenerator {
    summary: String,
    classification: StructuredReply,
    summary_calls: AtomicUsize,
    classify_calls: AtomicUsize,
    classify_prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            summary: "Caller asked about the account.\nLast: asked for the balance.".to_string(),
            classification: StructuredReply::Json(serde_json::json!({
                "confidence_level": "Very Low"
            })),
            summary_calls: AtomicUsize::new(0),
            classify_calls: AtomicUsize::new(0),
            classify_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_classification(mut self, reply: StructuredReply) -> Self {
        self.classification = reply;
        self
    }

    pub fn with_classification_json(self, value: serde_json::Value) -> Self {
        self.with_classification(StructuredReply::Json(value))
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.summary_calls() + self.classify_calls()
    }

    /// User prompt of the most recent classifier call
    pub fn last_classify_prompt(&self) -> Option<String> {
        self.classify_prompts.lock().unwrap().last().cloned()
    }
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _request: GenerationRequest<'_>) -> Result<String> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.summary.clone())
    }

    async fn generate_structured(
        &self,
        request: GenerationRequest<'_>,
        _schema: OutputSchema<'_>,
    ) -> Result<StructuredReply> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        self.classify_prompts
            .lock()
            .unwrap()
            .push(request.user.to_string());
        Ok(self.classification.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
