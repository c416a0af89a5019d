//! In-memory text-generation backend with scripted answers for unit tests.
//!
//! It records every request and counts calls per stage so tests can assert
//! how often the backend was hit.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::{GenerationRequest, OutputSchema, StageParams, StructuredReply, TextGenerator};

/// Owned copy of a request the backend received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub system: String,
    pub user: String,
    pub params: StageParams,
}

impl From<GenerationRequest<'_>> for RecordedRequest {
    fn from(request: GenerationRequest<'_>) -> Self {
        Self {
            system: request.system.to_string(),
            user: request.user.to_string(),
            params: request.params,
        }
    }
}

/// Backend that answers every call with a fixed, preconfigured reply
pub struct ScriptedGenerator {
    summary: Result<String, String>,
    classification: Result<StructuredReply, String>,
    summary_calls: AtomicUsize,
    classify_calls: AtomicUsize,
    summary_requests: Mutex<Vec<RecordedRequest>>,
    classify_requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            summary: Ok("Caller asked about the account.\nLast: asked for the balance.".to_string()),
            classification: Ok(StructuredReply::Json(serde_json::json!({
                "confidence_level": "Very Low"
            }))),
            summary_calls: AtomicUsize::new(0),
            classify_calls: AtomicUsize::new(0),
            summary_requests: Mutex::new(Vec::new()),
            classify_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Ok(summary.into());
        self
    }

    pub fn with_summary_error(mut self, message: impl Into<String>) -> Self {
        self.summary = Err(message.into());
        self
    }

    pub fn with_classification(mut self, reply: StructuredReply) -> Self {
        self.classification = Ok(reply);
        self
    }

    pub fn with_classification_json(self, value: serde_json::Value) -> Self {
        self.with_classification(StructuredReply::Json(value))
    }

    pub fn with_classification_error(mut self, message: impl Into<String>) -> Self {
        self.classification = Err(message.into());
        self
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    /// Total backend calls across both stages
    pub fn total_calls(&self) -> usize {
        self.summary_calls() + self.classify_calls()
    }

    pub fn last_summary_request(&self) -> Option<RecordedRequest> {
        self.summary_requests
            .lock()
            .ok()
            .and_then(|requests| requests.last().cloned())
    }

    pub fn last_classify_request(&self) -> Option<RecordedRequest> {
        self.classify_requests
            .lock()
            .ok()
            .and_then(|requests| requests.last().cloned())
    }
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.summary_requests.lock() {
            requests.push(request.into());
        }
        self.summary.clone().map_err(anyhow::Error::msg)
    }

    async fn generate_structured(
        &self,
        request: GenerationRequest<'_>,
        _schema: OutputSchema<'_>,
    ) -> Result<StructuredReply> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.classify_requests.lock() {
            requests.push(request.into());
        }
        self.classification.clone().map_err(anyhow::Error::msg)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
