use tracing::{info, warn};

use crate::error::{PipelineError, Result, StageKind};
use crate::llm::{
    build_classification_prompt, classification_schema, parse_classification,
    validate_classification, GenerationRequest, OutputSchema, ReplyPolicy, StageParams,
    TextGenerator, CLASSIFICATION_TOOL_DESCRIPTION, CLASSIFICATION_TOOL_NAME,
    CLASSIFIER_SYSTEM_PROMPT,
};
use crate::models::Classification;

/// Configuration for Stage 2
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub params: StageParams,
    /// How a missing reply for High / Not Clear is treated
    pub reply_policy: ReplyPolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            params: StageParams::CLASSIFIER,
            reply_policy: ReplyPolicy::Advisory,
        }
    }
}

/// Execute Stage 2: scam likelihood classification
///
/// 1. Build the prompt from the summary
/// 2. Call the backend once, constrained to the classification schema
/// 3. Decode the reply strictly; a malformed payload fails the stage
/// 4. Apply the reply policy
pub async fn execute_classifier(
    generator: &dyn TextGenerator,
    summary: &str,
    config: &ClassifierConfig,
) -> Result<Classification> {
    let prompt = build_classification_prompt(summary);
    let schema = classification_schema();
    let request = GenerationRequest {
        system: CLASSIFIER_SYSTEM_PROMPT,
        user: &prompt,
        params: config.params,
    };
    let output = OutputSchema {
        name: CLASSIFICATION_TOOL_NAME,
        description: CLASSIFICATION_TOOL_DESCRIPTION,
        schema: &schema,
    };

    let reply = generator
        .generate_structured(request, output)
        .await
        .map_err(|e| PipelineError::stage(StageKind::Classifier, e))?;

    let classification = parse_classification(&reply)?;

    let validation = validate_classification(&classification, config.reply_policy);
    for warning in &validation.warnings {
        warn!("Classifier: {}", warning);
    }
    if !validation.is_valid {
        return Err(PipelineError::MissingReply(classification.confidence_level));
    }

    info!(
        "Classifier: {} (reply: {})",
        classification.confidence_level,
        classification.reply().is_some()
    );
    Ok(classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::StructuredReply;
    use crate::models::ConfidenceLevel;
    use crate::testing::ScriptedGenerator;
    use serde_json::json;

    #[tokio::test]
    async fn test_classify_with_reply() {
        let generator = ScriptedGenerator::new().with_classification_json(json!({
            "confidence_level": "High",
            "suggested_reply": "Can you tell me which branch you are calling from?"
        }));

        let classification =
            execute_classifier(&generator, "Caller asked for OTP.", &ClassifierConfig::default())
                .await
                .unwrap();

        assert_eq!(classification.confidence_level, ConfidenceLevel::High);
        assert!(classification.reply().unwrap().contains("branch"));
        assert_eq!(generator.classify_calls(), 1);
        assert_eq!(generator.summary_calls(), 0);
    }

    #[tokio::test]
    async fn test_prompt_carries_summary() {
        let generator = ScriptedGenerator::new();

        execute_classifier(&generator, "Caller offered a prize.", &ClassifierConfig::default())
            .await
            .unwrap();

        let request = generator.last_classify_request().unwrap();
        assert!(request.user.contains("Caller offered a prize."));
        assert_eq!(request.system, CLASSIFIER_SYSTEM_PROMPT);
        assert_eq!(request.params, StageParams::CLASSIFIER);
    }

    #[tokio::test]
    async fn test_text_reply_is_parsed() {
        let generator = ScriptedGenerator::new().with_classification(StructuredReply::Text(
            "{\"confidence_level\": \"Very Low\"}".to_string(),
        ));

        let classification =
            execute_classifier(&generator, "Pizza order.", &ClassifierConfig::default())
                .await
                .unwrap();

        assert_eq!(classification.confidence_level, ConfidenceLevel::VeryLow);
        assert_eq!(classification.suggested_reply, None);
    }

    #[tokio::test]
    async fn test_malformed_reply_fails() {
        let generator = ScriptedGenerator::new()
            .with_classification_json(json!({"suggested_reply": "hi"}));

        let err = execute_classifier(&generator, "s", &ClassifierConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::SchemaViolation(_)));
    }

    #[tokio::test]
    async fn test_missing_reply_is_advisory_by_default() {
        let generator =
            ScriptedGenerator::new().with_classification_json(json!({"confidence_level": "Not Clear"}));

        let classification = execute_classifier(&generator, "s", &ClassifierConfig::default())
            .await
            .unwrap();

        assert_eq!(classification.confidence_level, ConfidenceLevel::NotClear);
    }

    #[tokio::test]
    async fn test_missing_reply_enforced() {
        let generator =
            ScriptedGenerator::new().with_classification_json(json!({"confidence_level": "High"}));
        let config = ClassifierConfig {
            reply_policy: ReplyPolicy::Enforce,
            ..Default::default()
        };

        let err = execute_classifier(&generator, "s", &config).await.unwrap_err();

        assert!(matches!(err, PipelineError::MissingReply(ConfidenceLevel::High)));
        assert_eq!(generator.classify_calls(), 1);
    }

    #[tokio::test]
    async fn test_backend_error_is_stage_failure() {
        let generator = ScriptedGenerator::new().with_classification_error("rate limited");

        let err = execute_classifier(&generator, "s", &ClassifierConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Stage {
                stage: StageKind::Classifier,
                ..
            }
        ));
        assert!(err.to_string().contains("rate limited"));
    }
}
