use serde::Deserialize;

use crate::error::PipelineError;
use crate::llm::StructuredReply;
use crate::models::Classification;

/// How the "reply required for High / Not Clear" rule is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyPolicy {
    /// Violations are reported as warnings and the classification is kept
    #[default]
    Advisory,
    /// Violations fail the classifier stage
    Enforce,
}

/// Result of checking a parsed classification against the reply policy
#[derive(Debug, Clone, Default)]
pub struct ClassificationValidation {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Decode a backend reply into a [`Classification`]
///
/// The payload must be a JSON object with a `confidence_level` drawn from
/// the five labels and an optional string `suggested_reply`. Anything else
/// is a schema violation; no field is guessed or defaulted.
pub fn parse_classification(reply: &StructuredReply) -> Result<Classification, PipelineError> {
    match reply {
        StructuredReply::Json(value) => classification_from_value(value),
        StructuredReply::Text(text) => {
            let json = extract_json_object(text).ok_or_else(|| {
                PipelineError::SchemaViolation(format!(
                    "no JSON object in classifier output: {:?}",
                    truncate(text, 120)
                ))
            })?;
            serde_json::from_str(json).map_err(|e| PipelineError::SchemaViolation(e.to_string()))
        }
    }
}

/// Check the reply-presence rule
pub fn validate_classification(
    classification: &Classification,
    policy: ReplyPolicy,
) -> ClassificationValidation {
    let mut validation = ClassificationValidation {
        is_valid: true,
        ..Default::default()
    };

    if classification.is_missing_reply() {
        let message = format!(
            "Confidence level \"{}\" requires a suggested reply but none was given",
            classification.confidence_level
        );
        match policy {
            ReplyPolicy::Advisory => validation.warnings.push(message),
            ReplyPolicy::Enforce => {
                validation.is_valid = false;
                validation.errors.push(message);
            }
        }
    }

    validation
}

fn classification_from_value(value: &serde_json::Value) -> Result<Classification, PipelineError> {
    if !value.is_object() {
        return Err(PipelineError::SchemaViolation(format!(
            "expected a JSON object, got {}",
            value
        )));
    }
    Classification::deserialize(value).map_err(|e| PipelineError::SchemaViolation(e.to_string()))
}

/// Locate the JSON object in model text, allowing a Markdown code fence
fn extract_json_object(text: &str) -> Option<&str> {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .map(|rest| rest.trim_end().trim_end_matches("```"))
        .unwrap_or(text);

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConfidenceLevel;
    use serde_json::json;

    #[test]
    fn test_parse_json_reply() {
        let reply = StructuredReply::Json(json!({
            "confidence_level": "Very High",
            "suggested_reply": null
        }));
        let classification = parse_classification(&reply).unwrap();

        assert_eq!(classification.confidence_level, ConfidenceLevel::VeryHigh);
        assert_eq!(classification.suggested_reply, None);
    }

    #[test]
    fn test_parse_fenced_text_reply() {
        let reply = StructuredReply::Text(
            "```json\n{\"confidence_level\": \"High\", \"suggested_reply\": \"Which department are you with?\"}\n```"
                .to_string(),
        );
        let classification = parse_classification(&reply).unwrap();

        assert_eq!(classification.confidence_level, ConfidenceLevel::High);
        assert_eq!(classification.reply(), Some("Which department are you with?"));
    }

    #[test]
    fn test_missing_level_is_schema_violation() {
        let reply = StructuredReply::Json(json!({"suggested_reply": "hello"}));
        let err = parse_classification(&reply).unwrap_err();

        assert!(matches!(err, PipelineError::SchemaViolation(_)));
        assert!(err.to_string().contains("confidence_level"));
    }

    #[test]
    fn test_unknown_level_is_schema_violation() {
        let reply = StructuredReply::Text(r#"{"confidence_level": "Medium"}"#.to_string());
        assert!(matches!(
            parse_classification(&reply),
            Err(PipelineError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_non_object_is_schema_violation() {
        for value in [json!("Low"), json!(["Low"]), json!(null)] {
            let err = parse_classification(&StructuredReply::Json(value)).unwrap_err();
            assert!(matches!(err, PipelineError::SchemaViolation(_)));
        }

        let err = parse_classification(&StructuredReply::Text("It is probably a scam.".into()))
            .unwrap_err();
        assert!(err.to_string().contains("no JSON object"));
    }

    #[test]
    fn test_advisory_policy_warns() {
        let classification = Classification::new(ConfidenceLevel::NotClear, None);
        let validation = validate_classification(&classification, ReplyPolicy::Advisory);

        assert!(validation.is_valid);
        assert_eq!(validation.warnings.len(), 1);
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn test_enforced_policy_rejects() {
        let classification = Classification::new(ConfidenceLevel::High, None);
        let validation = validate_classification(&classification, ReplyPolicy::Enforce);

        assert!(!validation.is_valid);
        assert!(validation.errors[0].contains("\"High\""));
    }

    #[test]
    fn test_low_level_needs_no_reply() {
        let classification = Classification::new(ConfidenceLevel::Low, None);
        let validation = validate_classification(&classification, ReplyPolicy::Enforce);

        assert!(validation.is_valid);
        assert!(validation.warnings.is_empty());
    }
}
