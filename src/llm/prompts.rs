use crate::models::ConfidenceLevel;

/// Instruction template for the summarizer stage
pub const SUMMARIZER_SYSTEM_PROMPT: &str = r#"You are a call summarizer assistant. Summarize the phone conversation you are given, concentrating on the Caller. Keep the Receiver's replies out of the summary unless they are needed to understand what the Caller is doing.

Instructions:
- Focus primarily on what the CALLER is saying and asking for, and why
- Include Receiver responses only when they are crucial to the context
- End the summary with a line stating the Caller's last reply or question (the current conversation point)
- Keep the summary concise but complete"#;

/// Instruction template for the classifier stage
pub const CLASSIFIER_SYSTEM_PROMPT: &str = r#"You are a scam call detection specialist. Analyze the conversation summary you are given and classify how likely the call is a scam, using exactly one of five confidence levels.

CONFIDENCE LEVELS (use only these):
- "Very High": Clear scam indicators (urgency, suspicious requests, impersonation)
- "High": Strong scam indicators but some uncertainty
- "Not Clear": Unclear or insufficient information to make a confident assessment
- "Low": Unlikely to be a scam but has some minor concerning elements
- "Very Low": Clearly legitimate conversation

REPLY POLICY:
- When the confidence level is "Not Clear" OR "High", you MUST provide a suggested reply
- The suggested reply should help the Receiver gather more information to decide whether the call is a scam
- The reply should be polite but probing, asking for verification or specific details
- The reply must NOT reveal any personal information
- For other levels, leave the suggested reply out"#;

/// Name of the structured output the classifier must submit
pub const CLASSIFICATION_TOOL_NAME: &str = "submit_classification";

pub const CLASSIFICATION_TOOL_DESCRIPTION: &str =
    "Submit the scam likelihood classification and, when required, a suggested reply";

/// Build the summarizer input for one transcript
pub fn build_summary_prompt(conversation: &str) -> String {
    format!("Conversation:\n{}\n\nSummary:", conversation.trim())
}

/// Build the classifier input for one summary
pub fn build_classification_prompt(summary: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("Conversation Summary:\n");
    prompt.push_str(summary.trim());
    prompt.push_str("\n\n");
    prompt.push_str("Output the result as a JSON object with these fields:\n");
    prompt.push_str(&format!(
        "- \"confidence_level\" (required): one of {}\n",
        level_list()
    ));
    prompt.push_str("- \"suggested_reply\" (optional): the reply text, only when the reply policy calls for one\n");
    prompt.push_str(&format!(
        "Submit it with the {} tool when tools are available; otherwise return only the JSON object.\n",
        CLASSIFICATION_TOOL_NAME
    ));

    prompt
}

/// JSON schema the classifier output must satisfy
pub fn classification_schema() -> serde_json::Value {
    let labels: Vec<&str> = ConfidenceLevel::ALL.iter().map(|l| l.label()).collect();

    serde_json::json!({
        "type": "object",
        "properties": {
            "confidence_level": {
                "type": "string",
                "enum": labels,
                "description": "Confidence level of scam detection"
            },
            "suggested_reply": {
                "type": "string",
                "description": "Suggested reply when confidence is 'Not Clear' or 'High'"
            }
        },
        "required": ["confidence_level"]
    })
}

fn level_list() -> String {
    ConfidenceLevel::ALL
        .iter()
        .map(|l| format!("\"{}\"", l.label()))
        .collect::<Vec<_>>()
        .join(", ")
}
