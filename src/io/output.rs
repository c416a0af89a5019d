use anyhow::{Context, Result};
use serde::Serialize;

use crate::heuristics::GateDecision;
use crate::models::{Outcome, Speaker, Transcript};

/// Serialize an outcome to its JSON response shape
pub fn render_json(outcome: &Outcome, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(outcome)
    } else {
        serde_json::to_string(outcome)
    };
    json.context("Failed to serialize outcome")
}

/// Format an outcome as human-readable text
pub fn render_human(outcome: &Outcome) -> String {
    let mut output = String::new();

    match outcome {
        Outcome::Classified(report) => {
            output.push_str(&format!("Scam likelihood: {}\n\n", report.confidence_level));
            output.push_str("Suggested reply:\n");
            output.push_str(&wrap_text(&report.suggested_reply, 80));
            output.push_str("\n\nSummary:\n");
            for line in report.summary.lines() {
                output.push_str(&wrap_text(line, 80));
                output.push('\n');
            }
        }
        Outcome::Insufficient(notice) => {
            output.push_str(&format!("{}\n", notice.confidence_level));
            output.push_str(&wrap_text(&notice.suggested_reply, 80));
            output.push('\n');
        }
        Outcome::Failed(failure) => {
            output.push_str("Error: ");
            output.push_str(&failure.error);
            output.push('\n');
        }
    }

    output
}

/// Turn statistics for a transcript, without any backend calls
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub caller_lines: usize,
    pub receiver_lines: usize,
    pub unlabeled_lines: usize,
    pub cycles: usize,
    pub proceeds: bool,
    pub last_caller_utterance: Option<String>,
}

impl CycleReport {
    pub fn new(transcript: &Transcript, decision: GateDecision) -> Self {
        Self {
            caller_lines: transcript.line_count(Speaker::Caller),
            receiver_lines: transcript.line_count(Speaker::Receiver),
            unlabeled_lines: transcript.unlabeled_lines,
            cycles: transcript.cycle_count(),
            proceeds: decision == GateDecision::Proceed,
            last_caller_utterance: transcript.last_caller_turn().map(|t| t.text.clone()),
        }
    }

    /// Format the report as human-readable text
    pub fn format(&self) -> String {
        let mut output = String::new();
        output.push_str("Transcript Analysis\n");
        output.push_str("===================\n");
        output.push_str(&format!("Caller lines: {}\n", self.caller_lines));
        output.push_str(&format!("Receiver lines: {}\n", self.receiver_lines));
        output.push_str(&format!("Unlabeled lines: {}\n", self.unlabeled_lines));
        output.push_str(&format!("Complete cycles: {}\n", self.cycles));
        output.push_str(&format!(
            "Gate: {}\n",
            if self.proceeds { "proceed" } else { "insufficient data" }
        ));
        if let Some(last) = &self.last_caller_utterance {
            output.push_str(&format!("Last caller line: {}\n", last));
        }
        output
    }
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        if line_len + word.len() + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word.len();
    }

    result
}
