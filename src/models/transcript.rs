use serde::{Deserialize, Serialize};

/// Speaker tag that may prefix a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The party who placed the call
    Caller,
    /// The party who answered the call
    Receiver,
}

impl Speaker {
    pub const ALL: [Speaker; 2] = [Speaker::Caller, Speaker::Receiver];

    /// Literal line prefix, matched case-insensitively
    pub fn tag(self) -> &'static str {
        match self {
            Speaker::Caller => "caller:",
            Speaker::Receiver => "receiver:",
        }
    }

    /// Split a trimmed line into its speaker and the text after the tag
    pub fn from_line(line: &str) -> Option<(Speaker, &str)> {
        Self::ALL.into_iter().find_map(|speaker| {
            let tag = speaker.tag();
            line.get(..tag.len())
                .filter(|prefix| prefix.eq_ignore_ascii_case(tag))
                .map(|_| (speaker, line[tag.len()..].trim()))
        })
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::Caller => write!(f, "Caller"),
            Speaker::Receiver => write!(f, "Receiver"),
        }
    }
}

/// A single speaker-tagged line of the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Position among the non-empty lines of the raw text
    pub line_index: usize,
    /// Who spoke
    pub speaker: Speaker,
    /// Utterance with the speaker tag stripped
    pub text: String,
}

/// Speaker-tagged view of a raw call transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Tagged turns in transcript order
    pub turns: Vec<Turn>,
    /// Non-empty lines that carried no speaker tag
    pub unlabeled_lines: usize,
}

impl Transcript {
    /// Number of turns attributed to a speaker
    pub fn line_count(&self, speaker: Speaker) -> usize {
        self.turns.iter().filter(|t| t.speaker == speaker).count()
    }

    /// Complete caller/receiver exchange cycles
    pub fn cycle_count(&self) -> usize {
        self.line_count(Speaker::Caller)
            .min(self.line_count(Speaker::Receiver))
    }

    /// The caller's most recent utterance, if any
    pub fn last_caller_turn(&self) -> Option<&Turn> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.speaker == Speaker::Caller)
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
