use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{Speaker, Transcript, Turn};

/// Read raw transcript text from a file, or from stdin when no path is given
pub fn read_transcript(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => read_transcript_file(path),
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read transcript from stdin")?;
            Ok(content)
        }
    }
}

/// Read raw transcript text from a file
pub fn read_transcript_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}

/// Parse raw transcript text into speaker-tagged turns
///
/// Lines are trimmed and blank lines dropped. A line belongs to a speaker
/// when it starts with `caller:` or `receiver:` in any letter case; every
/// other line is counted as unlabeled and otherwise ignored.
pub fn parse_transcript(text: &str) -> Transcript {
    let mut transcript = Transcript::default();

    let lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    for (line_index, line) in lines.enumerate() {
        match Speaker::from_line(line) {
            Some((speaker, utterance)) => transcript.turns.push(Turn {
                line_index,
                speaker,
                text: utterance.to_string(),
            }),
            None => transcript.unlabeled_lines += 1,
        }
    }

    transcript
}

/// Count complete caller/receiver exchange cycles in raw transcript text
pub fn count_cycles(text: &str) -> usize {
    parse_transcript(text).cycle_count()
}
