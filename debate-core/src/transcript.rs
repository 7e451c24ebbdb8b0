//! Message accumulator: the append-only transcript of a session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::side::Side;

/// Identifier of an utterance, unique within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One turn of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub id: UtteranceId,
    pub speaker: Side,
    /// Raw body; may contain markdown that only a renderer interprets.
    pub text: String,
}

impl Utterance {
    /// Display helper for two-column renderers.
    pub fn is_side_a(&self) -> bool {
        self.speaker.is_side_a()
    }
}

/// Ordered, append-only log of utterances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<Utterance>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return the id assigned to it.
    pub fn append(&mut self, speaker: Side, text: impl Into<String>) -> UtteranceId {
        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        self.entries.push(Utterance {
            id,
            speaker,
            text: text.into(),
        });
        id
    }

    /// All turns in arrival order.
    pub fn utterances(&self) -> &[Utterance] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_arrival_order_and_assigns_increasing_ids() {
        let mut transcript = Transcript::new();
        let first = transcript.append(Side::A, "opening");
        let second = transcript.append(Side::B, "rebuttal");
        let third = transcript.append(Side::A, "closing");

        assert!(first < second && second < third);
        let texts: Vec<&str> = transcript
            .utterances()
            .iter()
            .map(|u| u.text.as_str())
            .collect();
        assert_eq!(texts, ["opening", "rebuttal", "closing"]);
    }

    #[test]
    fn side_is_derived_from_speaker() {
        let mut transcript = Transcript::new();
        transcript.append(Side::A, "a");
        transcript.append(Side::B, "b");

        assert!(transcript.utterances()[0].is_side_a());
        assert!(!transcript.utterances()[1].is_side_a());
    }

    #[test]
    fn keeps_markup_opaque() {
        let mut transcript = Transcript::new();
        let body = "> quoted\n\n| a | b |\n|---|---|\n| 1 | 2 |";
        transcript.append(Side::B, body);
        assert_eq!(transcript.utterances()[0].text, body);
    }
}
