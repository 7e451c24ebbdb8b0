//! Debater personas the producer knows how to play.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DebateError;

/// Speaking style assigned to one side of a debate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Persona {
    /// Balanced, neutral debater.
    #[default]
    #[serde(rename = "Default")]
    Default,
    #[serde(rename = "The Data Scientist")]
    DataScientist,
    #[serde(rename = "The Philosopher")]
    Philosopher,
    #[serde(rename = "The Debunker")]
    Debunker,
    #[serde(rename = "The Futurist")]
    Futurist,
    #[serde(rename = "The Humanist")]
    Humanist,
}

impl Persona {
    pub const ALL: [Persona; 6] = [
        Persona::Default,
        Persona::DataScientist,
        Persona::Philosopher,
        Persona::Debunker,
        Persona::Futurist,
        Persona::Humanist,
    ];

    /// Identifier sent to the producer.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::DataScientist => "The Data Scientist",
            Self::Philosopher => "The Philosopher",
            Self::Debunker => "The Debunker",
            Self::Futurist => "The Futurist",
            Self::Humanist => "The Humanist",
        }
    }

    /// One-line summary shown by `--list-personas`.
    pub fn description(self) -> &'static str {
        match self {
            Self::Default => "Balanced debater using logic and standard rhetoric.",
            Self::DataScientist => {
                "Uses empirical evidence, stats, and tables. Cold and analytical."
            }
            Self::Philosopher => {
                "Focuses on ethics, morality, and first principles. Abstract reasoning."
            }
            Self::Debunker => {
                "Aggressive and skeptical. Attacks logical fallacies and weak points."
            }
            Self::Futurist => "Speculative and visionary. Focuses on long-term consequences.",
            Self::Humanist => "Emotional and empathetic. Focuses on human impact and stories.",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Persona {
    type Err = DebateError;

    /// Case-insensitive; the leading "The " is optional and `-`/`_` read as spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Self::ALL
            .into_iter()
            .find(|persona| normalize_name(persona.wire_name()) == wanted)
            .ok_or_else(|| DebateError::invalid_params(format!("unknown persona {s:?}")))
    }
}

fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_ascii_lowercase().replace(['-', '_'], " ");
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.strip_prefix("the ") {
        Some(rest) => rest.to_string(),
        None => collapsed,
    }
}
