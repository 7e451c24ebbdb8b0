//! The two fixed participants of a debate and per-side containers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two debaters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "Side A", alias = "Agent A")]
    A,
    #[serde(rename = "Side B", alias = "Agent B")]
    B,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::A, Side::B];

    /// Canonical label used in normalized output.
    pub fn label(self) -> &'static str {
        match self {
            Self::A => "Side A",
            Self::B => "Side B",
        }
    }

    /// Every spelling the producer is known to use for this side.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::A => &["Side A", "Agent A"],
            Self::B => &["Side B", "Agent B"],
        }
    }

    /// Resolve a label, tolerating surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|side| side.aliases().contains(&label))
    }

    /// Side A is rendered on the left.
    pub fn is_side_a(self) -> bool {
        self == Self::A
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A value held once for each side, serialized as `{"Side A": .., "Side B": ..}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSide<T> {
    #[serde(rename = "Side A")]
    pub side_a: T,
    #[serde(rename = "Side B")]
    pub side_b: T,
}

impl<T> PerSide<T> {
    /// Build both entries from one function.
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self {
            side_a: f(Side::A),
            side_b: f(Side::B),
        }
    }

    /// Get the entry for `side`.
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }
}
