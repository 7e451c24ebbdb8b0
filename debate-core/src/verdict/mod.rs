//! Verdict resolution: raw judgment payload in, canonical record out.
//!
//! ```text
//! RawVerdictPayload ──locate──▶ judgment object ──normalize──▶ NormalizedVerdict
//!                        │
//!                        └─ nothing found ──▶ DebateError::NoVerdictFound
//! ```
//!
//! Every consumer reads the same total shape; defaulting happens here and
//! nowhere else.

pub mod locate;
pub mod normalize;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DebateError, DebateResult};
use crate::side::{PerSide, Side};

pub use locate::{is_judgment, locate};
pub use normalize::{coerce_metric, normalize};

pub const DEFAULT_SUMMARY: &str = "No summary available.";
pub const DEFAULT_RATIONALE: &str = "No rationale.";
pub const DEFAULT_CONCLUSION: &str = "No conclusion.";

/// The untyped judgment event exactly as received.
pub type RawVerdictPayload = Value;

/// Judge scores for one side. Always finite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub logic: f64,
    pub persuasion: f64,
    pub aggression: f64,
}

impl ScoreCard {
    /// Headline score: mean of logic and persuasion, rounded half away from zero.
    pub fn final_score(&self) -> i64 {
        ((self.logic + self.persuasion) / 2.0).round() as i64
    }
}

/// Canonical, fully populated verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedVerdict {
    #[serde(rename = "winner")]
    pub winning_side: Side,
    pub summary: String,
    pub rationale: String,
    pub conclusion: String,
    pub scores: PerSide<ScoreCard>,
    pub key_points: PerSide<Vec<String>>,
    pub strengths: PerSide<Vec<String>>,
    pub weaknesses: PerSide<Vec<String>>,
}

impl Default for NormalizedVerdict {
    fn default() -> Self {
        normalize(&Map::new())
    }
}

impl NormalizedVerdict {
    pub fn score(&self, side: Side) -> &ScoreCard {
        self.scores.get(side)
    }
}

/// Locate the judgment inside `payload` and normalize it.
pub fn resolve(payload: &RawVerdictPayload) -> DebateResult<NormalizedVerdict> {
    locate(payload)
        .map(normalize)
        .ok_or(DebateError::NoVerdictFound)
}
