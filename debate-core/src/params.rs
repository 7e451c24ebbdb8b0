//! Caller-supplied session start parameters.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{DebateError, DebateResult};
use crate::persona::Persona;

/// Inclusive bounds on the number of rounds a session may request.
pub const ROUND_RANGE: RangeInclusive<u32> = 4..=16;

/// Validated parameters for one debate session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    pub topic: String,
    pub side_a: Persona,
    pub side_b: Persona,
    pub rounds: u32,
}

impl SessionParams {
    /// Build and validate in one step.
    pub fn new(
        topic: impl Into<String>,
        side_a: Persona,
        side_b: Persona,
        rounds: u32,
    ) -> DebateResult<Self> {
        let params = Self {
            topic: topic.into(),
            side_a,
            side_b,
            rounds,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> DebateResult<()> {
        if self.topic.trim().is_empty() {
            return Err(DebateError::invalid_params("topic must not be empty"));
        }
        if !ROUND_RANGE.contains(&self.rounds) {
            return Err(DebateError::invalid_params(format!(
                "rounds must be between {} and {}, got {}",
                ROUND_RANGE.start(),
                ROUND_RANGE.end(),
                self.rounds
            )));
        }
        if self.rounds % 2 != 0 {
            return Err(DebateError::invalid_params(format!(
                "rounds must be even, got {}",
                self.rounds
            )));
        }
        Ok(())
    }

    /// Query parameters in the producer's naming, topic passed verbatim.
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("topic", self.topic.clone()),
            ("agent_a", self.side_a.wire_name().to_string()),
            ("agent_b", self.side_b.wire_name().to_string()),
            ("rounds", self.rounds.to_string()),
        ]
    }
}
