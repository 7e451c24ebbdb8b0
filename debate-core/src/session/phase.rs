//! Session phases and legal transition guards.
//!
//! Every phase change goes through [`PhaseMachine::advance`], which checks the
//! transition table and appends to the transition log so a run can be
//! reconstructed afterwards.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::stream::Epoch;

/// Lifecycle phase of the session owner.
///
/// ```text
/// Idle ──start──▶ Active ──sentinel──▶ Finished
///                  │  ▲  └──transport──▶ Error
///                  └──┘ start (pre-empt)
/// Finished | Error ──start──▶ Active
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No session started yet.
    #[default]
    Idle,
    /// Connection open, transcript growing.
    Active,
    /// Termination sentinel received.
    Finished,
    /// Transport failed.
    Error,
}

impl SessionPhase {
    /// `finished` or `error`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Error)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Active => write!(f, "active"),
            Self::Finished => write!(f, "finished"),
            Self::Error => write!(f, "error"),
        }
    }
}

fn is_legal_transition(from: SessionPhase, to: SessionPhase) -> bool {
    use SessionPhase::*;

    // A start is accepted from every phase, including a running session.
    if to == Active {
        return true;
    }

    matches!((from, to), (Active, Finished) | (Active, Error))
}

/// One recorded phase change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: SessionPhase,
    pub to: SessionPhase,
    /// Epoch of the session the transition belongs to.
    pub epoch: Epoch,
    /// Milliseconds since the machine was created.
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllegalTransition {
    pub from: SessionPhase,
    pub to: SessionPhase,
}

impl fmt::Display for IllegalTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Illegal phase transition: {} -> {}", self.from, self.to)
    }
}

impl std::error::Error for IllegalTransition {}

/// Current phase plus the full transition history of one session owner.
#[derive(Debug)]
pub struct PhaseMachine {
    current: SessionPhase,
    created_at: Instant,
    transitions: Vec<TransitionRecord>,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            current: SessionPhase::Idle,
            created_at: Instant::now(),
            transitions: Vec::new(),
        }
    }

    /// Get the current phase.
    pub fn current(&self) -> SessionPhase {
        self.current
    }

    /// Move to `to` if the transition table allows it, recording the change.
    pub fn advance(
        &mut self,
        to: SessionPhase,
        epoch: Epoch,
        reason: Option<&str>,
    ) -> Result<(), IllegalTransition> {
        if !is_legal_transition(self.current, to) {
            return Err(IllegalTransition {
                from: self.current,
                to,
            });
        }

        tracing::debug!(
            from = %self.current,
            to = %to,
            %epoch,
            "Phase transition"
        );

        self.transitions.push(TransitionRecord {
            from: self.current,
            to,
            epoch,
            elapsed_ms: self.created_at.elapsed().as_millis() as u64,
            reason: reason.map(String::from),
        });
        self.current = to;
        Ok(())
    }

    /// Get the full transition log.
    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    /// One-line history, e.g. `idle -> finished (2 transitions) [active -> finished]`.
    pub fn summary(&self) -> String {
        let path: Vec<String> = self.transitions.iter().map(|t| t.to.to_string()).collect();
        let mut line = format!(
            "{} -> {} ({} transitions)",
            SessionPhase::Idle,
            self.current,
            self.transitions.len()
        );
        if !path.is_empty() {
            line.push_str(&format!(" [{}]", path.join(" -> ")));
        }
        line
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}
