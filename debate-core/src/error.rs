//! Error taxonomy for the debate stream core.
//!
//! Every failure the core can observe is represented here. Callers query
//! `scope()` / `is_recoverable()` instead of matching on messages.
//!
//! ## Scopes
//!
//! | Scope     | Recoverable | Effect on the session                 |
//! |-----------|-------------|---------------------------------------|
//! | Frame     | yes         | frame discarded, session continues    |
//! | Judgment  | yes         | verdict left unchanged                |
//! | Session   | no          | session moves to `error`              |
//! | Caller    | no          | rejected before a connection opens    |

use std::fmt;

use thiserror::Error;

/// How far an error reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// One inbound frame.
    Frame,
    /// One judgment event.
    Judgment,
    /// The whole session.
    Session,
    /// A caller request that never reached the network.
    Caller,
}

impl ErrorScope {
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::Frame | Self::Judgment)
    }
}

impl fmt::Display for ErrorScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame => write!(f, "frame"),
            Self::Judgment => write!(f, "judgment"),
            Self::Session => write!(f, "session"),
            Self::Caller => write!(f, "caller"),
        }
    }
}

/// Result alias for core operations.
pub type DebateResult<T> = Result<T, DebateError>;

/// Unified error type for the core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DebateError {
    // ── Recoverable ───────────────────────────────────────────────────────
    /// A single frame could not be decoded into a known shape.
    #[error("Frame decode error: {0}")]
    FrameDecode(String),

    /// A structurally valid frame carried a `type` this client does not know.
    #[error("Unknown frame type: {0}")]
    UnknownFrameType(String),

    /// A judgment payload contained no recognisable verdict.
    #[error("No verdict found in judgment payload")]
    NoVerdictFound,

    // ── Fatal ─────────────────────────────────────────────────────────────
    /// Connection lost, refused, or ended without the termination sentinel.
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Start parameters failed validation.
    #[error("Invalid start parameters: {0}")]
    InvalidStartParameters(String),
}

impl DebateError {
    pub fn scope(&self) -> ErrorScope {
        match self {
            Self::FrameDecode(_) | Self::UnknownFrameType(_) => ErrorScope::Frame,
            Self::NoVerdictFound => ErrorScope::Judgment,
            Self::TransportFailure(_) => ErrorScope::Session,
            Self::InvalidStartParameters(_) => ErrorScope::Caller,
        }
    }

    /// Returns `true` if the session survives this error.
    pub fn is_recoverable(&self) -> bool {
        self.scope().is_recoverable()
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::FrameDecode(reason.into())
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        Self::TransportFailure(reason.into())
    }

    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidStartParameters(reason.into())
    }
}
