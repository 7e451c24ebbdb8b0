//! Debate stream core.
//!
//! Follows a live, server-pushed debate and turns it into two stable
//! structures for downstream consumers:
//!
//! - an ordered [`Transcript`] of utterances, and
//! - one [`NormalizedVerdict`], resolved from whatever shape the judge emitted.
//!
//! # Components
//!
//! - [`transcript`]: append-only message accumulator
//! - [`verdict`]: locate + normalize the judgment payload
//! - [`stream`]: one connection per session, frame decoding and routing
//! - [`session`]: phase machine and the caller-facing [`DebateSession`]
//!
//! # Usage
//!
//! ```no_run
//! # async fn run() -> debate_core::DebateResult<()> {
//! use debate_core::{ClientConfig, DebateSession, Persona, SessionParams};
//!
//! let mut session = DebateSession::over_sse(ClientConfig::default());
//! session.start(SessionParams::new(
//!     "Should cities ban cars?",
//!     Persona::Futurist,
//!     Persona::Humanist,
//!     6,
//! )?)?;
//! let phase = session.drive().await;
//! println!("{phase}: {} turns", session.transcript().len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod params;
pub mod persona;
pub mod session;
pub mod side;
pub mod stream;
pub mod transcript;
pub mod verdict;

pub use config::ClientConfig;
pub use error::{DebateError, DebateResult, ErrorScope};
pub use export::{DebateLog, ExportError};
pub use params::SessionParams;
pub use persona::Persona;
pub use session::{Applied, DebateSession, SessionPhase, SessionSnapshot, SessionState};
pub use side::{PerSide, Side};
pub use stream::{Delivery, Epoch, MemoryTransport, SseTransport, StreamEvent, Transport};
pub use transcript::{Transcript, Utterance, UtteranceId};
pub use verdict::{resolve, NormalizedVerdict, RawVerdictPayload, ScoreCard};
