//! Stream connection layer.
//!
//! A connection pumps raw frame data from a [`FrameSource`], decodes and
//! classifies each frame, and forwards the survivors as [`Delivery`] values
//! tagged with the owning session's [`Epoch`]:
//!
//! ```text
//! Transport::connect ──▶ FrameSource ──▶ decode_frame ──▶ Delivery{epoch, event} ──▶ session
//!                                             │
//!                                             └─ malformed / unknown type: logged, dropped
//! ```

pub mod connection;
pub mod frame;
pub mod memory;
pub mod sse;

use std::fmt;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{DebateError, DebateResult};
use crate::side::Side;
use crate::verdict::RawVerdictPayload;

pub use connection::ConnectionHandle;
pub use frame::{decode_frame, Frame, TERMINATION_SENTINEL};
pub use memory::{MemoryFeed, MemoryTransport};
pub use sse::SseTransport;

/// Identity of one session's connection. Later sessions get larger epochs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Epoch(pub u64);

impl Epoch {
    /// Epoch of the session started after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event forwarded from a connection to its session.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Utterance { speaker: Side, text: String },
    Judgment(RawVerdictPayload),
    /// Termination sentinel received.
    Finished,
    /// Transport failed; the connection is closed.
    Failed(DebateError),
}

impl StreamEvent {
    /// No further events follow a terminal one on the same connection.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed(_))
    }
}

/// A stream event stamped with the epoch of the connection that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub epoch: Epoch,
    pub event: StreamEvent,
}

pub type DeliverySender = mpsc::UnboundedSender<Delivery>;
pub type DeliveryReceiver = mpsc::UnboundedReceiver<Delivery>;

/// Raw frame data from one open connection.
#[async_trait]
pub trait FrameSource: Send {
    /// Next frame's data. `None` means the transport ended the stream.
    async fn next_frame(&mut self) -> Option<DebateResult<String>>;

    /// Release the underlying connection. Must be idempotent.
    fn close(&mut self);
}

/// Opens frame sources. One call per session.
pub trait Transport: Send + Sync {
    fn connect(&self, url: &Url) -> DebateResult<Box<dyn FrameSource>>;
}
