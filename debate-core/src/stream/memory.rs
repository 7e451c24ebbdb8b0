//! In-process transport for tests and offline replay.
//!
//! Every `connect` creates a fresh feed; the caller pushes frame data into it
//! and observes when the connection side closes it.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Url;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{FrameSource, Transport};
use crate::error::{DebateError, DebateResult};

#[derive(Debug)]
enum FeedItem {
    Data(String),
    Error(String),
    HangUp,
}

/// Producer end of one in-memory connection.
#[derive(Debug, Clone)]
pub struct MemoryFeed {
    url: Url,
    tx: mpsc::UnboundedSender<FeedItem>,
    closed: CancellationToken,
}

impl MemoryFeed {
    /// URL the connection was opened with.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Push one frame's data. Returns `false` once the connection is gone.
    pub fn push(&self, data: impl Into<String>) -> bool {
        self.send(FeedItem::Data(data.into()))
    }

    /// Simulate a transport error.
    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.send(FeedItem::Error(reason.into()))
    }

    /// Simulate the server closing the stream.
    pub fn hang_up(&self) -> bool {
        self.send(FeedItem::HangUp)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Resolve once the consuming side has closed the connection.
    pub async fn wait_closed(&self) -> bool {
        self.closed.cancelled().await;
        true
    }

    fn send(&self, item: FeedItem) -> bool {
        !self.is_closed() && self.tx.send(item).is_ok()
    }
}

struct MemorySource {
    rx: mpsc::UnboundedReceiver<FeedItem>,
    closed: CancellationToken,
}

#[async_trait]
impl FrameSource for MemorySource {
    async fn next_frame(&mut self) -> Option<DebateResult<String>> {
        match self.rx.recv().await {
            Some(FeedItem::Data(data)) => Some(Ok(data)),
            Some(FeedItem::Error(reason)) => Some(Err(DebateError::transport(reason))),
            Some(FeedItem::HangUp) | None => None,
        }
    }

    fn close(&mut self) {
        self.rx.close();
        self.closed.cancel();
    }
}

impl Drop for MemorySource {
    fn drop(&mut self) {
        self.closed.cancel();
    }
}

#[derive(Default)]
struct MemoryState {
    feeds: Vec<MemoryFeed>,
    refuse_with: Option<String>,
}

/// Transport whose connections are fed by the test.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `connect` calls fail with `reason`.
    pub fn refuse_connections(&self, reason: impl Into<String>) {
        self.lock().refuse_with = Some(reason.into());
    }

    /// Feed of the most recently opened connection.
    pub fn latest_feed(&self) -> Option<MemoryFeed> {
        self.lock().feeds.last().cloned()
    }

    /// Number of `connect` calls that succeeded.
    pub fn connection_count(&self) -> usize {
        self.lock().feeds.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for MemoryTransport {
    fn connect(&self, url: &Url) -> DebateResult<Box<dyn FrameSource>> {
        let mut state = self.lock();
        if let Some(reason) = &state.refuse_with {
            return Err(DebateError::transport(reason.clone()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let closed = CancellationToken::new();
        state.feeds.push(MemoryFeed {
            url: url.clone(),
            tx,
            closed: closed.clone(),
        });
        Ok(Box::new(MemorySource { rx, closed }))
    }
}
