//! Per-connection pump task.
//!
//! Reads frames from a [`FrameSource`] until a terminal frame, a transport
//! error, or cancellation by the owning session.

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::frame::{decode_frame, Frame};
use super::{Delivery, DeliverySender, Epoch, FrameSource, StreamEvent};
use crate::error::{DebateError, DebateResult};

/// Owner's handle on one running connection.
///
/// Dropping or closing the handle cancels the connection task. Close is
/// fire-and-forget: events already queued by the task may still arrive and
/// must be filtered by epoch on the receiving side.
#[derive(Debug)]
pub struct ConnectionHandle {
    epoch: Epoch,
    cancel: CancellationToken,
}

impl ConnectionHandle {
    /// Start pumping `source` on the current tokio runtime.
    pub fn spawn(epoch: Epoch, source: Box<dyn FrameSource>, tx: DeliverySender) -> Self {
        let cancel = CancellationToken::new();
        tokio::spawn(pump(epoch, source, tx, cancel.clone()));
        Self { epoch, cancel }
    }

    /// Epoch of the session this connection was opened for.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Ask the task to stop. Does not wait for it.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

enum Step {
    Cancelled,
    Frame(Option<DebateResult<String>>),
}

async fn pump(
    epoch: Epoch,
    mut source: Box<dyn FrameSource>,
    tx: DeliverySender,
    cancel: CancellationToken,
) {
    let mut forwarded = 0u64;
    let mut discarded = 0u64;

    loop {
        let step = tokio::select! {
            biased;
            _ = cancel.cancelled() => Step::Cancelled,
            next = source.next_frame() => Step::Frame(next),
        };

        let event = match step {
            Step::Cancelled => {
                source.close();
                debug!(%epoch, forwarded, discarded, "Connection closed by owner");
                return;
            }
            Step::Frame(Some(Ok(data))) => match decode_frame(&data) {
                Ok(Frame::Message { speaker, text }) => StreamEvent::Utterance { speaker, text },
                Ok(Frame::Verdict(payload)) => StreamEvent::Judgment(payload),
                Ok(Frame::Done) => {
                    source.close();
                    StreamEvent::Finished
                }
                Err(err) if err.is_recoverable() => {
                    discarded += 1;
                    warn!(%epoch, scope = %err.scope(), error = %err, "Discarding frame");
                    continue;
                }
                Err(err) => {
                    source.close();
                    StreamEvent::Failed(err)
                }
            },
            Step::Frame(Some(Err(err))) => {
                source.close();
                StreamEvent::Failed(err)
            }
            Step::Frame(None) => {
                source.close();
                StreamEvent::Failed(DebateError::transport(
                    "stream ended before termination sentinel",
                ))
            }
        };

        let terminal = event.is_terminal();
        if tx.send(Delivery { epoch, event }).is_err() {
            source.close();
            debug!(%epoch, "Session receiver dropped, closing connection");
            return;
        }
        forwarded += 1;

        if terminal {
            debug!(%epoch, forwarded, discarded, "Connection reached terminal frame");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::side::Side;
    use crate::stream::memory::MemoryTransport;
    use crate::stream::Transport;
    use reqwest::Url;
    use serde_json::json;
    use tokio::sync::mpsc;

    fn url() -> Url {
        Url::parse("http://producer.test/start_debate").unwrap()
    }

    async fn collect_until_terminal(rx: &mut mpsc::UnboundedReceiver<Delivery>) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(delivery) = rx.recv().await {
            let terminal = delivery.event.is_terminal();
            events.push(delivery.event);
            if terminal {
                break;
            }
        }
        events
    }

    #[tokio::test]
    async fn forwards_valid_frames_and_skips_noise() {
        let transport = MemoryTransport::new();
        let source = transport.connect(&url()).unwrap();
        let feed = transport.latest_feed().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::spawn(Epoch(1), source, tx);

        feed.push(r#"{"type":"message","sender":"Agent A","content":"one"}"#);
        feed.push("garbage");
        feed.push(r#"{"type":"typing","sender":"Agent B"}"#);
        feed.push(json!({"type": "verdict", "winner": {}}).to_string());
        feed.push("[DONE]");
        feed.push(r#"{"type":"message","sender":"Agent A","content":"after done"}"#);

        let events = collect_until_terminal(&mut rx).await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Utterance {
                    speaker: Side::A,
                    text: "one".into()
                },
                StreamEvent::Judgment(json!({"type": "verdict", "winner": {}})),
                StreamEvent::Finished,
            ]
        );
        assert_eq!(handle.epoch(), Epoch(1));
        assert!(feed.wait_closed().await);
    }

    #[tokio::test]
    async fn transport_error_fails_the_connection() {
        let transport = MemoryTransport::new();
        let source = transport.connect(&url()).unwrap();
        let feed = transport.latest_feed().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = ConnectionHandle::spawn(Epoch(3), source, tx);

        feed.fail("connection reset by peer");

        let delivery = rx.recv().await.unwrap();
        assert_eq!(delivery.epoch, Epoch(3));
        assert_eq!(
            delivery.event,
            StreamEvent::Failed(DebateError::transport("connection reset by peer"))
        );
        assert!(feed.wait_closed().await);
    }

    #[tokio::test]
    async fn recoverable_frames_are_dropped_before_a_failure() {
        let transport = MemoryTransport::new();
        let source = transport.connect(&url()).unwrap();
        let feed = transport.latest_feed().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = ConnectionHandle::spawn(Epoch(2), source, tx);

        feed.push(r#"{"type":"heartbeat"}"#);
        feed.push(r#"{"type":"message","sender":"Side C","content":"?"}"#);
        feed.push("{");
        feed.fail("upstream closed");

        let events = collect_until_terminal(&mut rx).await;
        assert_eq!(
            events,
            vec![StreamEvent::Failed(DebateError::transport("upstream closed"))]
        );
    }

    #[tokio::test]
    async fn end_of_stream_without_sentinel_is_a_failure() {
        let transport = MemoryTransport::new();
        let source = transport.connect(&url()).unwrap();
        let feed = transport.latest_feed().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = ConnectionHandle::spawn(Epoch(1), source, tx);

        feed.hang_up();

        let delivery = rx.recv().await.unwrap();
        assert!(matches!(
            delivery.event,
            StreamEvent::Failed(DebateError::TransportFailure(_))
        ));
    }

    #[tokio::test]
    async fn close_cancels_a_waiting_connection() {
        let transport = MemoryTransport::new();
        let source = transport.connect(&url()).unwrap();
        let feed = transport.latest_feed().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = ConnectionHandle::spawn(Epoch(1), source, tx);

        handle.close();
        assert!(feed.wait_closed().await);
        feed.push(r#"{"type":"message","sender":"Side A","content":"late"}"#);
        drop(handle);

        assert!(rx.recv().await.is_none());
    }
}
