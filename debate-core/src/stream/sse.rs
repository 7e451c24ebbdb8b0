//! Server-sent events transport backed by `reqwest-eventsource`.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use reqwest_eventsource::{retry, Error as SseError, Event, EventSource};
use tracing::{debug, info};

use super::{FrameSource, Transport};
use crate::error::{DebateError, DebateResult};

/// Opens one `text/event-stream` GET per session. Never reconnects.
#[derive(Debug, Clone, Default)]
pub struct SseTransport {
    client: Client,
}

impl SseTransport {
    /// Transport with a default `reqwest` client.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for SseTransport {
    fn connect(&self, url: &Url) -> DebateResult<Box<dyn FrameSource>> {
        let request = self
            .client
            .get(url.clone())
            .header(ACCEPT, "text/event-stream");
        let mut inner = EventSource::new(request)
            .map_err(|e| DebateError::transport(format!("cannot open stream {url}: {e}")))?;
        inner.set_retry_policy(Box::new(retry::Never));

        info!(url = %url, "Opening debate stream");
        Ok(Box::new(SseFrameSource {
            inner,
            url: url.clone(),
            closed: false,
        }))
    }
}

struct SseFrameSource {
    inner: EventSource,
    url: Url,
    closed: bool,
}

#[async_trait]
impl FrameSource for SseFrameSource {
    async fn next_frame(&mut self) -> Option<DebateResult<String>> {
        if self.closed {
            return None;
        }
        loop {
            match self.inner.next().await {
                Some(Ok(Event::Open)) => {
                    debug!(url = %self.url, "Debate stream open");
                }
                Some(Ok(Event::Message(message))) => return Some(Ok(message.data)),
                Some(Err(SseError::StreamEnded)) | None => return None,
                Some(Err(err)) => {
                    return Some(Err(DebateError::transport(format!(
                        "stream error from {}: {err}",
                        self.url
                    ))))
                }
            }
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.inner.close();
            self.closed = true;
            debug!(url = %self.url, "Debate stream closed");
        }
    }
}
