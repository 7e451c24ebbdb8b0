//! Session state machine: the outward-facing control surface.
//!
//! A [`DebateSession`] owns at most one live connection. Connection tasks
//! push epoch-stamped deliveries into a single channel; the session applies
//! them one at a time on the caller's task and drops anything stamped with
//! an epoch other than the current one.

pub mod phase;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{DebateError, DebateResult};
use crate::params::SessionParams;
use crate::stream::{
    ConnectionHandle, Delivery, DeliveryReceiver, DeliverySender, Epoch, SseTransport,
    StreamEvent, Transport,
};
use crate::transcript::{Transcript, Utterance, UtteranceId};
use crate::verdict::{self, NormalizedVerdict};

pub use phase::{IllegalTransition, PhaseMachine, SessionPhase, TransitionRecord};

/// Data belonging to the current (or most recent) session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Random id for log correlation; `None` before the first start.
    pub session_id: Option<Uuid>,
    pub epoch: Epoch,
    pub params: Option<SessionParams>,
    pub transcript: Transcript,
    pub verdict: Option<NormalizedVerdict>,
    /// Accepted or not, how many judgment events arrived.
    pub judgments_seen: u32,
}

impl SessionState {
    fn started(epoch: Epoch, params: SessionParams) -> Self {
        Self {
            session_id: Some(Uuid::new_v4()),
            epoch,
            params: Some(params),
            ..Self::default()
        }
    }
}

/// What applying one delivery did.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// From a superseded connection, or after the session ended.
    Ignored,
    Utterance(UtteranceId),
    /// A verdict was stored; `replaced` is set when it overwrote an earlier one.
    Verdict { replaced: bool },
    /// The judgment event held no recognisable verdict.
    VerdictRejected,
    Finished,
    Failed(DebateError),
}

/// Read-only view handed to collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Option<Uuid>,
    pub epoch: Epoch,
    pub phase: SessionPhase,
    pub topic: Option<String>,
    pub transcript: Vec<Utterance>,
    pub verdict: Option<NormalizedVerdict>,
}

/// Owner of the session lifecycle.
pub struct DebateSession {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    machine: PhaseMachine,
    state: SessionState,
    connection: Option<ConnectionHandle>,
    tx: DeliverySender,
    rx: DeliveryReceiver,
}

impl DebateSession {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            config,
            transport,
            machine: PhaseMachine::new(),
            state: SessionState::default(),
            connection: None,
            tx,
            rx,
        }
    }

    /// Session talking server-sent events to `config.server_url`.
    pub fn over_sse(config: ClientConfig) -> Self {
        Self::new(config, Arc::new(SseTransport::new()))
    }

    /// Get the current phase.
    pub fn phase(&self) -> SessionPhase {
        self.machine.current()
    }

    /// Epoch of the current (or most recent) session.
    pub fn epoch(&self) -> Epoch {
        self.state.epoch
    }

    /// Utterances received so far.
    pub fn transcript(&self) -> &Transcript {
        &self.state.transcript
    }

    /// Latest resolved verdict, if any.
    pub fn verdict(&self) -> Option<&NormalizedVerdict> {
        self.state.verdict.as_ref()
    }

    /// Get the full session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Get the full transition log.
    pub fn transitions(&self) -> &[TransitionRecord] {
        self.machine.transitions()
    }

    /// Whether a connection task is still attached.
    pub fn has_open_connection(&self) -> bool {
        self.connection.is_some()
    }

    /// Owned copy of everything a consumer renders.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.state.session_id,
            epoch: self.state.epoch,
            phase: self.phase(),
            topic: self.state.params.as_ref().map(|p| p.topic.clone()),
            transcript: self.state.transcript.utterances().to_vec(),
            verdict: self.state.verdict.clone(),
        }
    }

    /// Start a new session, superseding any running one.
    ///
    /// Invalid parameters are rejected without touching the current session.
    /// Must be called inside a tokio runtime.
    pub fn start(&mut self, params: SessionParams) -> DebateResult<Epoch> {
        params.validate()?;
        let url = self.config.stream_url(&params)?;

        if let Some(previous) = self.connection.take() {
            info!(epoch = %previous.epoch(), "Superseding open connection");
            previous.close();
        }

        let epoch = self.state.epoch.next();
        self.state = SessionState::started(epoch, params);
        self.transition(SessionPhase::Active, "session started");
        info!(
            %epoch,
            session_id = ?self.state.session_id,
            url = %url,
            "Debate session started"
        );

        match self.transport.connect(&url) {
            Ok(source) => {
                self.connection = Some(ConnectionHandle::spawn(epoch, source, self.tx.clone()));
                Ok(epoch)
            }
            Err(err) => {
                warn!(%epoch, error = %err, "Could not open debate stream");
                self.transition(SessionPhase::Error, &err.to_string());
                Err(err)
            }
        }
    }

    /// Apply one delivery to the session state.
    pub fn apply(&mut self, delivery: Delivery) -> Applied {
        if delivery.epoch != self.state.epoch {
            debug!(
                delivered = %delivery.epoch,
                current = %self.state.epoch,
                "Dropping delivery from superseded connection"
            );
            return Applied::Ignored;
        }
        if self.phase() != SessionPhase::Active {
            debug!(epoch = %delivery.epoch, phase = %self.phase(), "Dropping delivery after session end");
            return Applied::Ignored;
        }

        match delivery.event {
            StreamEvent::Utterance { speaker, text } => {
                Applied::Utterance(self.state.transcript.append(speaker, text))
            }
            StreamEvent::Judgment(payload) => self.accept_judgment(&payload),
            StreamEvent::Finished => {
                self.connection = None;
                self.transition(SessionPhase::Finished, "termination sentinel");
                info!(
                    epoch = %self.state.epoch,
                    utterances = self.state.transcript.len(),
                    has_verdict = self.state.verdict.is_some(),
                    "Debate session finished"
                );
                Applied::Finished
            }
            StreamEvent::Failed(err) => {
                self.connection = None;
                self.transition(SessionPhase::Error, &err.to_string());
                warn!(
                    epoch = %self.state.epoch,
                    error = %err,
                    utterances = self.state.transcript.len(),
                    "Debate session failed"
                );
                Applied::Failed(err)
            }
        }
    }

    /// Process deliveries until the session leaves `active`.
    pub async fn drive(&mut self) -> SessionPhase {
        self.drive_with(|_, _| {}).await
    }

    /// Like [`drive`](Self::drive), calling `observe` after every applied delivery.
    pub async fn drive_with<F>(&mut self, mut observe: F) -> SessionPhase
    where
        F: FnMut(&Self, &Applied),
    {
        while self.phase() == SessionPhase::Active {
            let Some(delivery) = self.rx.recv().await else {
                break;
            };
            let applied = self.apply(delivery);
            if applied != Applied::Ignored {
                observe(&*self, &applied);
            }
        }
        self.phase()
    }

    fn accept_judgment(&mut self, payload: &verdict::RawVerdictPayload) -> Applied {
        self.state.judgments_seen += 1;
        match verdict::resolve(payload) {
            Ok(resolved) => {
                let replaced = self.state.verdict.is_some();
                if replaced {
                    warn!(
                        epoch = %self.state.epoch,
                        judgments = self.state.judgments_seen,
                        "Unexpected additional judgment event, replacing verdict"
                    );
                }
                info!(epoch = %self.state.epoch, winner = %resolved.winning_side, "Verdict resolved");
                self.state.verdict = Some(resolved);
                Applied::Verdict { replaced }
            }
            Err(err) => {
                warn!(
                    epoch = %self.state.epoch,
                    scope = %err.scope(),
                    error = %err,
                    "Ignoring judgment event"
                );
                Applied::VerdictRejected
            }
        }
    }

    fn transition(&mut self, to: SessionPhase, reason: &str) {
        if let Err(err) = self.machine.advance(to, self.state.epoch, Some(reason)) {
            warn!(error = %err, "Rejected phase transition");
            return;
        }
        if to.is_terminal() {
            info!(epoch = %self.state.epoch, history = %self.machine.summary(), "Session ended");
        }
    }
}

impl Drop for DebateSession {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
    }
}
