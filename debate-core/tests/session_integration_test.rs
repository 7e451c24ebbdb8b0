//! End-to-end session tests over the in-memory transport.
//!
//! Each test drives real connection tasks; only the network is replaced.

use std::sync::Arc;

use debate_core::stream::MemoryFeed;
use debate_core::{
    Applied, ClientConfig, DebateSession, MemoryTransport, Persona, SessionParams, SessionPhase,
    Side,
};
use serde_json::json;

fn new_session() -> (DebateSession, MemoryTransport) {
    let transport = MemoryTransport::new();
    let config = ClientConfig::with_server("http://producer.test");
    (
        DebateSession::new(config, Arc::new(transport.clone())),
        transport,
    )
}

fn params(topic: &str) -> SessionParams {
    SessionParams::new(topic, Persona::DataScientist, Persona::Debunker, 4).unwrap()
}

fn message(sender: &str, content: &str) -> String {
    json!({"type": "message", "sender": sender, "content": content}).to_string()
}

fn texts(session: &DebateSession) -> Vec<(Side, String)> {
    session
        .transcript()
        .utterances()
        .iter()
        .map(|u| (u.speaker, u.text.clone()))
        .collect()
}

async fn let_connections_run() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

// ── Full run ───────────────────────────────────────────────────────

#[tokio::test]
async fn full_debate_produces_transcript_and_verdict() {
    let (mut session, transport) = new_session();
    session.start(params("Nuclear power")).unwrap();
    let feed = transport.latest_feed().unwrap();

    feed.push(message("Agent A", "Baseload matters."));
    feed.push(message("Agent B", "| cost | high |"));
    feed.push(
        json!({
            "type": "verdict",
            "winner": {
                "winner": "Agent B",
                "summary": "B won on cost.",
                "rationale": "Better data.",
                "conclusion": "Side B takes it.",
                "scores": {
                    "Agent A": {"logic": 70, "persuasion": 60, "aggression": 20},
                    "Agent B": {"logic": 85, "persuasion": 80, "aggression": 35}
                },
                "key_points": {"Agent A": ["baseload"], "Agent B": ["cost", "time"]},
                "strengths": {"Agent B": ["tables"]},
                "weaknesses": {"Agent A": ["no numbers"]}
            }
        })
        .to_string(),
    );
    feed.push("[DONE]");

    let phase = session.drive().await;

    assert_eq!(phase, SessionPhase::Finished);
    assert_eq!(
        texts(&session),
        vec![
            (Side::A, "Baseload matters.".to_string()),
            (Side::B, "| cost | high |".to_string()),
        ]
    );
    let verdict = session.verdict().unwrap();
    assert_eq!(verdict.winning_side, Side::B);
    assert_eq!(verdict.score(Side::B).final_score(), 83);
    assert_eq!(verdict.key_points.side_b, ["cost", "time"]);
    assert!(verdict.strengths.side_a.is_empty());
    assert!(feed.wait_closed().await);
    assert!(!session.has_open_connection());
}

// ── Frame-level noise ──────────────────────────────────────────────

#[tokio::test]
async fn malformed_frames_do_not_disturb_the_transcript() {
    let (mut session, transport) = new_session();
    session.start(params("Noise")).unwrap();
    let feed = transport.latest_feed().unwrap();

    feed.push(message("Agent A", "one"));
    feed.push("{not json");
    feed.push(json!({"type": "status", "text": "thinking"}).to_string());
    feed.push(message("Agent B", "two"));
    feed.push(json!({"type": "message", "sender": "Agent B"}).to_string());
    feed.push("");
    feed.push(json!({"type": "message", "sender": "Narrator", "content": "x"}).to_string());
    feed.push(message("Agent A", "three"));
    feed.push("[DONE]");

    assert_eq!(session.drive().await, SessionPhase::Finished);
    assert_eq!(
        texts(&session),
        vec![
            (Side::A, "one".to_string()),
            (Side::B, "two".to_string()),
            (Side::A, "three".to_string()),
        ]
    );
}

#[tokio::test]
async fn unresolvable_judgment_is_not_a_session_error() {
    let (mut session, transport) = new_session();
    session.start(params("Empty judge")).unwrap();
    let feed = transport.latest_feed().unwrap();

    feed.push(json!({"type": "verdict", "winner": "Agent A"}).to_string());
    feed.push("[DONE]");

    let mut rejected = 0;
    let phase = session
        .drive_with(|_, applied| {
            if *applied == Applied::VerdictRejected {
                rejected += 1;
            }
        })
        .await;

    assert_eq!(phase, SessionPhase::Finished);
    assert_eq!(rejected, 1);
    assert!(session.verdict().is_none());
}

// ── Terminal scenarios ─────────────────────────────────────────────

#[tokio::test]
async fn sentinel_before_judgment_finishes_without_verdict() {
    let (mut session, transport) = new_session();
    session.start(params("Short")).unwrap();
    let feed = transport.latest_feed().unwrap();

    feed.push(message("Agent A", "only turn"));
    feed.push("[DONE]");

    assert_eq!(session.drive().await, SessionPhase::Finished);
    assert!(session.verdict().is_none());
    assert_eq!(session.transcript().len(), 1);
}

#[tokio::test]
async fn transport_failure_keeps_received_utterances() {
    let (mut session, transport) = new_session();
    session.start(params("Flaky")).unwrap();
    let feed = transport.latest_feed().unwrap();

    feed.push(message("Agent A", "1"));
    feed.push(message("Agent B", "2"));
    feed.push(message("Agent A", "3"));
    feed.fail("connection reset");

    assert_eq!(session.drive().await, SessionPhase::Error);
    assert_eq!(session.transcript().len(), 3);
    assert!(session.verdict().is_none());
    assert!(feed.wait_closed().await);
}

#[tokio::test]
async fn server_hang_up_without_sentinel_is_an_error() {
    let (mut session, transport) = new_session();
    session.start(params("Hang up")).unwrap();
    let feed = transport.latest_feed().unwrap();

    feed.push(message("Agent A", "1"));
    feed.hang_up();

    assert_eq!(session.drive().await, SessionPhase::Error);
    assert_eq!(session.transcript().len(), 1);
}

// ── Supersession ───────────────────────────────────────────────────

#[tokio::test]
async fn new_session_discards_frames_from_the_old_connection() {
    let (mut session, transport) = new_session();
    let first = session.start(params("First")).unwrap();
    let old: MemoryFeed = transport.latest_feed().unwrap();

    // Delivered to the session channel but not yet applied.
    old.push(message("Agent A", "old one"));
    let_connections_run().await;

    let second = session.start(params("Second")).unwrap();
    assert!(second > first);
    assert!(old.wait_closed().await);
    assert!(!old.push(message("Agent B", "old two")));

    let current = transport.latest_feed().unwrap();
    assert_eq!(transport.connection_count(), 2);
    current.push(message("Agent B", "new one"));
    current.push("[DONE]");

    assert_eq!(session.drive().await, SessionPhase::Finished);
    assert_eq!(texts(&session), vec![(Side::B, "new one".to_string())]);
    assert_eq!(session.epoch(), second);
    assert_eq!(session.snapshot().topic.as_deref(), Some("Second"));
}

#[tokio::test]
async fn restart_after_finish_starts_clean() {
    let (mut session, transport) = new_session();
    session.start(params("Round one")).unwrap();
    let feed = transport.latest_feed().unwrap();
    feed.push(message("Agent A", "a"));
    feed.push(json!({"type": "verdict", "scores": {"Agent A": {}}, "rationale": "r"}).to_string());
    feed.push("[DONE]");
    assert_eq!(session.drive().await, SessionPhase::Finished);
    assert!(session.verdict().is_some());

    session.start(params("Round two")).unwrap();
    assert_eq!(session.phase(), SessionPhase::Active);
    assert!(session.transcript().is_empty());
    assert!(session.verdict().is_none());

    let transitions: Vec<(SessionPhase, SessionPhase)> = session
        .transitions()
        .iter()
        .map(|t| (t.from, t.to))
        .collect();
    assert_eq!(
        transitions,
        vec![
            (SessionPhase::Idle, SessionPhase::Active),
            (SessionPhase::Active, SessionPhase::Finished),
            (SessionPhase::Finished, SessionPhase::Active),
        ]
    );
}
