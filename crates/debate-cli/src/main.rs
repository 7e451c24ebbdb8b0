mod cli;
mod render;

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use debate_core::{DebateLog, DebateSession, SessionParams, SessionPhase};
use tracing::{info, warn};

use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.list_personas {
        render::personas();
        return Ok(ExitCode::SUCCESS);
    }

    let topic = args.topic.clone().context("--topic is required")?;
    let params = SessionParams::new(topic, args.agent_a, args.agent_b, args.rounds)
        .context("Invalid debate parameters")?;
    let config = args.client_config();
    info!(
        server = %config.server_url,
        topic = %params.topic,
        agent_a = %params.side_a,
        agent_b = %params.side_b,
        rounds = params.rounds,
        "Debate client starting"
    );

    let mut session = DebateSession::over_sse(config.clone());
    session
        .start(params)
        .context("Failed to open debate stream")?;

    let quiet = args.json;
    let phase = tokio::select! {
        phase = session.drive_with(|session, applied| {
            if !quiet {
                render::on_update(session, applied);
            }
        }) => phase,
        _ = tokio::signal::ctrl_c() => {
            warn!("Debate interrupted by user");
            return Ok(ExitCode::from(130));
        }
    };

    let snapshot = session.snapshot();
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize session")?
        );
    }

    match phase {
        SessionPhase::Finished if snapshot.verdict.is_none() => {
            warn!("Stream finished without a readable verdict");
        }
        SessionPhase::Error => {
            warn!(
                utterances = snapshot.transcript.len(),
                "Debate stream failed; start a new session to retry"
            );
        }
        _ => {}
    }

    if !args.no_log {
        match DebateLog::from_snapshot(&snapshot, Local::now()) {
            Ok(log) => {
                log.write_to_dir(&config.log_dir)
                    .context("Failed to save debate log")?;
            }
            Err(e) => warn!("Debate log not saved: {e}"),
        }
    }

    Ok(if phase == SessionPhase::Finished {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
