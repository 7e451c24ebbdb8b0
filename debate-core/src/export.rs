//! Debate log export: one JSON file per finished debate.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::session::SessionSnapshot;
use crate::side::Side;
use crate::verdict::NormalizedVerdict;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export: {0}")]
    Incomplete(&'static str),

    #[error("failed to serialize debate log: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedMessage {
    pub sender: Side,
    pub content: String,
}

/// Serialized record of one completed debate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateLog {
    pub topic: String,
    /// Local time, `YYYYmmdd_HHMMSS`.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    pub winner: NormalizedVerdict,
    pub messages: Vec<LoggedMessage>,
}

impl DebateLog {
    /// Build from a snapshot. Sessions without a topic or verdict have nothing worth saving.
    pub fn from_snapshot(
        snapshot: &SessionSnapshot,
        at: DateTime<Local>,
    ) -> Result<Self, ExportError> {
        let topic = snapshot
            .topic
            .clone()
            .ok_or(ExportError::Incomplete("session never started"))?;
        let winner = snapshot
            .verdict
            .clone()
            .ok_or(ExportError::Incomplete("no verdict"))?;
        Ok(Self {
            topic,
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            session_id: snapshot.session_id,
            winner,
            messages: snapshot
                .transcript
                .iter()
                .map(|u| LoggedMessage {
                    sender: u.speaker,
                    content: u.text.clone(),
                })
                .collect(),
        })
    }

    pub fn file_name(&self) -> String {
        format!("debate_log_{}.json", self.timestamp)
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write into `dir`, creating it if needed. Returns the file path.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir).map_err(|source| ExportError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.to_json()?).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), messages = self.messages.len(), "Debate log saved");
        Ok(path)
    }
}
