use std::path::PathBuf;

use reqwest::Url;

use crate::error::{DebateError, DebateResult};
use crate::params::SessionParams;

pub const ENV_SERVER_URL: &str = "DEBATE_SERVER_URL";
pub const ENV_STREAM_PATH: &str = "DEBATE_STREAM_PATH";
pub const ENV_LOG_DIR: &str = "DEBATE_LOG_DIR";

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_STREAM_PATH: &str = "/start_debate";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Where the producer lives and where finished debates are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the debate producer.
    pub server_url: String,
    /// Path of the server-push endpoint, appended to `server_url`.
    pub stream_path: String,
    /// Directory for exported debate logs.
    pub log_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: std::env::var(ENV_SERVER_URL).unwrap_or_else(|_| DEFAULT_SERVER_URL.into()),
            stream_path: std::env::var(ENV_STREAM_PATH)
                .unwrap_or_else(|_| DEFAULT_STREAM_PATH.into()),
            log_dir: std::env::var(ENV_LOG_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR)),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `server_url`, everything else from the environment.
    pub fn with_server(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Build the stream URL for one session. Query values are URL-encoded.
    pub fn stream_url(&self, params: &SessionParams) -> DebateResult<Url> {
        let base = format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            self.stream_path.trim_start_matches('/')
        );
        Url::parse_with_params(&base, params.query_pairs()).map_err(|e| {
            DebateError::invalid_params(format!("invalid server url {base:?}: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::Persona;

    fn config() -> ClientConfig {
        ClientConfig {
            server_url: "http://debate.local:8000/".into(),
            stream_path: "start_debate".into(),
            log_dir: PathBuf::from("logs"),
        }
    }

    #[test]
    fn stream_url_carries_all_parameters_encoded() {
        let params =
            SessionParams::new("Is AI art, art?", Persona::Debunker, Persona::Default, 6).unwrap();
        let url = config().stream_url(&params).unwrap();

        assert_eq!(url.path(), "/start_debate");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("topic".to_string(), "Is AI art, art?".to_string()),
                ("agent_a".to_string(), "The Debunker".to_string()),
                ("agent_b".to_string(), "Default".to_string()),
                ("rounds".to_string(), "6".to_string()),
            ]
        );
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn unparseable_server_url_is_rejected() {
        let params = SessionParams::new("topic", Persona::Default, Persona::Default, 4).unwrap();
        let cfg = ClientConfig {
            server_url: "not a url".into(),
            ..config()
        };
        let err = cfg.stream_url(&params).unwrap_err();
        assert!(matches!(err, DebateError::InvalidStartParameters(_)));
    }
}
