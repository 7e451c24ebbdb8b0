use std::path::PathBuf;

use clap::Parser;
use debate_core::{ClientConfig, DebateError, Persona};

/// Follow a live debate stream and print the judge's verdict.
#[derive(Debug, Parser)]
#[command(name = "debate-cli", version)]
pub struct Args {
    /// Motion to debate.
    #[arg(short, long, required_unless_present = "list_personas")]
    pub topic: Option<String>,

    /// Persona for Side A.
    #[arg(long, default_value = "Default", value_parser = parse_persona)]
    pub agent_a: Persona,

    /// Persona for Side B.
    #[arg(long, default_value = "Default", value_parser = parse_persona)]
    pub agent_b: Persona,

    /// Number of rounds (even, 4-16).
    #[arg(short, long, default_value_t = 6)]
    pub rounds: u32,

    /// Producer base URL [env: DEBATE_SERVER_URL].
    #[arg(long)]
    pub server: Option<String>,

    /// Directory for the debate log [env: DEBATE_LOG_DIR].
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Do not write a debate log.
    #[arg(long)]
    pub no_log: bool,

    /// Print the final session snapshot as JSON instead of the verdict block.
    #[arg(long)]
    pub json: bool,

    /// List available personas and exit.
    #[arg(long)]
    pub list_personas: bool,
}

impl Args {
    /// Environment defaults with command-line overrides applied.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        config
    }
}

fn parse_persona(raw: &str) -> Result<Persona, String> {
    raw.parse().map_err(|e: DebateError| e.to_string())
}
