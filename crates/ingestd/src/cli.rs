use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use f1_ingest_packets::DEFAULT_PORT;
use f1_ingest_pipeline::Mode;

/// `yes` / `no` switch, spelled the way the sink toggles are documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    Yes,
    No,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::Yes
    }
}

#[derive(Debug, Parser)]
#[command(name = "f1-ingestd")]
#[command(about = "Forward F1 2022 UDP telemetry to Splunk HEC and Splunk Observability")]
#[command(version)]
pub struct Cli {
    /// Host label on events and metrics
    #[arg(long, env = "F1_INGEST_HOSTNAME", default_value = "host_1")]
    pub hostname: String,

    /// Name stamped on records in solo mode
    #[arg(long, env = "F1_INGEST_PLAYER", default_value = "Drivey McDriverface")]
    pub player: String,

    /// UDP port the game sends to
    #[arg(long, env = "F1_INGEST_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Send gauges to Splunk Observability
    #[arg(long, value_enum, env = "F1_INGEST_O11Y", default_value = "no")]
    pub o11y: Toggle,

    /// Send events to Splunk HEC
    #[arg(long, value_enum, env = "F1_INGEST_SPLUNK", default_value = "yes")]
    pub splunk: Toggle,

    /// spectator forwards every car, solo only the player's
    #[arg(long, env = "F1_INGEST_MODE", default_value = "spectator")]
    pub mode: Mode,

    /// Settings file (YAML)
    #[arg(long, env = "F1_INGEST_CONFIG", default_value = "settings.yaml")]
    pub config: PathBuf,

    #[arg(long, env = "F1_INGEST_HEC_TOKEN", hide_env_values = true, hide = true)]
    pub hec_token: Option<String>,

    #[arg(long, env = "F1_INGEST_SIM_TOKEN", hide_env_values = true, hide = true)]
    pub sim_token: Option<String>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_every_option() -> TestResult {
        let cli = Cli::try_parse_from([
            "f1-ingestd",
            "--hostname",
            "rig-2",
            "--player",
            "Max",
            "--port",
            "20778",
            "--o11y",
            "yes",
            "--splunk",
            "no",
            "--mode",
            "solo",
            "--config",
            "/etc/f1/settings.yaml",
            "-vv",
        ])?;
        assert_eq!(cli.hostname, "rig-2");
        assert_eq!(cli.player, "Max");
        assert_eq!(cli.port, 20778);
        assert!(cli.o11y.enabled());
        assert!(!cli.splunk.enabled());
        assert_eq!(cli.mode, Mode::Solo);
        assert_eq!(cli.config, PathBuf::from("/etc/f1/settings.yaml"));
        assert_eq!(cli.verbose, 2);
        Ok(())
    }

    #[test]
    fn rejects_unknown_mode_and_toggle() {
        assert!(Cli::try_parse_from(["f1-ingestd", "--mode", "team"]).is_err());
        assert!(Cli::try_parse_from(["f1-ingestd", "--splunk", "maybe"]).is_err());
    }
}
