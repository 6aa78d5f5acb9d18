//! Runtime options for the dispatcher.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::metrics::GaugeConfig;
use crate::pool::DEFAULT_SEND_POOL_SIZE;

/// Which cars are forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every populated car slot.
    #[default]
    Spectator,
    /// Only the player's car, tagged with the configured player name.
    Solo,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Spectator => "spectator",
            Mode::Solo => "solo",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spectator" => Ok(Mode::Spectator),
            "solo" => Ok(Mode::Solo),
            other => Err(format!("unknown mode `{other}` (expected spectator or solo)")),
        }
    }
}

/// Per-kind switches for the high-rate packet kinds. Disabled kinds are
/// dropped before any processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub motion: bool,
    pub telemetry: bool,
    pub lap: bool,
    pub status: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            motion: true,
            telemetry: true,
            lap: true,
            status: true,
        }
    }
}

/// Everything the dispatcher needs besides its sinks.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub mode: Mode,
    pub player_name: String,
    /// Host label on events and the hostname gauge dimension.
    pub hostname: String,
    /// Adds latency checkpoint fields to records.
    pub debug: bool,
    pub features: FeatureFlags,
    pub gauges: GaugeConfig,
    pub send_pool_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Spectator,
            player_name: "Drivey McDriverface".to_owned(),
            hostname: "host_1".to_owned(),
            debug: false,
            features: FeatureFlags::default(),
            gauges: GaugeConfig::default(),
            send_pool_size: DEFAULT_SEND_POOL_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_cli_spelling() {
        assert_eq!("solo".parse::<Mode>(), Ok(Mode::Solo));
        assert_eq!("spectator".parse::<Mode>(), Ok(Mode::Spectator));
        assert!("Solo".parse::<Mode>().is_err());
        assert_eq!(Mode::Solo.to_string(), "solo");
    }
}
