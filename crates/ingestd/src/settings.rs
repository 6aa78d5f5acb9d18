//! YAML settings file.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! usable spectator setup with both sinks unconfigured. Validation happens
//! after CLI overrides are applied, against the sinks actually enabled.

use std::path::{Path, PathBuf};
use std::time::Duration;

use f1_ingest_pipeline::{DEFAULT_SEND_POOL_SIZE, FeatureFlags, GaugeConfig};
use f1_ingest_sinks::{HecConfig, SignalFxConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} is required when the sink is enabled")]
    Missing(&'static str),

    #[error("send_pool_size must be at least 1")]
    ZeroPoolSize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HecSettings {
    pub url: String,
    pub token: String,
    pub verify_tls: bool,
    pub timeout_secs: u64,
}

impl Default for HecSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: String::new(),
            verify_tls: false,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub endpoint: String,
    pub token: String,
    pub timeout_secs: u64,
    #[serde(flatten)]
    pub gauges: GaugeConfig,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            token: String::new(),
            timeout_secs: 10,
            gauges: GaugeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub debug: bool,
    pub hec: HecSettings,
    pub metrics: MetricsSettings,
    pub features: FeatureFlags,
    pub send_pool_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            hec: HecSettings::default(),
            metrics: MetricsSettings::default(),
            features: FeatureFlags::default(),
            send_pool_size: DEFAULT_SEND_POOL_SIZE,
        }
    }
}

impl Settings {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Tokens from the environment (or CLI) win over the file.
    pub fn apply_token_overrides(&mut self, hec: Option<String>, metrics: Option<String>) {
        if let Some(token) = hec.filter(|t| !t.is_empty()) {
            self.hec.token = token;
        }
        if let Some(token) = metrics.filter(|t| !t.is_empty()) {
            self.metrics.token = token;
        }
    }

    pub fn validate(&self, hec_enabled: bool, metrics_enabled: bool) -> Result<(), ConfigError> {
        if self.send_pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        if hec_enabled {
            if self.hec.url.trim().is_empty() {
                return Err(ConfigError::Missing("hec.url"));
            }
            if self.hec.token.trim().is_empty() {
                return Err(ConfigError::Missing("hec.token"));
            }
        }
        if metrics_enabled {
            if self.metrics.endpoint.trim().is_empty() {
                return Err(ConfigError::Missing("metrics.endpoint"));
            }
            if self.metrics.token.trim().is_empty() {
                return Err(ConfigError::Missing("metrics.token"));
            }
        }
        Ok(())
    }

    pub fn hec_config(&self, hostname: &str) -> HecConfig {
        let mut config = HecConfig::new(&self.hec.url, &self.hec.token, hostname);
        config.verify_tls = self.hec.verify_tls;
        config.timeout = Duration::from_secs(self.hec.timeout_secs);
        config
    }

    pub fn signalfx_config(&self) -> SignalFxConfig {
        let mut config = SignalFxConfig::new(&self.metrics.endpoint, &self.metrics.token);
        config.timeout = Duration::from_secs(self.metrics.timeout_secs);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const SAMPLE: &str = r#"
debug: true
hec:
  url: https://splunk.local:8088
  token: 11111111-2222-3333-4444-555555555555
metrics:
  endpoint: https://ingest.us1.signalfx.com
  token: sf-token
  namespace: monza
  metric_fields: [speed, engine_rpm]
features:
  motion: false
send_pool_size: 8
"#;

    #[test]
    fn loads_settings_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(SAMPLE.as_bytes())?;

        let settings = Settings::load(file.path())?;
        assert!(settings.debug);
        assert_eq!(settings.hec.url, "https://splunk.local:8088");
        assert!(!settings.hec.verify_tls);
        assert_eq!(settings.metrics.gauges.namespace, "monza");
        assert_eq!(settings.metrics.gauges.metric_fields, vec!["speed", "engine_rpm"]);
        assert_eq!(
            settings.metrics.gauges.hostname_dimension,
            GaugeConfig::default().hostname_dimension
        );
        assert!(!settings.features.motion);
        assert!(settings.features.telemetry);
        assert_eq!(settings.send_pool_size, 8);
        settings.validate(true, true)?;
        Ok(())
    }

    #[test]
    fn empty_file_gives_defaults() -> TestResult {
        let file = tempfile::NamedTempFile::new()?;
        let settings = Settings::load(file.path())?;
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.send_pool_size, DEFAULT_SEND_POOL_SIZE);
        Ok(())
    }

    #[test]
    fn missing_file_is_a_read_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let result = Settings::load(&dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
        Ok(())
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let result = Settings::from_yaml("hec: [not, a, map]");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn enabled_sink_needs_endpoint_and_token() -> TestResult {
        let mut settings = Settings::default();
        settings.validate(false, false)?;
        assert!(matches!(
            settings.validate(true, false),
            Err(ConfigError::Missing("hec.url"))
        ));

        settings.hec.url = "https://splunk.local:8088".to_owned();
        assert!(matches!(
            settings.validate(true, false),
            Err(ConfigError::Missing("hec.token"))
        ));

        settings.metrics.endpoint = "https://ingest.example".to_owned();
        assert!(matches!(
            settings.validate(false, true),
            Err(ConfigError::Missing("metrics.token"))
        ));
        Ok(())
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let settings = Settings {
            send_pool_size: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(false, false),
            Err(ConfigError::ZeroPoolSize)
        ));
    }

    #[test]
    fn token_overrides_replace_file_values() -> TestResult {
        let mut settings = Settings::from_yaml(SAMPLE)?;
        settings.apply_token_overrides(Some("env-hec".to_owned()), Some(String::new()));
        assert_eq!(settings.hec.token, "env-hec");
        assert_eq!(settings.metrics.token, "sf-token");
        Ok(())
    }

    #[test]
    fn sink_configs_carry_settings() -> TestResult {
        let settings = Settings::from_yaml(SAMPLE)?;
        let hec = settings.hec_config("rig-7");
        assert_eq!(hec.hostname, "rig-7");
        assert_eq!(hec.timeout, Duration::from_secs(10));
        let sfx = settings.signalfx_config();
        assert_eq!(sfx.token, "sf-token");
        Ok(())
    }
}
