//! Splunk Observability (SignalFx) datapoint ingest client.

use std::time::Duration;

use async_trait::async_trait;
use f1_ingest_pipeline::{Gauge, MetricsSink, SinkError};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::error::ClientError;
use crate::response_error;

pub const TOKEN_HEADER: &str = "X-SF-Token";

const DATAPOINT_PATH: &str = "/v2/datapoint";

#[derive(Debug, Clone)]
pub struct SignalFxConfig {
    /// Ingest base URL, e.g. `https://ingest.us1.signalfx.com`.
    pub endpoint: String,
    pub token: String,
    pub timeout: Duration,
}

impl SignalFxConfig {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Serialize)]
struct DatapointBody<'a> {
    gauge: &'a [Gauge],
}

#[derive(Debug, Clone)]
pub struct SignalFxClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl SignalFxClient {
    pub fn new(config: SignalFxConfig) -> Result<Self, ClientError> {
        if config.endpoint.trim().is_empty() {
            return Err(ClientError::MissingSetting("metrics.endpoint"));
        }
        if config.token.trim().is_empty() {
            return Err(ClientError::MissingSetting("metrics.token"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("f1-ingest/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{DATAPOINT_PATH}", config.endpoint.trim_end_matches('/')),
            token: config.token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MetricsSink for SignalFxClient {
    async fn send(&self, gauges: Vec<Gauge>) -> Result<(), SinkError> {
        if gauges.is_empty() {
            return Ok(());
        }
        let response = self
            .client
            .post(&self.endpoint)
            .header(TOKEN_HEADER, &self.token)
            .json(&DatapointBody { gauge: &gauges })
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        debug!(gauges = gauges.len(), "forwarded datapoints");
        Ok(())
    }
}
