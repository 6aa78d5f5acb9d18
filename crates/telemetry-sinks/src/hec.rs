//! Splunk HTTP Event Collector client.

use std::time::Duration;

use async_trait::async_trait;
use f1_ingest_packets::PacketKind;
use f1_ingest_pipeline::{EventSink, FlatRecord, SinkError, epoch_seconds};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::debug;

use crate::error::ClientError;
use crate::response_error;

/// `source` field on every event.
pub const HEC_SOURCE: &str = "f1_2022";

const COLLECTOR_PATH: &str = "/services/collector";

#[derive(Debug, Clone)]
pub struct HecConfig {
    /// Base URL, e.g. `https://splunk.example:8088`.
    pub url: String,
    pub token: String,
    /// `host` field on every event.
    pub hostname: String,
    /// HEC endpoints commonly run with self-signed certificates.
    pub verify_tls: bool,
    pub timeout: Duration,
}

impl HecConfig {
    pub fn new(url: impl Into<String>, token: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            hostname: hostname.into(),
            verify_tls: false,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, E: Serialize> {
    time: f64,
    sourcetype: &'a str,
    source: &'a str,
    host: &'a str,
    event: E,
}

/// Posts events to `<url>/services/collector`, one envelope per event,
/// batched into a single request body.
#[derive(Debug, Clone)]
pub struct HecClient {
    client: Client,
    endpoint: String,
    auth: String,
    hostname: String,
}

impl HecClient {
    pub fn new(config: HecConfig) -> Result<Self, ClientError> {
        if config.url.trim().is_empty() {
            return Err(ClientError::MissingSetting("hec.url"));
        }
        if config.token.trim().is_empty() {
            return Err(ClientError::MissingSetting("hec.token"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("f1-ingest/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{COLLECTOR_PATH}", config.url.trim_end_matches('/')),
            auth: format!("Splunk {}", config.token),
            hostname: config.hostname,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn encode<E: Serialize>(&self, events: &[E], kind: PacketKind) -> Result<String, SinkError> {
        let time = epoch_seconds();
        let mut body = String::new();
        for event in events {
            let envelope = Envelope {
                time,
                sourcetype: kind.name(),
                source: HEC_SOURCE,
                host: &self.hostname,
                event,
            };
            body.push_str(&serde_json::to_string(&envelope)?);
            body.push('\n');
        }
        Ok(body)
    }

    async fn post(&self, body: String, kind: PacketKind, events: usize) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, &self.auth)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        debug!(kind = %kind, events, "forwarded to HEC");
        Ok(())
    }
}

#[async_trait]
impl EventSink for HecClient {
    async fn send_batch(
        &self,
        records: Vec<FlatRecord>,
        kind: PacketKind,
    ) -> Result<(), SinkError> {
        if records.is_empty() {
            return Ok(());
        }
        let body = self.encode(&records, kind)?;
        self.post(body, kind, records.len()).await
    }

    async fn send_raw(&self, event: serde_json::Value, kind: PacketKind) -> Result<(), SinkError> {
        let body = self.encode(std::slice::from_ref(&event), kind)?;
        self.post(body, kind, 1).await
    }
}
