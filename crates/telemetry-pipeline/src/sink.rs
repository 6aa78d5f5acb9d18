//! Downstream sink interfaces.
//!
//! Implementations live outside the pipeline; the HTTP collectors are in
//! `f1-ingest-sinks`. Sinks are shared across background send tasks, so they
//! must be `Send + Sync`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use f1_ingest_packets::PacketKind;
use serde::Serialize;

use crate::error::SinkError;
use crate::record::FlatRecord;

/// Event/log collector.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Forward a batch of flat records, one event per record.
    async fn send_batch(&self, records: Vec<FlatRecord>, kind: PacketKind)
    -> Result<(), SinkError>;

    /// Forward one event that keeps its original nested shape.
    async fn send_raw(&self, event: serde_json::Value, kind: PacketKind) -> Result<(), SinkError>;
}

/// One gauge datapoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    /// `<namespace>.<field>`, e.g. `f1_2022.speed`.
    pub metric: String,
    pub value: f64,
    pub dimensions: BTreeMap<String, String>,
}

/// Metrics collector.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn send(&self, gauges: Vec<Gauge>) -> Result<(), SinkError>;
}
