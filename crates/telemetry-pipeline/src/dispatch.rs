//! Packet routing: feature gating, context updates, merging and hand-off to
//! the sinks.

use std::sync::Arc;
use std::time::Duration;

use f1_ingest_packets::{Packet, PacketEventData, PacketKind};
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::context::ContextStore;
use crate::error::{FlattenError, MergeError};
use crate::flatten::flatten_one;
use crate::merge::{Merger, PLAYER_NAME_FIELD};
use crate::metrics::extract_gauges;
use crate::pool::SendPool;
use crate::record::{FlatRecord, epoch_seconds};
use crate::sink::{EventSink, MetricsSink};

/// Debug-mode stamp added to the header when a packet enters the pipeline.
pub const CHECKPOINT_RECEIVED: &str = "checkpoint_1_data_received";
/// Debug-mode stamp added to each record once it is ready to send.
pub const CHECKPOINT_PROCESSED: &str = "checkpoint_3_payload_processed";

/// Result of routing one packet, before anything is sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// The kind is switched off by a feature flag.
    Disabled,
    /// A participants packet replaced the roster.
    RosterUpdated { cars: usize },
    /// An event packet, kept nested, to be sent as one raw event.
    Raw(serde_json::Value),
    /// Named records ready for the sinks. May be empty.
    Batch(Vec<FlatRecord>),
}

/// What [`Dispatcher::dispatch`] did with a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Disabled,
    RosterUpdated,
    /// Submitted to the sinks; counts sends accepted by the pool.
    Forwarded { records: usize, sends: usize },
    /// Nothing left to send after filtering.
    Empty,
    /// Merge failed; the packet was logged and dropped.
    Failed,
}

pub struct Dispatcher {
    config: PipelineConfig,
    merger: Merger,
    store: ContextStore,
    events: Option<Arc<dyn EventSink>>,
    metrics: Option<Arc<dyn MetricsSink>>,
    pool: SendPool,
}

impl Dispatcher {
    /// A sink left as `None` is disabled.
    pub fn new(
        config: PipelineConfig,
        events: Option<Arc<dyn EventSink>>,
        metrics: Option<Arc<dyn MetricsSink>>,
    ) -> Self {
        let merger = Merger::new(config.mode, config.player_name.clone(), config.debug);
        let pool = SendPool::new(config.send_pool_size);
        Self {
            config,
            merger,
            store: ContextStore::new(),
            events,
            metrics,
            pool,
        }
    }

    pub fn context(&self) -> &ContextStore {
        &self.store
    }

    pub fn pool(&self) -> &SendPool {
        &self.pool
    }

    /// Route one packet without performing any I/O.
    ///
    /// Mutates the context store (roster, lap tracker) as a side effect.
    pub fn process(&mut self, packet: Packet) -> Result<Routed, MergeError> {
        let features = self.config.features;
        let enabled = match &packet {
            Packet::Motion(_) => features.motion,
            Packet::CarTelemetry(_) => features.telemetry,
            Packet::Lap(_) => features.lap,
            Packet::CarStatus(_) => features.status,
            _ => true,
        };
        if !enabled {
            return Ok(Routed::Disabled);
        }

        let mut header = flatten_one(packet.header())?;
        if self.config.debug {
            header.insert(CHECKPOINT_RECEIVED, epoch_seconds());
        }

        let store = &mut self.store;
        let merger = &self.merger;
        let records = match packet {
            Packet::Participants(p) => {
                let cars = p.participants.len();
                store.update_roster(p.participants);
                debug!(cars, active = p.num_active_cars, "roster updated");
                return Ok(Routed::RosterUpdated { cars });
            }
            Packet::Event(p) => {
                let event = raw_event(&p, &header, merger.player_name(), self.config.debug)?;
                return Ok(Routed::Raw(event));
            }
            Packet::Motion(p) => merger.merge_motion(&p, &header, store)?,
            Packet::Session(p) => merger.merge_session(&p, &header, store)?,
            Packet::Lap(p) => merger.merge_lap(&p, &header, store)?,
            Packet::CarSetups(p) => merger.merge_car_setups(&p, &header, store)?,
            Packet::CarTelemetry(p) => merger.merge_car_telemetry(&p, &header, store)?,
            Packet::CarStatus(p) => merger.merge_car_status(&p, &header, store)?,
            Packet::FinalClassification(p) => {
                merger.merge_final_classification(&p, &header, store)?
            }
            Packet::LobbyInfo(p) => merger.merge_lobby(&p, &header, store)?,
        };

        let mut records: Vec<FlatRecord> = records.into_iter().filter(FlatRecord::has_name).collect();
        if self.config.debug {
            let now = epoch_seconds();
            for record in &mut records {
                record.insert(CHECKPOINT_PROCESSED, now);
            }
        }
        Ok(Routed::Batch(records))
    }

    /// Route one packet and hand the result to the enabled sinks in the
    /// background. Never fails; errors are logged with the packet kind.
    pub fn dispatch(&mut self, packet: Packet) -> DispatchOutcome {
        let kind = packet.kind();
        let routed = match self.process(packet) {
            Ok(routed) => routed,
            // Session packets carry 21 marshal zones for up to 22 cars, so a
            // player in the last slot misses on every session packet.
            Err(err @ MergeError::PlayerIndexOutOfRange { .. }) if kind == PacketKind::Session => {
                debug!(kind = %kind, error = %err, "no marshal zone for player slot");
                return DispatchOutcome::Failed;
            }
            Err(err) => {
                warn!(kind = %kind, error = %err, "dropping packet");
                return DispatchOutcome::Failed;
            }
        };

        match routed {
            Routed::Disabled => DispatchOutcome::Disabled,
            Routed::RosterUpdated { .. } => DispatchOutcome::RosterUpdated,
            Routed::Raw(event) => {
                let Some(sink) = self.events.clone() else {
                    return DispatchOutcome::Empty;
                };
                let accepted = self
                    .pool
                    .spawn(kind, "events", async move { sink.send_raw(event, kind).await });
                DispatchOutcome::Forwarded {
                    records: 1,
                    sends: usize::from(accepted),
                }
            }
            Routed::Batch(records) if records.is_empty() => DispatchOutcome::Empty,
            Routed::Batch(records) => self.forward(kind, records),
        }
    }

    /// Send the one-off startup record to the event sink, if enabled.
    pub fn announce_startup(&self) -> bool {
        let Some(sink) = self.events.clone() else {
            return false;
        };
        let mut record = FlatRecord::new();
        record.insert("message", "Script Starting");
        record.insert("description", "Initialising Script");
        record.insert("timestamp", epoch_seconds());
        info!("announcing startup to event collector");
        let kind = PacketKind::ScriptStartup;
        self.pool
            .spawn(kind, "events", async move { sink.send_batch(vec![record], kind).await })
    }

    /// Wait for in-flight sends. Returns `false` if `timeout` elapsed first.
    pub async fn flush(&self, timeout: Duration) -> bool {
        self.pool.flush(timeout).await
    }

    fn forward(&self, kind: PacketKind, records: Vec<FlatRecord>) -> DispatchOutcome {
        let count = records.len();
        let mut sends = 0;

        if let Some(sink) = self.metrics.clone() {
            let gauges = extract_gauges(&records, &self.config.gauges, &self.config.hostname);
            if !gauges.is_empty()
                && self
                    .pool
                    .spawn(kind, "metrics", async move { sink.send(gauges).await })
            {
                sends += 1;
            }
        }

        if let Some(sink) = self.events.clone() {
            let accepted = self
                .pool
                .spawn(kind, "events", async move { sink.send_batch(records, kind).await });
            if accepted {
                sends += 1;
            }
        }

        DispatchOutcome::Forwarded {
            records: count,
            sends,
        }
    }
}

/// Serialize an event packet as-is, stamped with the player name. In debug
/// mode the header is replaced by the stamped header record.
fn raw_event(
    packet: &PacketEventData,
    header: &FlatRecord,
    player_name: &str,
    debug: bool,
) -> Result<serde_json::Value, MergeError> {
    let mut event = serde_json::to_value(packet).map_err(FlattenError::from)?;
    if let Some(fields) = event.as_object_mut() {
        if debug {
            fields.insert(
                "header".to_owned(),
                serde_json::to_value(header).map_err(FlattenError::from)?,
            );
        }
        fields.insert(
            PLAYER_NAME_FIELD.to_owned(),
            serde_json::Value::String(player_name.to_owned()),
        );
    }
    Ok(event)
}
