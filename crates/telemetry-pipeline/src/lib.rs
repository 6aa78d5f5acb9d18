//! Per-packet transformation pipeline for F1 2022 telemetry.
//!
//! A decoded [`f1_ingest_packets::Packet`] goes through the [`Dispatcher`]:
//!
//! 1. feature flags drop disabled high-rate kinds,
//! 2. participants packets replace the roster in the [`ContextStore`],
//! 3. event packets are forwarded raw,
//! 4. everything else is flattened into [`FlatRecord`]s, enriched with the
//!    roster and header, run through the lap-event tracker (lap packets),
//!    reduced to the player car in solo mode and filtered to named cars,
//! 5. the batch goes to the [`EventSink`] and its gauges to the
//!    [`MetricsSink`], each as a background task on a bounded [`SendPool`].
//!
//! Nothing here performs network I/O itself; sinks are trait objects.

#![deny(static_mut_refs)]

pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod flatten;
pub mod lap_events;
pub mod merge;
pub mod metrics;
pub mod pool;
pub mod record;
pub mod sink;

pub use config::{FeatureFlags, Mode, PipelineConfig};
pub use context::{ContextStore, LapTrackerEntry, MAX_TRACKED_CARS};
pub use dispatch::{DispatchOutcome, Dispatcher, Routed};
pub use error::{FlattenError, MergeError, SinkError};
pub use flatten::{flatten_entities, flatten_serialized};
pub use lap_events::LapEvent;
pub use merge::Merger;
pub use metrics::{GaugeConfig, extract_gauges};
pub use pool::{DEFAULT_SEND_POOL_SIZE, SendPool};
pub use record::{FieldValue, FlatRecord, epoch_seconds};
pub use sink::{EventSink, Gauge, MetricsSink};
