//! Gauge extraction from flat records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::FlatRecord;
use crate::sink::Gauge;

pub const DEFAULT_NAMESPACE: &str = "f1_2022";
pub const DEFAULT_HOSTNAME_DIMENSION: &str = "f1-2022-hostname";

/// Record fields forwarded as gauges by default.
pub const DEFAULT_METRIC_FIELDS: &[&str] = &[
    "air_temperature",
    "brake",
    "brakes_temperature1",
    "brakes_temperature2",
    "brakes_temperature3",
    "brakes_temperature4",
    "car_position",
    "current_lap_num",
    "current_lap_time_in_ms",
    "engine_rpm",
    "engine_temperature",
    "g_force_lateral",
    "g_force_longitudinal",
    "g_force_vertical",
    "gear",
    "speed",
    "sector",
    "throttle",
    "track_temperature",
    "tyres_inner_temperature1",
    "tyres_inner_temperature2",
    "tyres_inner_temperature3",
    "tyres_inner_temperature4",
    "tyres_surface_temperature1",
    "tyres_surface_temperature2",
    "tyres_surface_temperature3",
    "tyres_surface_temperature4",
];

/// Record fields attached to each gauge as dimensions by default.
pub const DEFAULT_DIMENSION_FIELDS: &[&str] = &["name", "player_name"];

/// Which record fields become gauges and how they are labelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    pub namespace: String,
    pub hostname_dimension: String,
    pub metric_fields: Vec<String>,
    pub dimension_fields: Vec<String>,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_owned(),
            hostname_dimension: DEFAULT_HOSTNAME_DIMENSION.to_owned(),
            metric_fields: DEFAULT_METRIC_FIELDS.iter().map(|s| (*s).to_owned()).collect(),
            dimension_fields: DEFAULT_DIMENSION_FIELDS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

/// Build the gauges for a batch.
///
/// Each record contributes one gauge per configured metric field that it
/// holds as a number; its dimensions are the configured dimension fields it
/// holds (stringified) plus the hostname. Records with no metric fields
/// contribute nothing.
pub fn extract_gauges(records: &[FlatRecord], config: &GaugeConfig, hostname: &str) -> Vec<Gauge> {
    let mut gauges = Vec::new();
    for record in records {
        let metrics: Vec<(&String, f64)> = config
            .metric_fields
            .iter()
            .filter_map(|field| record.get(field).and_then(|v| v.as_f64()).map(|v| (field, v)))
            .collect();
        if metrics.is_empty() {
            continue;
        }

        let mut dimensions: BTreeMap<String, String> = config
            .dimension_fields
            .iter()
            .filter_map(|field| record.get(field).map(|v| (field.clone(), v.to_string())))
            .collect();
        dimensions.insert(config.hostname_dimension.clone(), hostname.to_owned());

        for (field, value) in metrics {
            gauges.push(Gauge {
                metric: format!("{}.{field}", config.namespace),
                value,
                dimensions: dimensions.clone(),
            });
        }
    }
    gauges
}
