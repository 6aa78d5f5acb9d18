//! Per-kind merge routines: flatten the per-car array, overlay roster and
//! header, copy root fields, then reduce to the player car in solo mode.

use f1_ingest_packets::{
    PacketCarSetupData, PacketCarStatusData, PacketCarTelemetryData,
    PacketFinalClassificationData, PacketLapData, PacketLobbyInfoData, PacketMotionData,
    PacketSessionData,
};
use serde::Serialize;

use crate::config::Mode;
use crate::context::ContextStore;
use crate::error::MergeError;
use crate::flatten::{flatten_one, flatten_serialized};
use crate::lap_events;
use crate::record::FlatRecord;

pub const PLAYER_NAME_FIELD: &str = "player_name";

/// Merge settings shared by every packet kind.
#[derive(Debug, Clone)]
pub struct Merger {
    mode: Mode,
    player_name: String,
    debug: bool,
}

impl Merger {
    pub fn new(mode: Mode, player_name: impl Into<String>, debug: bool) -> Self {
        Self {
            mode,
            player_name: player_name.into(),
            debug,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn merge_motion(
        &self,
        packet: &PacketMotionData,
        header: &FlatRecord,
        store: &ContextStore,
    ) -> Result<Vec<FlatRecord>, MergeError> {
        let records = self.base_records(&packet.car_motion_data, header, store)?;
        let mut records = self.select(records, packet.header.player_slot())?;
        if self.mode == Mode::Solo {
            // Player-only per-wheel arrays, RL RR FL FR.
            let wheels = [
                ("suspension_position", &packet.suspension_position),
                ("suspension_velocity", &packet.suspension_velocity),
                ("suspension_acceleration", &packet.suspension_acceleration),
                ("wheel_speed", &packet.wheel_speed),
                ("wheel_slip", &packet.wheel_slip),
            ];
            for record in &mut records {
                for (name, values) in &wheels {
                    for (i, v) in values.iter().enumerate() {
                        record.insert(format!("{name}{}", i + 1), f64::from(*v));
                    }
                }
            }
        }
        Ok(records)
    }

    pub fn merge_session(
        &self,
        packet: &PacketSessionData,
        header: &FlatRecord,
        store: &ContextStore,
    ) -> Result<Vec<FlatRecord>, MergeError> {
        let mut root = FlatRecord::new();
        root.insert("air_temperature", i64::from(packet.air_temperature));
        root.insert("track_id", i64::from(packet.track_id));
        root.insert("weather", packet.weather);
        root.insert("total_laps", packet.total_laps);
        root.insert("track_temperature", i64::from(packet.track_temperature));
        root.insert("track_length", i64::from(packet.track_length));

        let mut records = self.base_records(&packet.marshal_zones, header, store)?;
        overlay_all(&mut records, &root);
        self.select(records, packet.header.player_slot())
    }

    /// Lap merge also advances the lap tracker for every tracked car, in
    /// both modes, before solo reduction.
    pub fn merge_lap(
        &self,
        packet: &PacketLapData,
        header: &FlatRecord,
        store: &mut ContextStore,
    ) -> Result<Vec<FlatRecord>, MergeError> {
        let mut records = self.base_records(&packet.lap_data, header, store)?;
        lap_events::apply(store.lap_tracker_mut(), &packet.lap_data, &mut records);
        self.select(records, packet.header.player_slot())
    }

    pub fn merge_car_setups(
        &self,
        packet: &PacketCarSetupData,
        header: &FlatRecord,
        store: &ContextStore,
    ) -> Result<Vec<FlatRecord>, MergeError> {
        let records = self.base_records(&packet.car_setups, header, store)?;
        self.select(records, packet.header.player_slot())
    }

    pub fn merge_car_telemetry(
        &self,
        packet: &PacketCarTelemetryData,
        header: &FlatRecord,
        store: &ContextStore,
    ) -> Result<Vec<FlatRecord>, MergeError> {
        let records = self.base_records(&packet.car_telemetry_data, header, store)?;
        self.select(records, packet.header.player_slot())
    }

    pub fn merge_car_status(
        &self,
        packet: &PacketCarStatusData,
        header: &FlatRecord,
        store: &ContextStore,
    ) -> Result<Vec<FlatRecord>, MergeError> {
        let records = self.base_records(&packet.car_status_data, header, store)?;
        self.select(records, packet.header.player_slot())
    }

    pub fn merge_final_classification(
        &self,
        packet: &PacketFinalClassificationData,
        header: &FlatRecord,
        store: &ContextStore,
    ) -> Result<Vec<FlatRecord>, MergeError> {
        let mut root = FlatRecord::new();
        root.insert("num_cars", packet.num_cars);

        let mut records = self.base_records(&packet.classification_data, header, store)?;
        overlay_all(&mut records, &root);
        self.select(records, packet.header.player_slot())
    }

    pub fn merge_lobby(
        &self,
        packet: &PacketLobbyInfoData,
        header: &FlatRecord,
        store: &ContextStore,
    ) -> Result<Vec<FlatRecord>, MergeError> {
        let mut root = FlatRecord::new();
        root.insert("num_players", packet.num_players);

        let mut records = self.base_records(&packet.lobby_players, header, store)?;
        overlay_all(&mut records, &root);
        self.select(records, packet.header.player_slot())
    }

    // ── Shared steps ──────────────────────────────────────────────────────────

    /// Flatten `entities` and overlay the roster entry at the same slot,
    /// then the header. Header fields win on collision.
    fn base_records<T: Serialize>(
        &self,
        entities: &[T],
        header: &FlatRecord,
        store: &ContextStore,
    ) -> Result<Vec<FlatRecord>, MergeError> {
        let mut records = flatten_serialized(entities, self.debug)?;
        for (slot, record) in records.iter_mut().enumerate() {
            if let Some(participant) = store.roster_entry(slot) {
                record.overlay(&flatten_one(participant)?);
            }
            record.overlay(header);
        }
        Ok(records)
    }

    /// Solo mode keeps only the player slot and tags it; spectator keeps all.
    fn select(&self, records: Vec<FlatRecord>, index: usize) -> Result<Vec<FlatRecord>, MergeError> {
        match self.mode {
            Mode::Spectator => Ok(records),
            Mode::Solo => {
                let len = records.len();
                let mut player = records
                    .into_iter()
                    .nth(index)
                    .ok_or(MergeError::PlayerIndexOutOfRange { index, len })?;
                player.insert(PLAYER_NAME_FIELD, self.player_name.as_str());
                Ok(vec![player])
            }
        }
    }
}

fn overlay_all(records: &mut [FlatRecord], root: &FlatRecord) {
    for record in records {
        record.overlay(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use f1_ingest_packets::{CarTelemetryData, PacketHeader, ParticipantData};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn header(player_car_index: u8) -> PacketHeader {
        PacketHeader {
            packet_format: 2022,
            packet_id: 6,
            player_car_index,
            ..PacketHeader::default()
        }
    }

    fn header_record(h: &PacketHeader) -> Result<FlatRecord, MergeError> {
        Ok(flatten_one(h)?)
    }

    fn roster(names: &[&str]) -> ContextStore {
        let mut store = ContextStore::new();
        store.update_roster(
            names
                .iter()
                .map(|n| ParticipantData {
                    name: (*n).to_owned(),
                    ..ParticipantData::default()
                })
                .collect(),
        );
        store
    }

    fn telemetry(player_car_index: u8, cars: u16) -> PacketCarTelemetryData {
        PacketCarTelemetryData {
            header: header(player_car_index),
            car_telemetry_data: (0..cars)
                .map(|i| CarTelemetryData {
                    speed: 200 + i,
                    ..CarTelemetryData::default()
                })
                .collect(),
            ..PacketCarTelemetryData::default()
        }
    }

    #[test]
    fn roster_then_header_are_overlaid() -> TestResult {
        let store = roster(&["A", "B"]);
        let merger = Merger::new(Mode::Spectator, "me", false);
        let packet = telemetry(0, 2);
        let records = merger.merge_car_telemetry(&packet, &header_record(&packet.header)?, &store)?;
        assert_eq!(records.len(), 2);
        let b = records.get(1).ok_or("missing record")?;
        assert_eq!(b.get("name"), Some(&FieldValue::Text("B".into())));
        assert_eq!(b.get("packet_id"), Some(&FieldValue::Integer(6)));
        assert_eq!(b.get("car_index"), Some(&FieldValue::Integer(1)));
        assert_eq!(b.get("speed"), Some(&FieldValue::Integer(201)));
        Ok(())
    }

    #[test]
    fn header_wins_over_entity_fields() -> TestResult {
        let mut h = FlatRecord::new();
        h.insert("speed", 1i64);
        let merger = Merger::new(Mode::Spectator, "me", false);
        let records = merger.merge_car_telemetry(&telemetry(0, 1), &h, &roster(&["A"]))?;
        let only = records.first().ok_or("missing record")?;
        assert_eq!(only.get("speed"), Some(&FieldValue::Integer(1)));
        Ok(())
    }

    #[test]
    fn records_past_roster_have_no_name() -> TestResult {
        let merger = Merger::new(Mode::Spectator, "me", false);
        let packet = telemetry(0, 3);
        let records =
            merger.merge_car_telemetry(&packet, &header_record(&packet.header)?, &roster(&["A"]))?;
        assert_eq!(records.len(), 3);
        assert!(records.iter().skip(1).all(|r| !r.has_name()));
        Ok(())
    }

    #[test]
    fn solo_keeps_player_and_tags_name() -> TestResult {
        let store = roster(&["A", "B", "C"]);
        let merger = Merger::new(Mode::Solo, "Drivey McDriverface", false);
        let packet = telemetry(2, 3);
        let records = merger.merge_car_telemetry(&packet, &header_record(&packet.header)?, &store)?;
        assert_eq!(records.len(), 1);
        let only = records.first().ok_or("missing record")?;
        assert_eq!(only.get("name"), Some(&FieldValue::Text("C".into())));
        assert_eq!(
            only.get(PLAYER_NAME_FIELD),
            Some(&FieldValue::Text("Drivey McDriverface".into()))
        );
        Ok(())
    }

    #[test]
    fn solo_index_out_of_range_is_an_error() -> TestResult {
        let merger = Merger::new(Mode::Solo, "me", false);
        let packet = telemetry(5, 2);
        let result =
            merger.merge_car_telemetry(&packet, &header_record(&packet.header)?, &ContextStore::new());
        assert!(matches!(
            result,
            Err(MergeError::PlayerIndexOutOfRange { index: 5, len: 2 })
        ));
        Ok(())
    }

    #[test]
    fn solo_motion_adds_player_wheel_arrays() -> TestResult {
        let packet = PacketMotionData {
            header: header(1),
            car_motion_data: vec![Default::default(); 2],
            wheel_speed: [1.0, 2.0, 3.0, 4.0],
            ..PacketMotionData::default()
        };
        let merger = Merger::new(Mode::Solo, "me", false);
        let records =
            merger.merge_motion(&packet, &header_record(&packet.header)?, &roster(&["A", "B"]))?;
        let only = records.first().ok_or("missing record")?;
        assert_eq!(only.get("name"), Some(&FieldValue::Text("B".into())));
        assert_eq!(only.get("wheel_speed4"), Some(&FieldValue::Float(4.0)));
        assert!(only.contains_key("suspension_position1"));
        assert!(only.contains_key("wheel_slip4"));
        Ok(())
    }

    #[test]
    fn spectator_motion_has_no_wheel_arrays() -> TestResult {
        let packet = PacketMotionData {
            car_motion_data: vec![Default::default(); 2],
            ..PacketMotionData::default()
        };
        let merger = Merger::new(Mode::Spectator, "me", false);
        let records =
            merger.merge_motion(&packet, &header_record(&packet.header)?, &roster(&["A", "B"]))?;
        assert!(records.iter().all(|r| !r.contains_key("wheel_speed1")));
        Ok(())
    }

    #[test]
    fn session_copies_root_fields_to_each_zone() -> TestResult {
        let packet = PacketSessionData {
            air_temperature: 24,
            track_temperature: 38,
            track_id: 11,
            weather: 1,
            total_laps: 50,
            track_length: 5793,
            marshal_zones: vec![Default::default(); 3],
            ..PacketSessionData::default()
        };
        let merger = Merger::new(Mode::Spectator, "me", false);
        let records = merger.merge_session(
            &packet,
            &header_record(&packet.header)?,
            &roster(&["A", "B", "C"]),
        )?;
        assert_eq!(records.len(), 3);
        for r in &records {
            assert_eq!(r.get("air_temperature"), Some(&FieldValue::Integer(24)));
            assert_eq!(r.get("track_length"), Some(&FieldValue::Integer(5793)));
            assert!(r.contains_key("zone_flag"));
        }
        Ok(())
    }
}
