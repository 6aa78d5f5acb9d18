//! Lap and sector completion detection.
//!
//! Each tracked car remembers the last lap/sector it reported. A forward
//! step raises an event that is then repeated on the next
//! [`LAP_EVENT_REPEATS`] lap packets for that car, so a collector that
//! misses a datagram still sees it.

use std::fmt;

use f1_ingest_packets::LapData;
use serde::Serialize;

use crate::context::{LapTrackerEntry, MAX_TRACKED_CARS};
use crate::record::FlatRecord;

pub const LAP_EVENT_FIELD: &str = "lap_event";
pub const LAP_EVENT_COUNT_FIELD: &str = "lap_event_count";

/// Number of packets an event is repeated on before reverting to none.
pub const LAP_EVENT_REPEATS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LapEvent {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "LAP_COMPLETE")]
    LapComplete,
    #[serde(rename = "SECTOR_COMPLETE")]
    SectorComplete,
}

impl LapEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            LapEvent::None => "none",
            LapEvent::LapComplete => "LAP_COMPLETE",
            LapEvent::SectorComplete => "SECTOR_COMPLETE",
        }
    }
}

impl fmt::Display for LapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advance one tracker entry with a car's reported lap/sector and stamp its
/// record.
pub fn step(entry: &mut LapTrackerEntry, lap: &LapData, record: &mut FlatRecord) {
    if entry.current_lap < lap.current_lap_num {
        entry.lap_event = LapEvent::LapComplete;
        entry.lap_event_count = 0;
    } else if entry.current_sector < lap.sector {
        entry.lap_event = LapEvent::SectorComplete;
        entry.lap_event_count = 0;
    }

    if entry.lap_event != LapEvent::None {
        if entry.lap_event_count < LAP_EVENT_REPEATS {
            record.insert(LAP_EVENT_COUNT_FIELD, entry.lap_event_count);
            entry.lap_event_count = entry.lap_event_count.saturating_add(1);
        } else {
            entry.lap_event = LapEvent::None;
            entry.lap_event_count = 0;
        }
    }

    entry.current_lap = lap.current_lap_num;
    entry.current_sector = lap.sector;
    record.insert(LAP_EVENT_FIELD, entry.lap_event.as_str());
}

/// Run [`step`] for every tracked slot of a lap packet. `records` must be in
/// car-slot order and aligned with `laps`; slots past
/// [`MAX_TRACKED_CARS`] are left untouched.
pub fn apply(
    tracker: &mut [LapTrackerEntry; MAX_TRACKED_CARS],
    laps: &[LapData],
    records: &mut [FlatRecord],
) {
    for ((entry, lap), record) in tracker.iter_mut().zip(laps).zip(records.iter_mut()) {
        step(entry, lap, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    fn lap(current_lap_num: u8, sector: u8) -> LapData {
        LapData {
            current_lap_num,
            sector,
            ..LapData::default()
        }
    }

    fn event_of(record: &FlatRecord) -> Option<&str> {
        record.get(LAP_EVENT_FIELD).and_then(FieldValue::as_str)
    }

    #[test]
    fn sector_then_lap_sequence() {
        let mut entry = LapTrackerEntry::default();

        let mut r = FlatRecord::new();
        step(&mut entry, &lap(1, 0), &mut r);
        assert_eq!(event_of(&r), Some("none"));
        assert!(!r.contains_key(LAP_EVENT_COUNT_FIELD));

        let mut r = FlatRecord::new();
        step(&mut entry, &lap(1, 1), &mut r);
        assert_eq!(event_of(&r), Some("SECTOR_COMPLETE"));
        assert_eq!(r.get(LAP_EVENT_COUNT_FIELD), Some(&FieldValue::Integer(0)));

        let mut r = FlatRecord::new();
        step(&mut entry, &lap(2, 1), &mut r);
        assert_eq!(event_of(&r), Some("LAP_COMPLETE"));
        assert_eq!(r.get(LAP_EVENT_COUNT_FIELD), Some(&FieldValue::Integer(0)));
    }

    #[test]
    fn event_repeats_five_times_then_clears() {
        let mut entry = LapTrackerEntry::default();
        let mut r = FlatRecord::new();
        step(&mut entry, &lap(2, 0), &mut r);

        for expected in 1..LAP_EVENT_REPEATS {
            let mut r = FlatRecord::new();
            step(&mut entry, &lap(2, 0), &mut r);
            assert_eq!(event_of(&r), Some("LAP_COMPLETE"));
            assert_eq!(
                r.get(LAP_EVENT_COUNT_FIELD),
                Some(&FieldValue::Integer(i64::from(expected)))
            );
        }

        let mut r = FlatRecord::new();
        step(&mut entry, &lap(2, 0), &mut r);
        assert_eq!(event_of(&r), Some("none"));
        assert!(!r.contains_key(LAP_EVENT_COUNT_FIELD));
        assert_eq!(entry.lap_event, LapEvent::None);
        assert_eq!(entry.lap_event_count, 0);
    }

    #[test]
    fn lap_wins_over_sector_in_one_packet() {
        let mut entry = LapTrackerEntry::default();
        let mut r = FlatRecord::new();
        step(&mut entry, &lap(2, 1), &mut r);
        assert_eq!(event_of(&r), Some("LAP_COMPLETE"));
        assert_eq!(entry.current_sector, 1);
    }

    #[test]
    fn sector_wrap_to_zero_is_not_an_event() {
        let mut entry = LapTrackerEntry {
            current_sector: 2,
            ..LapTrackerEntry::default()
        };
        let mut r = FlatRecord::new();
        step(&mut entry, &lap(1, 0), &mut r);
        assert_eq!(event_of(&r), Some("none"));
    }

    #[test]
    fn apply_skips_slots_past_the_tracker() {
        let mut tracker = [LapTrackerEntry::default(); MAX_TRACKED_CARS];
        let laps: Vec<LapData> = (0..22).map(|_| lap(2, 0)).collect();
        let mut records = vec![FlatRecord::new(); 22];
        apply(&mut tracker, &laps, &mut records);
        assert!(records.iter().take(MAX_TRACKED_CARS).all(|r| event_of(r) == Some("LAP_COMPLETE")));
        assert!(records.iter().skip(MAX_TRACKED_CARS).all(|r| event_of(r).is_none()));
    }
}
