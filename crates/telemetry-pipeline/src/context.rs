//! Cross-packet state: the driver roster and the per-car lap tracker.

use f1_ingest_packets::ParticipantData;

use crate::lap_events::LapEvent;

/// Car slots followed by the lap tracker.
pub const MAX_TRACKED_CARS: usize = 20;

/// Last seen lap/sector of one car plus the event currently being repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapTrackerEntry {
    pub current_lap: u8,
    pub current_sector: u8,
    pub lap_event: LapEvent,
    pub lap_event_count: u8,
}

impl Default for LapTrackerEntry {
    fn default() -> Self {
        Self {
            current_lap: 1,
            current_sector: 0,
            lap_event: LapEvent::None,
            lap_event_count: 0,
        }
    }
}

/// Roster and lap tracker, owned by the dispatcher for the process lifetime.
///
/// Only the sequential receive path touches this; background sends never do.
#[derive(Debug, Clone, Default)]
pub struct ContextStore {
    roster: Vec<ParticipantData>,
    lap_tracker: [LapTrackerEntry; MAX_TRACKED_CARS],
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roster wholesale. Old entries past the new length are gone.
    pub fn update_roster(&mut self, participants: Vec<ParticipantData>) {
        self.roster = participants;
    }

    pub fn roster_entry(&self, slot: usize) -> Option<&ParticipantData> {
        self.roster.get(slot)
    }

    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }

    pub fn lap_tracker(&self, slot: usize) -> Option<&LapTrackerEntry> {
        self.lap_tracker.get(slot)
    }

    pub(crate) fn lap_tracker_mut(&mut self) -> &mut [LapTrackerEntry; MAX_TRACKED_CARS] {
        &mut self.lap_tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(name: &str) -> ParticipantData {
        ParticipantData {
            name: name.to_owned(),
            ..ParticipantData::default()
        }
    }

    #[test]
    fn roster_replacement_is_wholesale() {
        let mut store = ContextStore::new();
        store.update_roster(vec![driver("A"), driver("B"), driver("C")]);
        store.update_roster(vec![driver("X")]);
        assert_eq!(store.roster_len(), 1);
        assert_eq!(store.roster_entry(0).map(|p| p.name.as_str()), Some("X"));
        assert!(store.roster_entry(1).is_none());
    }

    #[test]
    fn tracker_starts_on_lap_one_sector_zero() {
        let store = ContextStore::new();
        for slot in 0..MAX_TRACKED_CARS {
            assert_eq!(store.lap_tracker(slot), Some(&LapTrackerEntry::default()));
        }
        assert!(store.lap_tracker(MAX_TRACKED_CARS).is_none());
    }
}
