//! Packet-kind identifiers and their stable names.

use std::fmt;

use serde::Serialize;

/// Packet kinds of the F1 2022 protocol plus the synthetic startup kind.
///
/// The display name is used as the event `sourcetype` downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PacketKind {
    Motion,
    Session,
    Lap,
    Event,
    Participants,
    CarSetups,
    CarTelemetry,
    CarStatus,
    FinalClassification,
    LobbyInfo,
    CarDamage,
    SessionHistory,
    /// Not sent by the game; emitted once when the forwarder starts.
    ScriptStartup,
}

impl PacketKind {
    /// Wire identifier of this kind.
    pub fn id(self) -> u8 {
        match self {
            PacketKind::Motion => 0,
            PacketKind::Session => 1,
            PacketKind::Lap => 2,
            PacketKind::Event => 3,
            PacketKind::Participants => 4,
            PacketKind::CarSetups => 5,
            PacketKind::CarTelemetry => 6,
            PacketKind::CarStatus => 7,
            PacketKind::FinalClassification => 8,
            PacketKind::LobbyInfo => 9,
            PacketKind::CarDamage => 10,
            PacketKind::SessionHistory => 11,
            PacketKind::ScriptStartup => 99,
        }
    }

    /// Look up a kind by wire identifier.
    pub fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            0 => PacketKind::Motion,
            1 => PacketKind::Session,
            2 => PacketKind::Lap,
            3 => PacketKind::Event,
            4 => PacketKind::Participants,
            5 => PacketKind::CarSetups,
            6 => PacketKind::CarTelemetry,
            7 => PacketKind::CarStatus,
            8 => PacketKind::FinalClassification,
            9 => PacketKind::LobbyInfo,
            10 => PacketKind::CarDamage,
            11 => PacketKind::SessionHistory,
            99 => PacketKind::ScriptStartup,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            PacketKind::Motion => "MotionData",
            PacketKind::Session => "SessionData",
            PacketKind::Lap => "LapData",
            PacketKind::Event => "EventData",
            PacketKind::Participants => "ParticipantsData",
            PacketKind::CarSetups => "CarSetupData",
            PacketKind::CarTelemetry => "CarTelemetryData",
            PacketKind::CarStatus => "CarStatusData",
            PacketKind::FinalClassification => "FinalClassificationData",
            PacketKind::LobbyInfo => "LobbyInfoData",
            PacketKind::CarDamage => "CarDamageData",
            PacketKind::SessionHistory => "SessionHistoryData",
            PacketKind::ScriptStartup => "ScriptStartup",
        }
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_for_every_known_kind() {
        for id in (0u8..=11).chain(std::iter::once(99)) {
            let kind = PacketKind::from_id(id);
            assert_eq!(kind.map(PacketKind::id), Some(id), "id {id}");
        }
        assert_eq!(PacketKind::from_id(12), None);
    }

    #[test]
    fn display_uses_sourcetype_name() {
        assert_eq!(PacketKind::CarTelemetry.to_string(), "CarTelemetryData");
        assert_eq!(PacketKind::ScriptStartup.to_string(), "ScriptStartup");
    }
}
