//! F1 2022 UDP telemetry decoding.
//!
//! Turns raw datagrams from the game (packet format `2022`, default port
//! **20777**) into typed [`Packet`] values. Every packet body derives
//! `serde::Serialize`, which is how the ingest pipeline sees it as nested
//! key-value data.
//!
//! ## Decoded packet types
//!
//! | Packet ID | Name                 | Per-car array          |
//! |-----------|----------------------|------------------------|
//! | 0         | Motion               | `car_motion_data`      |
//! | 1         | Session              | `marshal_zones`        |
//! | 2         | Lap                  | `lap_data`             |
//! | 3         | Event                | -                      |
//! | 4         | Participants         | `participants`         |
//! | 5         | Car Setups           | `car_setups`           |
//! | 6         | Car Telemetry        | `car_telemetry_data`   |
//! | 7         | Car Status           | `car_status_data`      |
//! | 8         | Final Classification | `classification_data`  |
//! | 9         | Lobby Info           | `lobby_players`        |
//!
//! Car Damage (10) and Session History (11) are reported as
//! [`DecodeError::UnsupportedPacket`].

#![deny(static_mut_refs)]

pub mod builders;
pub mod error;
pub mod header;
pub mod kind;
pub mod listener;
pub mod packets;
pub mod reader;

pub use error::DecodeError;
pub use header::{HEADER_SIZE, PACKET_FORMAT_2022, PacketHeader};
pub use kind::PacketKind;
pub use listener::{DEFAULT_PORT, PacketListener};
pub use packets::*;
pub use reader::ByteReader;

/// A decoded packet; one variant per supported packet kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Motion(PacketMotionData),
    Session(PacketSessionData),
    Lap(PacketLapData),
    Event(PacketEventData),
    Participants(PacketParticipantsData),
    CarSetups(PacketCarSetupData),
    CarTelemetry(PacketCarTelemetryData),
    CarStatus(PacketCarStatusData),
    FinalClassification(PacketFinalClassificationData),
    LobbyInfo(PacketLobbyInfoData),
}

impl Packet {
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::Motion(_) => PacketKind::Motion,
            Packet::Session(_) => PacketKind::Session,
            Packet::Lap(_) => PacketKind::Lap,
            Packet::Event(_) => PacketKind::Event,
            Packet::Participants(_) => PacketKind::Participants,
            Packet::CarSetups(_) => PacketKind::CarSetups,
            Packet::CarTelemetry(_) => PacketKind::CarTelemetry,
            Packet::CarStatus(_) => PacketKind::CarStatus,
            Packet::FinalClassification(_) => PacketKind::FinalClassification,
            Packet::LobbyInfo(_) => PacketKind::LobbyInfo,
        }
    }

    pub fn header(&self) -> &PacketHeader {
        match self {
            Packet::Motion(p) => &p.header,
            Packet::Session(p) => &p.header,
            Packet::Lap(p) => &p.header,
            Packet::Event(p) => &p.header,
            Packet::Participants(p) => &p.header,
            Packet::CarSetups(p) => &p.header,
            Packet::CarTelemetry(p) => &p.header,
            Packet::CarStatus(p) => &p.header,
            Packet::FinalClassification(p) => &p.header,
            Packet::LobbyInfo(p) => &p.header,
        }
    }
}

/// Decode one datagram.
///
/// Returns [`DecodeError::UnsupportedFormat`] for anything other than the
/// 2022 packet format and [`DecodeError::UnsupportedPacket`] for kinds this
/// crate does not decode.
pub fn decode_packet(raw: &[u8]) -> Result<Packet, DecodeError> {
    let mut r = ByteReader::new(raw);
    let header = header::parse_header(&mut r)?;
    if header.packet_format != PACKET_FORMAT_2022 {
        return Err(DecodeError::UnsupportedFormat(header.packet_format));
    }

    let kind = PacketKind::from_id(header.packet_id)
        .ok_or(DecodeError::UnsupportedPacket(header.packet_id))?;

    let packet = match kind {
        PacketKind::Motion => Packet::Motion(packets::parse_motion(header, &mut r)?),
        PacketKind::Session => Packet::Session(packets::parse_session(header, &mut r)?),
        PacketKind::Lap => Packet::Lap(packets::parse_lap(header, &mut r)?),
        PacketKind::Event => Packet::Event(packets::parse_event(header, &mut r)?),
        PacketKind::Participants => {
            Packet::Participants(packets::parse_participants(header, &mut r)?)
        }
        PacketKind::CarSetups => Packet::CarSetups(packets::parse_car_setups(header, &mut r)?),
        PacketKind::CarTelemetry => {
            Packet::CarTelemetry(packets::parse_car_telemetry(header, &mut r)?)
        }
        PacketKind::CarStatus => Packet::CarStatus(packets::parse_car_status(header, &mut r)?),
        PacketKind::FinalClassification => {
            Packet::FinalClassification(packets::parse_final_classification(header, &mut r)?)
        }
        PacketKind::LobbyInfo => Packet::LobbyInfo(packets::parse_lobby_info(header, &mut r)?),
        PacketKind::CarDamage | PacketKind::SessionHistory | PacketKind::ScriptStartup => {
            return Err(DecodeError::UnsupportedPacket(header.packet_id));
        }
    };
    Ok(packet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{build_header_bytes, build_lap_packet};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn header_only_buffer_is_truncated_for_known_kind() {
        let raw = build_header_bytes(PACKET_FORMAT_2022, 6, 0);
        assert!(matches!(
            decode_packet(&raw),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn wrong_format_is_rejected_before_body_parsing() {
        let raw = build_header_bytes(2023, 6, 0);
        let result = decode_packet(&raw);
        assert!(matches!(result, Err(DecodeError::UnsupportedFormat(2023))));
        assert!(result.is_err_and(|e| e.is_unsupported()));
    }

    #[test]
    fn car_damage_and_history_are_unsupported() {
        for id in [10u8, 11, 42] {
            let raw = build_header_bytes(PACKET_FORMAT_2022, id, 0);
            assert!(
                matches!(decode_packet(&raw), Err(DecodeError::UnsupportedPacket(got)) if got == id),
                "id {id}"
            );
        }
    }

    #[test]
    fn kind_and_header_follow_variant() -> TestResult {
        let raw = build_lap_packet(4, &[(3, 1)]);
        let packet = decode_packet(&raw)?;
        assert_eq!(packet.kind(), PacketKind::Lap);
        assert_eq!(packet.header().player_car_index, 4);
        assert_eq!(packet.header().player_slot(), 4);
        Ok(())
    }
}
