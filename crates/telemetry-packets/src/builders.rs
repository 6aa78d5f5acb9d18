//! Datagram builders for tests and replay tooling.
//!
//! Each builder produces a full-size packet: the cars described by the
//! caller fill the first slots, every remaining slot is zero-filled.

use crate::header::{HEADER_SIZE, PACKET_FORMAT_2022};
use crate::kind::PacketKind;
use crate::packets::{
    CAR_MOTION_ENTRY_SIZE, CAR_SETUP_ENTRY_SIZE, CAR_STATUS_ENTRY_SIZE, CAR_TELEMETRY_ENTRY_SIZE,
    FINAL_CLASSIFICATION_ENTRY_SIZE, LAP_DATA_ENTRY_SIZE, LOBBY_INFO_ENTRY_SIZE,
    MARSHAL_ZONE_ENTRY_SIZE, MAX_MARSHAL_ZONES, NAME_LEN, NUM_CARS, PARTICIPANT_ENTRY_SIZE,
};

/// Session packet bytes after the marshal zones that the decoder skips.
const SESSION_TAIL_SIZE: usize = 632 - HEADER_SIZE - 19 - MAX_MARSHAL_ZONES * MARSHAL_ZONE_ENTRY_SIZE;

/// Build a 24-byte header.
pub fn build_header_bytes(packet_format: u16, packet_id: u8, player_index: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE);
    buf.extend_from_slice(&packet_format.to_le_bytes()); // 0-1
    buf.push(1); // gameMajorVersion  (2)
    buf.push(18); // gameMinorVersion  (3)
    buf.push(1); // packetVersion  (4)
    buf.push(packet_id); // 5
    buf.extend_from_slice(&0x00C0_FFEE_u64.to_le_bytes()); // sessionUID  (6-13)
    buf.extend_from_slice(&12.5f32.to_le_bytes()); // sessionTime  (14-17)
    buf.extend_from_slice(&1000u32.to_le_bytes()); // frameIdentifier  (18-21)
    buf.push(player_index); // 22
    buf.push(255); // secondaryPlayerCarIndex  (23)
    buf
}

/// Participants packet; one entry per name, `race_number` is slot + 1.
pub fn build_participants_packet(player_index: u8, names: &[&str]) -> Vec<u8> {
    let mut buf = header_for(PacketKind::Participants, player_index);
    buf.push(count_u8(names.len())); // numActiveCars
    let entries = names.iter().enumerate().map(|(slot, name)| {
        let mut e = vec![1, 0, 0, 0, 0]; // aiControlled, driverId, networkId, teamId, myTeam
        e.push(count_u8(slot + 1)); // raceNumber
        e.push(0); // nationality
        e.extend_from_slice(&name_bytes(name));
        e.push(1); // yourTelemetry
        e
    });
    push_cars(&mut buf, PARTICIPANT_ENTRY_SIZE, entries);
    buf
}

/// Lap packet; one `(current_lap_num, sector)` pair per car.
pub fn build_lap_packet(player_index: u8, laps: &[(u8, u8)]) -> Vec<u8> {
    let mut buf = header_for(PacketKind::Lap, player_index);
    let entries = laps.iter().enumerate().map(|(slot, &(lap, sector))| {
        let mut e = Vec::with_capacity(LAP_DATA_ENTRY_SIZE);
        e.extend_from_slice(&90_000u32.to_le_bytes()); // lastLapTimeInMS
        e.extend_from_slice(&31_250u32.to_le_bytes()); // currentLapTimeInMS
        e.extend_from_slice(&[0u8; 4]); // sector1/2 times
        e.extend_from_slice(&512.0f32.to_le_bytes()); // lapDistance
        e.extend_from_slice(&4096.0f32.to_le_bytes()); // totalDistance
        e.extend_from_slice(&0.0f32.to_le_bytes()); // safetyCarDelta
        e.push(count_u8(slot + 1)); // carPosition
        e.push(lap); // currentLapNum
        e.extend_from_slice(&[0, 0]); // pitStatus, numPitStops
        e.push(sector);
        e
    });
    push_cars(&mut buf, LAP_DATA_ENTRY_SIZE, entries);
    buf.extend_from_slice(&[255, 255]); // timeTrialPBCarIdx, timeTrialRivalCarIdx
    buf
}

/// Car telemetry packet; one `(speed, gear, engine_rpm)` triple per car.
pub fn build_car_telemetry_packet(player_index: u8, cars: &[(u16, i8, u16)]) -> Vec<u8> {
    let mut buf = header_for(PacketKind::CarTelemetry, player_index);
    let entries = cars.iter().map(|&(speed, gear, rpm)| {
        let mut e = Vec::with_capacity(CAR_TELEMETRY_ENTRY_SIZE);
        e.extend_from_slice(&speed.to_le_bytes()); // 0-1
        e.extend_from_slice(&1.0f32.to_le_bytes()); // throttle
        e.extend_from_slice(&0.0f32.to_le_bytes()); // steer
        e.extend_from_slice(&0.0f32.to_le_bytes()); // brake
        e.push(0); // clutch
        e.extend_from_slice(&gear.to_le_bytes()); // 15
        e.extend_from_slice(&rpm.to_le_bytes()); // 16-17
        e.extend_from_slice(&[0, 0, 0, 0]); // drs, revLightsPercent, revLightsBitValue
        for t in [500u16, 510, 520, 530] {
            e.extend_from_slice(&t.to_le_bytes()); // brakesTemperature
        }
        e.extend_from_slice(&[90, 91, 92, 93]); // tyresSurfaceTemperature
        e.extend_from_slice(&[100, 101, 102, 103]); // tyresInnerTemperature
        e.extend_from_slice(&110u16.to_le_bytes()); // engineTemperature
        e
    });
    push_cars(&mut buf, CAR_TELEMETRY_ENTRY_SIZE, entries);
    buf.extend_from_slice(&[255, 255, 0]); // mfd panels, suggestedGear
    buf
}

/// Motion packet; one `(world_position_x, g_force_lateral)` pair per car.
/// The player-only wheel speeds are `[1.0, 2.0, 3.0, 4.0]`.
pub fn build_motion_packet(player_index: u8, cars: &[(f32, f32)]) -> Vec<u8> {
    let mut buf = header_for(PacketKind::Motion, player_index);
    let entries = cars.iter().map(|&(x, g_lat)| {
        let mut e = Vec::with_capacity(CAR_MOTION_ENTRY_SIZE);
        e.extend_from_slice(&x.to_le_bytes());
        e.extend_from_slice(&[0u8; 32]); // position y/z, velocity, dir vectors
        e.extend_from_slice(&g_lat.to_le_bytes()); // 36-39
        e
    });
    push_cars(&mut buf, CAR_MOTION_ENTRY_SIZE, entries);
    buf.extend(std::iter::repeat_n(0u8, 3 * 4 * 4)); // suspension position/velocity/acceleration
    for w in [1.0f32, 2.0, 3.0, 4.0] {
        buf.extend_from_slice(&w.to_le_bytes()); // wheelSpeed
    }
    buf.extend(std::iter::repeat_n(0u8, 4 * 4 + 10 * 4)); // wheelSlip and vectors
    buf
}

/// Session packet with the root fields the pipeline copies.
pub fn build_session_packet(
    track_id: i8,
    weather: u8,
    track_temperature: i8,
    air_temperature: i8,
    total_laps: u8,
    track_length: u16,
) -> Vec<u8> {
    let mut buf = header_for(PacketKind::Session, 0);
    buf.push(weather);
    buf.extend_from_slice(&track_temperature.to_le_bytes());
    buf.extend_from_slice(&air_temperature.to_le_bytes());
    buf.push(total_laps);
    buf.extend_from_slice(&track_length.to_le_bytes());
    buf.push(10); // sessionType: race
    buf.extend_from_slice(&track_id.to_le_bytes());
    buf.push(0); // formula
    buf.extend_from_slice(&3600u16.to_le_bytes()); // sessionTimeLeft
    buf.extend_from_slice(&7200u16.to_le_bytes()); // sessionDuration
    buf.extend_from_slice(&[80, 0, 0, 0, 0]); // pitSpeedLimit .. sliProNativeSupport
    buf.push(2); // numMarshalZones
    for (start, flag) in [(0.1f32, 1i8), (0.5, 3)] {
        buf.extend_from_slice(&start.to_le_bytes());
        buf.extend_from_slice(&flag.to_le_bytes());
    }
    buf.extend(std::iter::repeat_n(
        0u8,
        (MAX_MARSHAL_ZONES - 2) * MARSHAL_ZONE_ENTRY_SIZE,
    ));
    buf.extend(std::iter::repeat_n(0u8, SESSION_TAIL_SIZE));
    buf
}

/// Event packet with a raw `details` payload.
pub fn build_event_packet(player_index: u8, code: &[u8; 4], details: &[u8]) -> Vec<u8> {
    let mut buf = header_for(PacketKind::Event, player_index);
    buf.extend_from_slice(code);
    buf.extend_from_slice(details);
    // Event details are a 12-byte union on the wire.
    buf.extend(std::iter::repeat_n(0u8, 12usize.saturating_sub(details.len())));
    buf
}

/// Car setups packet; one `front_wing` value per car.
pub fn build_car_setups_packet(player_index: u8, front_wings: &[u8]) -> Vec<u8> {
    let mut buf = header_for(PacketKind::CarSetups, player_index);
    let entries = front_wings.iter().map(|&wing| vec![wing, wing]);
    push_cars(&mut buf, CAR_SETUP_ENTRY_SIZE, entries);
    buf
}

/// Car status packet; one `fuel_in_tank` value per car.
pub fn build_car_status_packet(player_index: u8, fuel_in_tank: &[f32]) -> Vec<u8> {
    let mut buf = header_for(PacketKind::CarStatus, player_index);
    let entries = fuel_in_tank.iter().map(|fuel| {
        let mut e = vec![0u8; 5]; // assists, fuelMix, brakeBias, pitLimiter
        e.extend_from_slice(&fuel.to_le_bytes());
        e
    });
    push_cars(&mut buf, CAR_STATUS_ENTRY_SIZE, entries);
    buf
}

/// Final classification packet; one finishing position per car.
pub fn build_final_classification_packet(player_index: u8, positions: &[u8]) -> Vec<u8> {
    let mut buf = header_for(PacketKind::FinalClassification, player_index);
    buf.push(count_u8(positions.len())); // numCars
    let entries = positions.iter().map(|&pos| {
        let mut e = vec![pos, 57, pos, 0, 1, 3]; // position .. resultStatus
        e.extend_from_slice(&88_123u32.to_le_bytes()); // bestLapTimeInMS
        e.extend_from_slice(&5_400.5f64.to_le_bytes()); // totalRaceTime
        e
    });
    push_cars(&mut buf, FINAL_CLASSIFICATION_ENTRY_SIZE, entries);
    buf
}

/// Lobby info packet; one entry per player name.
pub fn build_lobby_info_packet(names: &[&str]) -> Vec<u8> {
    let mut buf = header_for(PacketKind::LobbyInfo, 0);
    buf.push(count_u8(names.len())); // numPlayers
    let entries = names.iter().enumerate().map(|(slot, name)| {
        let mut e = vec![0, 1, 10]; // aiControlled, teamId, nationality
        e.extend_from_slice(&name_bytes(name));
        e.push(count_u8(slot + 1)); // carNumber
        e.push(1); // readyStatus
        e
    });
    push_cars(&mut buf, LOBBY_INFO_ENTRY_SIZE, entries);
    buf
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn header_for(kind: PacketKind, player_index: u8) -> Vec<u8> {
    build_header_bytes(PACKET_FORMAT_2022, kind.id(), player_index)
}

/// Append `NUM_CARS` entries of `entry_size` bytes, padding short entries
/// and missing cars with zeros. Extra entries are ignored.
fn push_cars<I>(buf: &mut Vec<u8>, entry_size: usize, entries: I)
where
    I: Iterator<Item = Vec<u8>>,
{
    let mut written = 0;
    for mut entry in entries.take(NUM_CARS) {
        entry.resize(entry_size, 0);
        buf.extend_from_slice(&entry);
        written += 1;
    }
    buf.extend(std::iter::repeat_n(0u8, (NUM_CARS - written) * entry_size));
}

fn name_bytes(name: &str) -> [u8; NAME_LEN] {
    let mut out = [0u8; NAME_LEN];
    // Keep at least one trailing NUL.
    for (dst, src) in out.iter_mut().zip(name.bytes().take(NAME_LEN - 1)) {
        *dst = src;
    }
    out
}

fn count_u8(n: usize) -> u8 {
    u8::try_from(n).unwrap_or(u8::MAX)
}
