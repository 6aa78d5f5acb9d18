//! The 24-byte F1 2022 packet header.

use serde::Serialize;

use crate::error::DecodeError;
use crate::reader::ByteReader;

/// Size of the F1 2022 header in bytes.
pub const HEADER_SIZE: usize = 24;

/// Packet format discriminator for F1 2022.
pub const PACKET_FORMAT_2022: u16 = 2022;

/// Per-packet envelope shared by every packet kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketHeader {
    pub packet_format: u16,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    pub packet_version: u8,
    pub packet_id: u8,
    pub session_uid: u64,
    pub session_time: f32,
    pub frame_identifier: u32,
    /// Car slot of the controlled (or spectated) car.
    pub player_car_index: u8,
    /// 255 when there is no second player.
    pub secondary_player_car_index: u8,
}

impl PacketHeader {
    /// Player car slot as a `usize` index into per-car arrays.
    pub fn player_slot(&self) -> usize {
        usize::from(self.player_car_index)
    }
}

/// Parse the header from the start of a datagram.
pub fn parse_header(r: &mut ByteReader<'_>) -> Result<PacketHeader, DecodeError> {
    Ok(PacketHeader {
        packet_format: r.u16_le()?,       // 0-1
        game_major_version: r.u8()?,      // 2
        game_minor_version: r.u8()?,      // 3
        packet_version: r.u8()?,          // 4
        packet_id: r.u8()?,               // 5
        session_uid: r.u64_le()?,         // 6-13
        session_time: r.f32_le()?,        // 14-17
        frame_identifier: r.u32_le()?,    // 18-21
        player_car_index: r.u8()?,        // 22
        secondary_player_car_index: r.u8()?, // 23
    })
}
