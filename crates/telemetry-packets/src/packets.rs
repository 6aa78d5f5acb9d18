//! Typed F1 2022 packet bodies and their binary parsers.
//!
//! Each per-car array is decoded for all [`NUM_CARS`] slots; slots the game
//! does not populate arrive zero-filled, which downstream shows up as an
//! empty driver name.

use serde::Serialize;

use crate::error::DecodeError;
use crate::header::PacketHeader;
use crate::reader::ByteReader;

// ── Layout constants ──────────────────────────────────────────────────────────

/// Car slots carried by every per-car array.
pub const NUM_CARS: usize = 22;
/// Marshal zone slots in the session packet.
pub const MAX_MARSHAL_ZONES: usize = 21;
/// Width of the fixed driver-name field.
pub const NAME_LEN: usize = 48;

pub const CAR_MOTION_ENTRY_SIZE: usize = 60;
pub const LAP_DATA_ENTRY_SIZE: usize = 43;
pub const PARTICIPANT_ENTRY_SIZE: usize = 56;
pub const CAR_SETUP_ENTRY_SIZE: usize = 49;
pub const CAR_TELEMETRY_ENTRY_SIZE: usize = 60;
pub const CAR_STATUS_ENTRY_SIZE: usize = 47;
pub const FINAL_CLASSIFICATION_ENTRY_SIZE: usize = 45;
pub const LOBBY_INFO_ENTRY_SIZE: usize = 53;
pub const MARSHAL_ZONE_ENTRY_SIZE: usize = 5;

// ── Motion (id 0) ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CarMotionData {
    pub world_position_x: f32,
    pub world_position_y: f32,
    pub world_position_z: f32,
    pub world_velocity_x: f32,
    pub world_velocity_y: f32,
    pub world_velocity_z: f32,
    pub world_forward_dir_x: i16,
    pub world_forward_dir_y: i16,
    pub world_forward_dir_z: i16,
    pub world_right_dir_x: i16,
    pub world_right_dir_y: i16,
    pub world_right_dir_z: i16,
    pub g_force_lateral: f32,
    pub g_force_longitudinal: f32,
    pub g_force_vertical: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

/// Motion packet. The per-wheel arrays and local/angular vectors describe
/// the player car only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketMotionData {
    pub header: PacketHeader,
    pub car_motion_data: Vec<CarMotionData>,
    /// Wheel order for all per-wheel arrays: RL, RR, FL, FR.
    pub suspension_position: [f32; 4],
    pub suspension_velocity: [f32; 4],
    pub suspension_acceleration: [f32; 4],
    pub wheel_speed: [f32; 4],
    pub wheel_slip: [f32; 4],
    pub local_velocity_x: f32,
    pub local_velocity_y: f32,
    pub local_velocity_z: f32,
    pub angular_velocity_x: f32,
    pub angular_velocity_y: f32,
    pub angular_velocity_z: f32,
    pub angular_acceleration_x: f32,
    pub angular_acceleration_y: f32,
    pub angular_acceleration_z: f32,
    pub front_wheels_angle: f32,
}

fn parse_car_motion(r: &mut ByteReader<'_>) -> Result<CarMotionData, DecodeError> {
    Ok(CarMotionData {
        world_position_x: r.f32_le()?,
        world_position_y: r.f32_le()?,
        world_position_z: r.f32_le()?,
        world_velocity_x: r.f32_le()?,
        world_velocity_y: r.f32_le()?,
        world_velocity_z: r.f32_le()?,
        world_forward_dir_x: r.i16_le()?,
        world_forward_dir_y: r.i16_le()?,
        world_forward_dir_z: r.i16_le()?,
        world_right_dir_x: r.i16_le()?,
        world_right_dir_y: r.i16_le()?,
        world_right_dir_z: r.i16_le()?,
        g_force_lateral: r.f32_le()?,
        g_force_longitudinal: r.f32_le()?,
        g_force_vertical: r.f32_le()?,
        yaw: r.f32_le()?,
        pitch: r.f32_le()?,
        roll: r.f32_le()?,
    })
}

pub(crate) fn parse_motion(
    header: PacketHeader,
    r: &mut ByteReader<'_>,
) -> Result<PacketMotionData, DecodeError> {
    let car_motion_data = parse_cars(r, parse_car_motion)?;
    Ok(PacketMotionData {
        header,
        car_motion_data,
        suspension_position: r.f32_le_array::<4>()?,
        suspension_velocity: r.f32_le_array::<4>()?,
        suspension_acceleration: r.f32_le_array::<4>()?,
        wheel_speed: r.f32_le_array::<4>()?,
        wheel_slip: r.f32_le_array::<4>()?,
        local_velocity_x: r.f32_le()?,
        local_velocity_y: r.f32_le()?,
        local_velocity_z: r.f32_le()?,
        angular_velocity_x: r.f32_le()?,
        angular_velocity_y: r.f32_le()?,
        angular_velocity_z: r.f32_le()?,
        angular_acceleration_x: r.f32_le()?,
        angular_acceleration_y: r.f32_le()?,
        angular_acceleration_z: r.f32_le()?,
        front_wheels_angle: r.f32_le()?,
    })
}

// ── Session (id 1) ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarshalZone {
    /// Fraction (0..1) of the lap where the zone starts.
    pub zone_start: f32,
    /// -1 invalid/unknown, 0 none, 1 green, 2 blue, 3 yellow, 4 red.
    pub zone_flag: i8,
}

/// Session packet, decoded up to the network-game flag. Weather forecast
/// samples and the trailing assist settings are not decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketSessionData {
    pub header: PacketHeader,
    pub weather: u8,
    pub track_temperature: i8,
    pub air_temperature: i8,
    pub total_laps: u8,
    pub track_length: u16,
    pub session_type: u8,
    pub track_id: i8,
    pub formula: u8,
    pub session_time_left: u16,
    pub session_duration: u16,
    pub pit_speed_limit: u8,
    pub game_paused: u8,
    pub is_spectating: u8,
    pub spectator_car_index: u8,
    pub sli_pro_native_support: u8,
    pub num_marshal_zones: u8,
    pub marshal_zones: Vec<MarshalZone>,
    pub safety_car_status: u8,
    pub network_game: u8,
}

pub(crate) fn parse_session(
    header: PacketHeader,
    r: &mut ByteReader<'_>,
) -> Result<PacketSessionData, DecodeError> {
    let weather = r.u8()?;
    let track_temperature = r.i8()?;
    let air_temperature = r.i8()?;
    let total_laps = r.u8()?;
    let track_length = r.u16_le()?;
    let session_type = r.u8()?;
    let track_id = r.i8()?;
    let formula = r.u8()?;
    let session_time_left = r.u16_le()?;
    let session_duration = r.u16_le()?;
    let pit_speed_limit = r.u8()?;
    let game_paused = r.u8()?;
    let is_spectating = r.u8()?;
    let spectator_car_index = r.u8()?;
    let sli_pro_native_support = r.u8()?;
    let num_marshal_zones = r.u8()?;
    let mut marshal_zones = Vec::with_capacity(MAX_MARSHAL_ZONES);
    for _ in 0..MAX_MARSHAL_ZONES {
        marshal_zones.push(MarshalZone {
            zone_start: r.f32_le()?,
            zone_flag: r.i8()?,
        });
    }
    let safety_car_status = r.u8()?;
    let network_game = r.u8()?;

    Ok(PacketSessionData {
        header,
        weather,
        track_temperature,
        air_temperature,
        total_laps,
        track_length,
        session_type,
        track_id,
        formula,
        session_time_left,
        session_duration,
        pit_speed_limit,
        game_paused,
        is_spectating,
        spectator_car_index,
        sli_pro_native_support,
        num_marshal_zones,
        marshal_zones,
        safety_car_status,
        network_game,
    })
}

// ── Lap (id 2) ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LapData {
    pub last_lap_time_in_ms: u32,
    pub current_lap_time_in_ms: u32,
    pub sector1_time_in_ms: u16,
    pub sector2_time_in_ms: u16,
    pub lap_distance: f32,
    pub total_distance: f32,
    pub safety_car_delta: f32,
    pub car_position: u8,
    pub current_lap_num: u8,
    pub pit_status: u8,
    pub num_pit_stops: u8,
    /// 0 = sector 1, 1 = sector 2, 2 = sector 3.
    pub sector: u8,
    pub current_lap_invalid: u8,
    pub penalties: u8,
    pub warnings: u8,
    pub num_unserved_drive_through_pens: u8,
    pub num_unserved_stop_go_pens: u8,
    pub grid_position: u8,
    pub driver_status: u8,
    pub result_status: u8,
    pub pit_lane_timer_active: u8,
    pub pit_lane_time_in_lane_in_ms: u16,
    pub pit_stop_timer_in_ms: u16,
    pub pit_stop_should_serve_pen: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketLapData {
    pub header: PacketHeader,
    pub lap_data: Vec<LapData>,
    pub time_trial_pb_car_idx: u8,
    pub time_trial_rival_car_idx: u8,
}

fn parse_lap_entry(r: &mut ByteReader<'_>) -> Result<LapData, DecodeError> {
    Ok(LapData {
        last_lap_time_in_ms: r.u32_le()?,
        current_lap_time_in_ms: r.u32_le()?,
        sector1_time_in_ms: r.u16_le()?,
        sector2_time_in_ms: r.u16_le()?,
        lap_distance: r.f32_le()?,
        total_distance: r.f32_le()?,
        safety_car_delta: r.f32_le()?,
        car_position: r.u8()?,
        current_lap_num: r.u8()?,
        pit_status: r.u8()?,
        num_pit_stops: r.u8()?,
        sector: r.u8()?,
        current_lap_invalid: r.u8()?,
        penalties: r.u8()?,
        warnings: r.u8()?,
        num_unserved_drive_through_pens: r.u8()?,
        num_unserved_stop_go_pens: r.u8()?,
        grid_position: r.u8()?,
        driver_status: r.u8()?,
        result_status: r.u8()?,
        pit_lane_timer_active: r.u8()?,
        pit_lane_time_in_lane_in_ms: r.u16_le()?,
        pit_stop_timer_in_ms: r.u16_le()?,
        pit_stop_should_serve_pen: r.u8()?,
    })
}

pub(crate) fn parse_lap(
    header: PacketHeader,
    r: &mut ByteReader<'_>,
) -> Result<PacketLapData, DecodeError> {
    Ok(PacketLapData {
        header,
        lap_data: parse_cars(r, parse_lap_entry)?,
        time_trial_pb_car_idx: r.u8()?,
        time_trial_rival_car_idx: r.u8()?,
    })
}

// ── Event (id 3) ──────────────────────────────────────────────────────────────

/// Event-specific payload. Codes without a payload decode to `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventDetails {
    FastestLap {
        vehicle_idx: u8,
        lap_time: f32,
    },
    Vehicle {
        vehicle_idx: u8,
    },
    Penalty {
        penalty_type: u8,
        infringement_type: u8,
        vehicle_idx: u8,
        other_vehicle_idx: u8,
        time: u8,
        lap_num: u8,
        places_gained: u8,
    },
    SpeedTrap {
        vehicle_idx: u8,
        speed: f32,
        is_overall_fastest_in_session: u8,
        is_driver_fastest_in_session: u8,
        fastest_vehicle_idx_in_session: u8,
        fastest_speed_in_session: f32,
    },
    StartLights {
        num_lights: u8,
    },
    Flashback {
        flashback_frame_identifier: u32,
        flashback_session_time: f32,
    },
    Buttons {
        button_status: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketEventData {
    pub header: PacketHeader,
    /// Four-letter event code, e.g. `FTLP`, `PENA`, `SSTA`.
    pub event_string_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_details: Option<EventDetails>,
}

pub(crate) fn parse_event(
    header: PacketHeader,
    r: &mut ByteReader<'_>,
) -> Result<PacketEventData, DecodeError> {
    let code = r.u8_array::<4>()?;
    let event_string_code = String::from_utf8_lossy(&code).into_owned();

    let event_details = match &code {
        b"FTLP" => Some(EventDetails::FastestLap {
            vehicle_idx: r.u8()?,
            lap_time: r.f32_le()?,
        }),
        b"RTMT" | b"TMPT" | b"RCWN" | b"DTSV" | b"SGSV" => Some(EventDetails::Vehicle {
            vehicle_idx: r.u8()?,
        }),
        b"PENA" => Some(EventDetails::Penalty {
            penalty_type: r.u8()?,
            infringement_type: r.u8()?,
            vehicle_idx: r.u8()?,
            other_vehicle_idx: r.u8()?,
            time: r.u8()?,
            lap_num: r.u8()?,
            places_gained: r.u8()?,
        }),
        b"SPTP" => Some(EventDetails::SpeedTrap {
            vehicle_idx: r.u8()?,
            speed: r.f32_le()?,
            is_overall_fastest_in_session: r.u8()?,
            is_driver_fastest_in_session: r.u8()?,
            fastest_vehicle_idx_in_session: r.u8()?,
            fastest_speed_in_session: r.f32_le()?,
        }),
        b"STLG" => Some(EventDetails::StartLights {
            num_lights: r.u8()?,
        }),
        b"FLBK" => Some(EventDetails::Flashback {
            flashback_frame_identifier: r.u32_le()?,
            flashback_session_time: r.f32_le()?,
        }),
        b"BUTN" => Some(EventDetails::Buttons {
            button_status: r.u32_le()?,
        }),
        // SSTA, SEND, DRSE, DRSD, CHQF, LGOT carry no payload.
        _ => None,
    };

    Ok(PacketEventData {
        header,
        event_string_code,
        event_details,
    })
}

// ── Participants (id 4) ───────────────────────────────────────────────────────

/// Driver identity for one car slot; the roster entry of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParticipantData {
    pub ai_controlled: u8,
    pub driver_id: u8,
    pub network_id: u8,
    pub team_id: u8,
    pub my_team: u8,
    pub race_number: u8,
    pub nationality: u8,
    /// Empty for unpopulated slots.
    pub name: String,
    pub your_telemetry: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketParticipantsData {
    pub header: PacketHeader,
    pub num_active_cars: u8,
    pub participants: Vec<ParticipantData>,
}

fn parse_participant(r: &mut ByteReader<'_>) -> Result<ParticipantData, DecodeError> {
    Ok(ParticipantData {
        ai_controlled: r.u8()?,
        driver_id: r.u8()?,
        network_id: r.u8()?,
        team_id: r.u8()?,
        my_team: r.u8()?,
        race_number: r.u8()?,
        nationality: r.u8()?,
        name: r.fixed_str::<NAME_LEN>()?,
        your_telemetry: r.u8()?,
    })
}

pub(crate) fn parse_participants(
    header: PacketHeader,
    r: &mut ByteReader<'_>,
) -> Result<PacketParticipantsData, DecodeError> {
    let num_active_cars = r.u8()?;
    Ok(PacketParticipantsData {
        header,
        num_active_cars,
        participants: parse_cars(r, parse_participant)?,
    })
}

// ── Car setups (id 5) ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CarSetupData {
    pub front_wing: u8,
    pub rear_wing: u8,
    pub on_throttle: u8,
    pub off_throttle: u8,
    pub front_camber: f32,
    pub rear_camber: f32,
    pub front_toe: f32,
    pub rear_toe: f32,
    pub front_suspension: u8,
    pub rear_suspension: u8,
    pub front_anti_roll_bar: u8,
    pub rear_anti_roll_bar: u8,
    pub front_suspension_height: u8,
    pub rear_suspension_height: u8,
    pub brake_pressure: u8,
    pub brake_bias: u8,
    pub rear_left_tyre_pressure: f32,
    pub rear_right_tyre_pressure: f32,
    pub front_left_tyre_pressure: f32,
    pub front_right_tyre_pressure: f32,
    pub ballast: u8,
    pub fuel_load: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketCarSetupData {
    pub header: PacketHeader,
    pub car_setups: Vec<CarSetupData>,
}

fn parse_car_setup(r: &mut ByteReader<'_>) -> Result<CarSetupData, DecodeError> {
    Ok(CarSetupData {
        front_wing: r.u8()?,
        rear_wing: r.u8()?,
        on_throttle: r.u8()?,
        off_throttle: r.u8()?,
        front_camber: r.f32_le()?,
        rear_camber: r.f32_le()?,
        front_toe: r.f32_le()?,
        rear_toe: r.f32_le()?,
        front_suspension: r.u8()?,
        rear_suspension: r.u8()?,
        front_anti_roll_bar: r.u8()?,
        rear_anti_roll_bar: r.u8()?,
        front_suspension_height: r.u8()?,
        rear_suspension_height: r.u8()?,
        brake_pressure: r.u8()?,
        brake_bias: r.u8()?,
        rear_left_tyre_pressure: r.f32_le()?,
        rear_right_tyre_pressure: r.f32_le()?,
        front_left_tyre_pressure: r.f32_le()?,
        front_right_tyre_pressure: r.f32_le()?,
        ballast: r.u8()?,
        fuel_load: r.f32_le()?,
    })
}

pub(crate) fn parse_car_setups(
    header: PacketHeader,
    r: &mut ByteReader<'_>,
) -> Result<PacketCarSetupData, DecodeError> {
    Ok(PacketCarSetupData {
        header,
        car_setups: parse_cars(r, parse_car_setup)?,
    })
}

// ── Car telemetry (id 6) ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CarTelemetryData {
    /// km/h.
    pub speed: u16,
    pub throttle: f32,
    pub steer: f32,
    pub brake: f32,
    pub clutch: u8,
    /// -1 reverse, 0 neutral, 1-8 forward.
    pub gear: i8,
    pub engine_rpm: u16,
    pub drs: u8,
    pub rev_lights_percent: u8,
    pub rev_lights_bit_value: u16,
    /// Wheel order for all per-wheel arrays: RL, RR, FL, FR.
    pub brakes_temperature: [u16; 4],
    pub tyres_surface_temperature: [u8; 4],
    pub tyres_inner_temperature: [u8; 4],
    pub engine_temperature: u16,
    pub tyres_pressure: [f32; 4],
    pub surface_type: [u8; 4],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketCarTelemetryData {
    pub header: PacketHeader,
    pub car_telemetry_data: Vec<CarTelemetryData>,
    pub mfd_panel_index: u8,
    pub mfd_panel_index_secondary_player: u8,
    pub suggested_gear: i8,
}

fn parse_car_telemetry_entry(r: &mut ByteReader<'_>) -> Result<CarTelemetryData, DecodeError> {
    Ok(CarTelemetryData {
        speed: r.u16_le()?,                         // 0-1
        throttle: r.f32_le()?,                      // 2-5
        steer: r.f32_le()?,                         // 6-9
        brake: r.f32_le()?,                         // 10-13
        clutch: r.u8()?,                            // 14
        gear: r.i8()?,                              // 15
        engine_rpm: r.u16_le()?,                    // 16-17
        drs: r.u8()?,                               // 18
        rev_lights_percent: r.u8()?,                // 19
        rev_lights_bit_value: r.u16_le()?,          // 20-21
        brakes_temperature: r.u16_le_array::<4>()?, // 22-29
        tyres_surface_temperature: r.u8_array::<4>()?, // 30-33
        tyres_inner_temperature: r.u8_array::<4>()?, // 34-37
        engine_temperature: r.u16_le()?,            // 38-39
        tyres_pressure: r.f32_le_array::<4>()?,     // 40-55
        surface_type: r.u8_array::<4>()?,           // 56-59
    })
}

pub(crate) fn parse_car_telemetry(
    header: PacketHeader,
    r: &mut ByteReader<'_>,
) -> Result<PacketCarTelemetryData, DecodeError> {
    Ok(PacketCarTelemetryData {
        header,
        car_telemetry_data: parse_cars(r, parse_car_telemetry_entry)?,
        mfd_panel_index: r.u8()?,
        mfd_panel_index_secondary_player: r.u8()?,
        suggested_gear: r.i8()?,
    })
}

// ── Car status (id 7) ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CarStatusData {
    pub traction_control: u8,
    pub anti_lock_brakes: u8,
    pub fuel_mix: u8,
    pub front_brake_bias: u8,
    pub pit_limiter_status: u8,
    /// kg.
    pub fuel_in_tank: f32,
    pub fuel_capacity: f32,
    pub fuel_remaining_laps: f32,
    pub max_rpm: u16,
    pub idle_rpm: u16,
    pub max_gears: u8,
    pub drs_allowed: u8,
    pub drs_activation_distance: u16,
    pub actual_tyre_compound: u8,
    pub visual_tyre_compound: u8,
    pub tyres_age_laps: u8,
    pub vehicle_fia_flags: i8,
    /// Joules.
    pub ers_store_energy: f32,
    pub ers_deploy_mode: u8,
    pub ers_harvested_this_lap_mguk: f32,
    pub ers_harvested_this_lap_mguh: f32,
    pub ers_deployed_this_lap: f32,
    pub network_paused: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketCarStatusData {
    pub header: PacketHeader,
    pub car_status_data: Vec<CarStatusData>,
}

fn parse_car_status_entry(r: &mut ByteReader<'_>) -> Result<CarStatusData, DecodeError> {
    Ok(CarStatusData {
        traction_control: r.u8()?,            // 0
        anti_lock_brakes: r.u8()?,            // 1
        fuel_mix: r.u8()?,                    // 2
        front_brake_bias: r.u8()?,            // 3
        pit_limiter_status: r.u8()?,          // 4
        fuel_in_tank: r.f32_le()?,            // 5-8
        fuel_capacity: r.f32_le()?,           // 9-12
        fuel_remaining_laps: r.f32_le()?,     // 13-16
        max_rpm: r.u16_le()?,                 // 17-18
        idle_rpm: r.u16_le()?,                // 19-20
        max_gears: r.u8()?,                   // 21
        drs_allowed: r.u8()?,                 // 22
        drs_activation_distance: r.u16_le()?, // 23-24
        actual_tyre_compound: r.u8()?,        // 25
        visual_tyre_compound: r.u8()?,        // 26
        tyres_age_laps: r.u8()?,              // 27
        vehicle_fia_flags: r.i8()?,           // 28
        ers_store_energy: r.f32_le()?,        // 29-32
        ers_deploy_mode: r.u8()?,             // 33
        ers_harvested_this_lap_mguk: r.f32_le()?, // 34-37
        ers_harvested_this_lap_mguh: r.f32_le()?, // 38-41
        ers_deployed_this_lap: r.f32_le()?,   // 42-45
        network_paused: r.u8()?,              // 46
    })
}

pub(crate) fn parse_car_status(
    header: PacketHeader,
    r: &mut ByteReader<'_>,
) -> Result<PacketCarStatusData, DecodeError> {
    Ok(PacketCarStatusData {
        header,
        car_status_data: parse_cars(r, parse_car_status_entry)?,
    })
}

// ── Final classification (id 8) ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinalClassificationData {
    pub position: u8,
    pub num_laps: u8,
    pub grid_position: u8,
    pub points: u8,
    pub num_pit_stops: u8,
    pub result_status: u8,
    pub best_lap_time_in_ms: u32,
    /// Seconds, without penalties.
    pub total_race_time: f64,
    pub penalties_time: u8,
    pub num_penalties: u8,
    pub num_tyre_stints: u8,
    pub tyre_stints_actual: [u8; 8],
    pub tyre_stints_visual: [u8; 8],
    pub tyre_stints_end_laps: [u8; 8],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketFinalClassificationData {
    pub header: PacketHeader,
    pub num_cars: u8,
    pub classification_data: Vec<FinalClassificationData>,
}

fn parse_classification_entry(
    r: &mut ByteReader<'_>,
) -> Result<FinalClassificationData, DecodeError> {
    Ok(FinalClassificationData {
        position: r.u8()?,
        num_laps: r.u8()?,
        grid_position: r.u8()?,
        points: r.u8()?,
        num_pit_stops: r.u8()?,
        result_status: r.u8()?,
        best_lap_time_in_ms: r.u32_le()?,
        total_race_time: r.f64_le()?,
        penalties_time: r.u8()?,
        num_penalties: r.u8()?,
        num_tyre_stints: r.u8()?,
        tyre_stints_actual: r.u8_array::<8>()?,
        tyre_stints_visual: r.u8_array::<8>()?,
        tyre_stints_end_laps: r.u8_array::<8>()?,
    })
}

pub(crate) fn parse_final_classification(
    header: PacketHeader,
    r: &mut ByteReader<'_>,
) -> Result<PacketFinalClassificationData, DecodeError> {
    let num_cars = r.u8()?;
    Ok(PacketFinalClassificationData {
        header,
        num_cars,
        classification_data: parse_cars(r, parse_classification_entry)?,
    })
}

// ── Lobby info (id 9) ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LobbyInfoData {
    pub ai_controlled: u8,
    pub team_id: u8,
    pub nationality: u8,
    pub name: String,
    pub car_number: u8,
    pub ready_status: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PacketLobbyInfoData {
    pub header: PacketHeader,
    pub num_players: u8,
    pub lobby_players: Vec<LobbyInfoData>,
}

fn parse_lobby_entry(r: &mut ByteReader<'_>) -> Result<LobbyInfoData, DecodeError> {
    Ok(LobbyInfoData {
        ai_controlled: r.u8()?,
        team_id: r.u8()?,
        nationality: r.u8()?,
        name: r.fixed_str::<NAME_LEN>()?,
        car_number: r.u8()?,
        ready_status: r.u8()?,
    })
}

pub(crate) fn parse_lobby_info(
    header: PacketHeader,
    r: &mut ByteReader<'_>,
) -> Result<PacketLobbyInfoData, DecodeError> {
    let num_players = r.u8()?;
    Ok(PacketLobbyInfoData {
        header,
        num_players,
        lobby_players: parse_cars(r, parse_lobby_entry)?,
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_cars<T>(
    r: &mut ByteReader<'_>,
    parse_entry: fn(&mut ByteReader<'_>) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    let mut cars = Vec::with_capacity(NUM_CARS);
    for _ in 0..NUM_CARS {
        cars.push(parse_entry(r)?);
    }
    Ok(cars)
}
