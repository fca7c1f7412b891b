//! Uplink ports and their telegram layouts
//!
//! Each supported port has one static [`PortSchema`]. The tables are checked
//! at compile time, so a bit address that leaves its telegram or a derived
//! field that references an unknown sibling fails the build.

use crate::core::BitAddress;
use crate::error::DecodeError;
use crate::schema::{Affine, FieldSpec, PortSchema, Transform};

const fn bits(start_byte: usize, start_bit: u8, end_byte: usize, end_bit: u8) -> BitAddress {
    BitAddress::new_unchecked(start_byte, start_bit, end_byte, end_bit)
}

const fn scaled(scale: f64) -> Transform {
    Transform::Float(Affine::new(scale, 0.0))
}

const fn affine(scale: f64, offset: f64) -> Transform {
    Transform::Float(Affine::new(scale, offset))
}

const fn times(scale: i64) -> Transform {
    Transform::Integer { scale, offset: 0 }
}

/// Each 5-bit energy share counts in 1/32 of the total
const ENERGY_SHARE: f64 = 100.0 / 32.0;

/// Degrees per unit of the condensed 24-bit coordinates
const CONDENSED_DEGREES: f64 = 256e-7;

pub const POSITION: PortSchema = PortSchema {
    port: 1,
    message_type: "position",
    size: 11,
    fields: &[
        FieldSpec::signed("latitude_in_deg", bits(0, 0, 3, 7), scaled(1e-7)),
        FieldSpec::signed("longitude_in_deg", bits(4, 0, 7, 7), scaled(1e-7)),
        FieldSpec::raw("in_trip", BitAddress::bit(8, 0)),
        FieldSpec::raw("fix_failed", BitAddress::bit(8, 1)),
        FieldSpec::unsigned("heading_in_deg", bits(8, 2, 8, 7), scaled(5.625)),
        FieldSpec::raw("speed_in_kmh", BitAddress::bytes(9, 9)),
        FieldSpec::unsigned("battery_voltage_in_V", BitAddress::bytes(10, 10), scaled(0.025)),
    ],
};

/// Byte 5 is reserved.
pub const DOWNLINK_ACK: PortSchema = PortSchema {
    port: 2,
    message_type: "downlink_ack",
    size: 6,
    fields: &[
        FieldSpec::raw("sequence_number", bits(0, 0, 0, 6)),
        FieldSpec::raw("accepted", BitAddress::bit(0, 7)),
        FieldSpec::raw("firmware_major_version", BitAddress::bytes(1, 1)),
        FieldSpec::raw("firmware_minor_version", BitAddress::bytes(2, 2)),
        FieldSpec::raw("product_id", BitAddress::bytes(3, 3)),
        FieldSpec::raw("hardware_revision", BitAddress::bytes(4, 4)),
    ],
};

pub const STATS: PortSchema = PortSchema {
    port: 3,
    message_type: "stats",
    size: 11,
    fields: &[
        FieldSpec::unsigned("initial_battery_voltage_in_V", bits(0, 0, 0, 3), affine(0.1, 4.0)),
        FieldSpec::unsigned("tx_count", bits(0, 4, 1, 6), times(32)),
        FieldSpec::unsigned("trip_count", bits(1, 7, 3, 3), times(32)),
        FieldSpec::unsigned("gps_successes", bits(3, 4, 4, 5), times(32)),
        FieldSpec::unsigned("gps_fails", bits(4, 6, 5, 5), times(32)),
        FieldSpec::raw("average_gps_fix_time_in_s", bits(5, 6, 6, 6)),
        FieldSpec::raw("average_gps_fail_time_in_s", bits(6, 7, 7, 7)),
        FieldSpec::raw("average_gps_freshen_time_in_s", BitAddress::bytes(8, 8)),
        FieldSpec::raw("wakeups_per_trip", bits(9, 0, 9, 6)),
        FieldSpec::raw("uptime_in_weeks", bits(9, 7, 10, 7)),
    ],
};

/// The longitude is stored against a fixed 2^24 bias and the battery scale
/// flag (byte 8, bit 7) selects between two voltage formulas.
pub const CONDENSED_POSITION: PortSchema = PortSchema {
    port: 4,
    message_type: "position",
    size: 9,
    fields: &[
        FieldSpec::signed("latitude_in_deg", BitAddress::bytes(0, 2), scaled(CONDENSED_DEGREES)),
        FieldSpec::unsigned(
            "longitude_in_deg",
            BitAddress::bytes(3, 5),
            Transform::Biased {
                bias: 1 << 24,
                scale: CONDENSED_DEGREES,
            },
        ),
        FieldSpec::unsigned("heading_in_deg", bits(6, 0, 6, 2), scaled(45.0)),
        FieldSpec::unsigned("speed_in_kmh", bits(6, 3, 6, 7), times(5)),
        FieldSpec::unsigned(
            "battery_voltage",
            BitAddress::bytes(7, 7),
            Transform::Switch {
                flag: BitAddress::bit(8, 7),
                set: Affine::new(32.0, 3.5),
                clear: Affine::new(25.0, 0.0),
            },
        ),
        FieldSpec::raw("in_trip", BitAddress::bit(8, 0)),
        FieldSpec::raw("fix_failed", BitAddress::bit(8, 1)),
        FieldSpec::raw("man_down", BitAddress::bit(8, 2)),
        FieldSpec::raw("battery_scale", BitAddress::bit(8, 7)),
    ],
};

pub const DEVICE_INFO: PortSchema = PortSchema {
    port: 30,
    message_type: "device_info",
    size: 8,
    fields: &[
        FieldSpec::raw("firmware_major_version", BitAddress::bytes(0, 0)),
        FieldSpec::raw("firmware_minor_version", BitAddress::bytes(1, 1)),
        FieldSpec::raw("product_id", BitAddress::bytes(2, 2)),
        FieldSpec::raw("hardware_revision", BitAddress::bytes(3, 3)),
        FieldSpec::raw("power_on_reset", BitAddress::bit(4, 0)),
        FieldSpec::raw("watchdog_rest", BitAddress::bit(4, 1)),
        FieldSpec::raw("external_reset", BitAddress::bit(4, 2)),
        FieldSpec::raw("software_reset", BitAddress::bit(4, 3)),
        FieldSpec::raw("watchdog_reset_code", BitAddress::bytes(5, 6)),
        FieldSpec::unsigned(
            "battery_voltage_in_mV",
            BitAddress::bytes(7, 7),
            Transform::Integer {
                scale: 32,
                offset: 3500,
            },
        ),
    ],
};

/// Bits 6 and 7 of byte 10 are reserved.
pub const STATS_V3: PortSchema = PortSchema {
    port: 31,
    message_type: "stats",
    size: 11,
    fields: &[
        FieldSpec::raw("time_to_first_fix_in_s", BitAddress::bytes(0, 0)),
        FieldSpec::raw("wakeups_per_trip", BitAddress::bytes(1, 1)),
        FieldSpec::unsigned("initial_battery_voltage_in_V", bits(2, 0, 2, 3), affine(0.1, 4.0)),
        FieldSpec::unsigned("tx_count", bits(2, 4, 3, 7), times(32)),
        FieldSpec::unsigned("trip_count", bits(4, 0, 5, 4), times(32)),
        FieldSpec::raw("uptime_in_weeks", bits(5, 5, 6, 7)),
        FieldSpec::unsigned("energy_used_in_mAh", bits(7, 0, 8, 1), times(2)),
        FieldSpec::unsigned("percentage_energy_lora_tx", bits(8, 2, 8, 6), scaled(ENERGY_SHARE)),
        FieldSpec::unsigned("percentage_energy_gnss_success", bits(8, 7, 9, 3), scaled(ENERGY_SHARE)),
        FieldSpec::unsigned("percentage_energy_gnss_fail", bits(9, 4, 10, 0), scaled(ENERGY_SHARE)),
        FieldSpec::unsigned("percentage_energy_sleep", bits(10, 1, 10, 5), scaled(ENERGY_SHARE)),
        FieldSpec::remainder(
            "percentage_energy_wakeups",
            100.0,
            &[
                "percentage_energy_lora_tx",
                "percentage_energy_gnss_success",
                "percentage_energy_gnss_fail",
                "percentage_energy_sleep",
            ],
        ),
    ],
};

const _: () = {
    let schemas = [
        &POSITION,
        &DOWNLINK_ACK,
        &STATS,
        &CONDENSED_POSITION,
        &DEVICE_INFO,
        &STATS_V3,
    ];
    let mut i = 0;
    while i < schemas.len() {
        if schemas[i].check().is_err() {
            panic!("invalid built-in port schema");
        }
        i += 1;
    }
};

/// Uplink ports with a built-in schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Port {
    /// Full GPS fix
    Position = 1,
    /// Acknowledgement of a configuration downlink
    DownlinkAck = 2,
    /// Lifetime statistics
    Stats = 3,
    /// GPS fix with 24-bit coordinates
    CondensedPosition = 4,
    /// Firmware, hardware and reset information
    DeviceInfo = 30,
    /// Lifetime statistics with energy breakdown
    StatsV3 = 31,
}

impl Port {
    pub const ALL: [Port; 6] = [
        Port::Position,
        Port::DownlinkAck,
        Port::Stats,
        Port::CondensedPosition,
        Port::DeviceInfo,
        Port::StatsV3,
    ];

    /// Numeric port as carried by the uplink
    pub fn number(&self) -> u32 {
        *self as u32
    }

    /// Static field table of the port
    pub fn schema(&self) -> &'static PortSchema {
        match self {
            Port::Position => &POSITION,
            Port::DownlinkAck => &DOWNLINK_ACK,
            Port::Stats => &STATS,
            Port::CondensedPosition => &CONDENSED_POSITION,
            Port::DeviceInfo => &DEVICE_INFO,
            Port::StatsV3 => &STATS_V3,
        }
    }

    /// Telegram length in bytes
    pub fn size(&self) -> usize {
        self.schema().size
    }

    /// Message type, e.g. `position` or `stats`
    pub fn message_type(&self) -> &'static str {
        self.schema().message_type
    }
}

impl TryFrom<u32> for Port {
    type Error = DecodeError;

    fn try_from(value: u32) -> crate::error::Result<Self> {
        match value {
            1 => Ok(Port::Position),
            2 => Ok(Port::DownlinkAck),
            3 => Ok(Port::Stats),
            4 => Ok(Port::CondensedPosition),
            30 => Ok(Port::DeviceInfo),
            31 => Ok(Port::StatsV3),
            _ => Err(DecodeError::UnsupportedPort(value)),
        }
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "port {} ({})", self.number(), self.message_type())
    }
}
