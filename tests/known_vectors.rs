use tracker_telegram::{decode, DecodeError, DecodedTelegram, ErrorKind, Port, Value};

fn assert_fields(decoded: &DecodedTelegram, expected: &[(&str, Value)]) {
    let names: Vec<&str> = decoded.names().collect();
    let expected_names: Vec<&str> = expected.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, expected_names);

    for (name, value) in expected {
        let actual = decoded.get(name).unwrap();
        match (actual, value) {
            (Value::Int(a), Value::Int(b)) => assert_eq!(a, *b, "field {}", name),
            (Value::Float(a), Value::Float(b)) => {
                assert!((a - b).abs() < 1e-9, "field {}: expected {}, got {}", name, b, a)
            }
            _ => panic!("field {} has type {:?}, expected {:?}", name, actual, value),
        }
    }
}

#[test]
fn decodes_port_1_position() {
    let decoded = decode(1, "F070A0EFF8C6355B412AA0").unwrap();
    assert_eq!(decoded.message_type(), "position");
    assert_fields(
        &decoded,
        &[
            ("latitude_in_deg", Value::Float(-27.4698)),
            ("longitude_in_deg", Value::Float(153.0251)),
            ("in_trip", Value::Int(1)),
            ("fix_failed", Value::Int(0)),
            ("heading_in_deg", Value::Float(90.0)),
            ("speed_in_kmh", Value::Int(42)),
            ("battery_voltage_in_V", Value::Float(4.0)),
        ],
    );
}

#[test]
fn decodes_port_2_downlink_ack() {
    let decoded = decode(2, "850302620400").unwrap();
    assert_fields(
        &decoded,
        &[
            ("sequence_number", Value::Int(5)),
            ("accepted", Value::Int(1)),
            ("firmware_major_version", Value::Int(3)),
            ("firmware_minor_version", Value::Int(2)),
            ("product_id", Value::Int(98)),
            ("hardware_revision", Value::Int(4)),
        ],
    );
}

#[test]
fn decodes_port_3_stats() {
    let decoded = decode(3, "3581047241C1800A1E8C02").unwrap();
    assert_fields(
        &decoded,
        &[
            ("initial_battery_voltage_in_V", Value::Float(4.5)),
            ("tx_count", Value::Int(608)),
            ("trip_count", Value::Int(33056)),
            ("gps_successes", Value::Int(736)),
            ("gps_fails", Value::Int(160)),
            ("average_gps_fix_time_in_s", Value::Int(3)),
            ("average_gps_fail_time_in_s", Value::Int(21)),
            ("average_gps_freshen_time_in_s", Value::Int(30)),
            ("wakeups_per_trip", Value::Int(12)),
            ("uptime_in_weeks", Value::Int(5)),
        ],
    );
}

#[test]
fn decodes_port_4_condensed_position() {
    let decoded = decode(4, "EE9FEFC7355B526481").unwrap();
    assert_fields(
        &decoded,
        &[
            ("latitude_in_deg", Value::Float(-1_073_170.0 * 256e-7)),
            ("longitude_in_deg", Value::Float((5_977_543.0 - 16_777_216.0) * 256e-7)),
            ("heading_in_deg", Value::Float(90.0)),
            ("speed_in_kmh", Value::Int(50)),
            ("battery_voltage", Value::Float(3203.5)),
            ("in_trip", Value::Int(1)),
            ("fix_failed", Value::Int(0)),
            ("man_down", Value::Int(0)),
            ("battery_scale", Value::Int(1)),
        ],
    );
}

#[test]
fn decodes_port_30_device_info() {
    let decoded = decode(30, "010A62010203017A").unwrap();
    assert_eq!(decoded.message_type(), "device_info");
    assert_fields(
        &decoded,
        &[
            ("firmware_major_version", Value::Int(1)),
            ("firmware_minor_version", Value::Int(10)),
            ("product_id", Value::Int(98)),
            ("hardware_revision", Value::Int(1)),
            ("power_on_reset", Value::Int(0)),
            ("watchdog_rest", Value::Int(1)),
            ("external_reset", Value::Int(0)),
            ("software_reset", Value::Int(0)),
            ("watchdog_reset_code", Value::Int(259)),
            ("battery_voltage_in_mV", Value::Int(3500 + 32 * 122)),
        ],
    );
}

#[test]
fn decodes_port_31_stats_v3() {
    let decoded = decode(31, "1E06A30410E002C828A404").unwrap();
    assert_fields(
        &decoded,
        &[
            ("time_to_first_fix_in_s", Value::Int(30)),
            ("wakeups_per_trip", Value::Int(6)),
            ("initial_battery_voltage_in_V", Value::Float(4.3)),
            ("tx_count", Value::Int(2368)),
            ("trip_count", Value::Int(512)),
            ("uptime_in_weeks", Value::Int(23)),
            ("energy_used_in_mAh", Value::Int(400)),
            ("percentage_energy_lora_tx", Value::Float(31.25)),
            ("percentage_energy_gnss_success", Value::Float(25.0)),
            ("percentage_energy_gnss_fail", Value::Float(31.25)),
            ("percentage_energy_sleep", Value::Float(6.25)),
            ("percentage_energy_wakeups", Value::Float(6.25)),
        ],
    );
}

#[test]
fn position_view_of_port_1() {
    let position = decode(1, "F070A0EFF8C6355B412AA0").unwrap().position().unwrap();
    assert!(position.has_fix());
    assert!((position.coordinates()[0] - 153.0251).abs() < 1e-9);
}

#[test]
fn short_and_long_payloads_are_malformed() {
    for port in Port::ALL {
        let size = port.size();
        for len in [0, size - 1, size + 1] {
            let payload = "00".repeat(len);
            let err = decode(port.number(), &payload).unwrap_err();
            assert_eq!(err, DecodeError::length_mismatch(size, len), "{}", port);
        }
    }
    assert_eq!(decode(30, "010").unwrap_err().kind(), ErrorKind::MalformedPayload);
}

#[test]
fn outcomes_are_distinct() {
    assert!(decode(30, "010A62010203017A").is_ok());
    assert_eq!(decode(32, "010A62010203017A").unwrap_err().kind(), ErrorKind::UnsupportedPort);
    assert_eq!(decode(30, "010A620102").unwrap_err().kind(), ErrorKind::MalformedPayload);
}
