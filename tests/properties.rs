use proptest::prelude::*;
use tracker_telegram::{decode, decode_bytes, ErrorKind, Port};

const SUPPORTED: [u32; 6] = [1, 2, 3, 4, 30, 31];

fn port() -> impl Strategy<Value = Port> {
    prop::sample::select(Port::ALL.to_vec())
}

fn port_and_payload() -> impl Strategy<Value = (Port, Vec<u8>)> {
    port().prop_flat_map(|port| (Just(port), prop::collection::vec(any::<u8>(), port.size())))
}

proptest! {
    #[test]
    fn unsupported_ports_are_rejected(number in any::<u32>(), payload in prop::collection::vec(any::<u8>(), 0..16)) {
        prop_assume!(!SUPPORTED.contains(&number));
        let err = decode_bytes(number, &payload).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::UnsupportedPort);
        let err = decode(number, &hex::encode(&payload)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::UnsupportedPort);
    }

    #[test]
    fn wrong_lengths_are_malformed(port in port(), payload in prop::collection::vec(any::<u8>(), 0..24)) {
        prop_assume!(payload.len() != port.size());
        let err = decode(port.number(), &hex::encode_upper(&payload)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::MalformedPayload);
    }

    #[test]
    fn valid_payloads_decode_deterministically((port, payload) in port_and_payload()) {
        let first = decode_bytes(port.number(), &payload).unwrap();
        let second = decode(port.number(), &hex::encode(&payload)).unwrap();
        prop_assert_eq!(first.len(), port.schema().fields.len());
        prop_assert_eq!(first.message_type(), port.message_type());
        for ((name_a, a), (name_b, b)) in first.iter().zip(second.iter()) {
            prop_assert_eq!(name_a, name_b);
            prop_assert_eq!(a.as_f64().to_bits(), b.as_f64().to_bits());
        }
    }

    #[test]
    fn energy_shares_sum_to_one_hundred(payload in prop::collection::vec(any::<u8>(), 11)) {
        let decoded = decode_bytes(31, &payload).unwrap();
        let total: f64 = decoded
            .iter()
            .filter(|(name, _)| name.starts_with("percentage_energy_"))
            .map(|(_, value)| value.as_f64())
            .sum();
        prop_assert_eq!(decoded.iter().filter(|(name, _)| name.starts_with("percentage_energy_")).count(), 5);
        prop_assert!((total - 100.0).abs() < 1e-9);
    }
}
