//! Property-based fuzz tests for F1 2022 packet decoding.
//!
//! Ensures the decoder never panics on arbitrary or random input.

use f1_ingest_packets::builders::build_header_bytes;
use f1_ingest_packets::{PACKET_FORMAT_2022, decode_packet};
use proptest::prelude::*;

const F1_PACKET_MAX: usize = 2048;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Arbitrary random bytes of any length must never cause a panic.
    #[test]
    fn prop_random_bytes_no_panic(
        data in proptest::collection::vec(any::<u8>(), 0..F1_PACKET_MAX)
    ) {
        let _ = decode_packet(&data);
    }

    /// A valid 2022 header followed by random body bytes must not panic,
    /// whatever the packet id.
    #[test]
    fn prop_valid_header_random_body(
        packet_id in 0u8..16,
        body in proptest::collection::vec(any::<u8>(), 0..1500)
    ) {
        let mut data = build_header_bytes(PACKET_FORMAT_2022, packet_id, 0);
        data.extend_from_slice(&body);
        let _ = decode_packet(&data);
    }

    /// Any packet format other than 2022 is rejected as unsupported.
    #[test]
    fn prop_other_formats_rejected(format in any::<u16>().prop_filter("not 2022", |f| *f != 2022)) {
        let data = build_header_bytes(format, 6, 0);
        let result = decode_packet(&data);
        prop_assert!(result.is_err_and(|e| e.is_unsupported()));
    }
}
