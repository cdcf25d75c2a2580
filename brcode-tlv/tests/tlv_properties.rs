//! Property-based tests for brcode-tlv

use brcode_core::error::DecodeError;
use brcode_core::field::tags;
use brcode_tlv::{Decoder, Encoder, calculate_crc16, decode_fields};
use proptest::prelude::*;

/// Non-template fields between the format indicator and the checksum.
fn fields_strategy() -> impl Strategy<Value = Vec<(u8, String)>> {
    prop::collection::vec(
        (
            prop_oneof![52u8..=61, 64u8..=99],
            "[A-Za-z0-9 .*À-ÿ]{1,40}",
        ),
        0..8,
    )
}

fn encode(fields: &[(u8, String)]) -> String {
    let mut encoder = Encoder::new();
    encoder.put_str(tags::PAYLOAD_FORMAT, "01").unwrap();
    for (tag, value) in fields {
        encoder.put_str(*tag, value).unwrap();
    }
    encoder.finish().unwrap()
}

proptest! {
    /// Decoding an encoded payload yields the same fields in order
    #[test]
    fn test_decode_recovers_fields(fields in fields_strategy()) {
        let payload = encode(&fields);
        let decoded = Decoder::new(payload.as_bytes()).decode().unwrap();

        let inner = &decoded.fields()[1..decoded.fields().len() - 1];
        prop_assert_eq!(inner.len(), fields.len());
        for (field, (tag, value)) in inner.iter().zip(&fields) {
            prop_assert_eq!(field.tag, *tag);
            prop_assert_eq!(field.as_str().unwrap(), value.as_str());
        }
        prop_assert_eq!(decoded.crc(), calculate_crc16(&payload.as_bytes()[..payload.len() - 4]));
    }

    /// A changed checksum digit is always reported as a mismatch
    #[test]
    fn test_altered_checksum_detected(fields in fields_strategy(), pos in 0usize..4) {
        let payload = encode(&fields);
        let mut bytes = payload.into_bytes();
        let idx = bytes.len() - 4 + pos;
        bytes[idx] = if bytes[idx] == b'0' { b'1' } else { b'0' };

        let result = Decoder::new(&bytes).decode();
        prop_assert!(
            matches!(result, Err(DecodeError::ChecksumMismatch { .. })),
            "unexpected result: {:?}",
            result
        );
    }

    /// Any byte sequence either decodes or fails with an error, never panics
    #[test]
    fn test_arbitrary_input_never_panics(input in prop::collection::vec(any::<u8>(), 0..120)) {
        let _ = Decoder::new(&input).decode();
        let _ = decode_fields(&input);
    }
}
