#![cfg(feature = "binary-cache")]

use condlang::{parse_condition, DeserializeError, ParsedCondition};

// ---------------------------------------------------------------------------
// Round-trip
// ---------------------------------------------------------------------------

#[test]
fn round_trip_conditions() {
    for text in [
        "age >= 21",
        "name is not empty",
        "status in (Open,Closed,\"\")",
        "x between (1,10)",
        "p has lastmod > 1700000000000",
    ] {
        let original = parse_condition(text).unwrap();
        let bytes = original.to_bytes().unwrap();
        let restored = ParsedCondition::from_bytes(&bytes).unwrap();
        assert_eq!(restored, original, "text {text:?}");
        assert_eq!(restored.to_string(), original.to_string());
    }
}

#[test]
fn round_trip_catch_alls() {
    for original in [ParsedCondition::untyped("a"), ParsedCondition::truthy("b")] {
        let bytes = original.to_bytes().unwrap();
        assert_eq!(ParsedCondition::from_bytes(&bytes).unwrap(), original);
    }
}

#[test]
fn output_is_deterministic() {
    let cond = parse_condition("role in (admin,owner)").unwrap();
    assert_eq!(cond.to_bytes().unwrap(), cond.to_bytes().unwrap());
}

// ---------------------------------------------------------------------------
// Corruption
// ---------------------------------------------------------------------------

fn encoded() -> Vec<u8> {
    parse_condition("age >= 21").unwrap().to_bytes().unwrap()
}

#[test]
fn bad_magic_rejected() {
    let mut bytes = encoded();
    bytes[0] = b'X';
    assert!(matches!(
        ParsedCondition::from_bytes(&bytes),
        Err(DeserializeError::BadMagic)
    ));
}

#[test]
fn version_mismatch_rejected() {
    let mut bytes = encoded();
    bytes[4..6].copy_from_slice(&99u16.to_le_bytes());
    assert!(matches!(
        ParsedCondition::from_bytes(&bytes),
        Err(DeserializeError::IncompatibleVersion { blob: 99, supported: 1 })
    ));
}

#[test]
fn flipped_payload_bit_rejected() {
    let mut bytes = encoded();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    assert!(matches!(
        ParsedCondition::from_bytes(&bytes),
        Err(DeserializeError::ChecksumMismatch)
    ));
}

#[test]
fn truncated_payload_rejected() {
    let bytes = encoded();
    assert!(matches!(
        ParsedCondition::from_bytes(&bytes[..bytes.len() - 2]),
        Err(DeserializeError::LengthMismatch { .. })
    ));
}

#[test]
fn empty_input_rejected() {
    assert!(matches!(
        ParsedCondition::from_bytes(&[]),
        Err(DeserializeError::LengthMismatch { .. })
    ));
}
