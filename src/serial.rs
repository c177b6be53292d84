//! Binary encoding of parsed conditions for caller-side caches.
//!
//! The format is a 32-byte fixed header followed by a bincode-encoded payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"CNDL"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! The comparator is stored by token and re-resolved against the catalog on
//! decode, so a blob never carries comparator metadata of its own.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::types::{Comparator, ComparatorDef, ParsedCondition};

const MAGIC: &[u8; 4] = b"CNDL";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

/// Errors that can occur when encoding a [`ParsedCondition`].
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode condition: {0}")]
    Encode(#[from] bincode::error::EncodeError),
}

/// Errors that can occur when decoding a [`ParsedCondition`].
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a condition blob: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedCondition {
    subject: String,
    comparator: Comparator,
    token: Option<String>,
    controls: Vec<String>,
    /// BLAKE3 of the canonical condition text.
    canonical_digest: [u8; 32],
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

fn to_serialized(condition: &ParsedCondition) -> SerializedCondition {
    let def = condition.comparator();
    SerializedCondition {
        subject: condition.subject().to_owned(),
        comparator: def.comparator,
        token: def.token.map(str::to_owned),
        controls: condition.controls().to_vec(),
        canonical_digest: *blake3::hash(condition.to_string().as_bytes()).as_bytes(),
    }
}

fn from_serialized(ser: SerializedCondition) -> Result<ParsedCondition, DeserializeError> {
    let def = resolve(&ser)?;

    if !def.arity.accepts(ser.controls.len()) {
        return Err(DeserializeError::Validation(format!(
            "'{def}' expects {} control(s) but payload has {}",
            def.arity,
            ser.controls.len()
        )));
    }

    let condition = ParsedCondition::new(ser.subject, def, ser.controls);
    if *blake3::hash(condition.to_string().as_bytes()).as_bytes() != ser.canonical_digest {
        return Err(DeserializeError::Validation(
            "canonical text does not match recorded digest".to_owned(),
        ));
    }

    Ok(condition)
}

fn resolve(ser: &SerializedCondition) -> Result<&'static ComparatorDef, DeserializeError> {
    let catalog = Catalog::global();
    let def = match ser.token.as_deref() {
        Some(token) => catalog.find(Some(token)).ok_or_else(|| {
            DeserializeError::Validation(format!("unknown comparator token '{token}'"))
        })?,
        None => match ser.comparator {
            Comparator::Any => catalog.any(),
            Comparator::TrueOrFalse => catalog.true_or_false(),
            other => {
                return Err(DeserializeError::Validation(format!(
                    "comparator {other:?} requires a token"
                )))
            }
        },
    };

    if def.comparator != ser.comparator {
        return Err(DeserializeError::Validation(format!(
            "token resolves to {:?} but payload says {:?}",
            def.comparator, ser.comparator
        )));
    }
    Ok(def)
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);
    let hash_bytes = hash.as_bytes();

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    #[allow(clippy::cast_possible_truncation)] // a condition will never exceed 4 GiB
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash_bytes[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    // bytes[6..8] engine version, bytes[8..12] flags: informational only
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

// ---------------------------------------------------------------------------
// Public encode/decode
// ---------------------------------------------------------------------------

pub(crate) fn encode(condition: &ParsedCondition) -> Result<Vec<u8>, SerializeError> {
    let serialized = to_serialized(condition);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<ParsedCondition, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_end = HEADER_SIZE + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[HEADER_SIZE..payload_end];

    if blake3::hash(payload).as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedCondition, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;

    from_serialized(serialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_condition;

    fn serialized(text: &str) -> SerializedCondition {
        to_serialized(&parse_condition(text).unwrap())
    }

    #[test]
    fn header_round_trip() {
        let payload = b"hello world";
        let mut buf = Vec::new();
        write_header(&mut buf, payload);
        assert_eq!(buf.len(), HEADER_SIZE);

        let (version, len, hash) = read_header(&buf).unwrap();
        assert_eq!(version, FORMAT_VERSION);
        assert_eq!(len, payload.len() as u32);
        assert_eq!(hash, blake3::hash(payload).as_bytes()[..16]);
    }

    #[test]
    fn header_bad_magic() {
        let mut buf = vec![0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(b"NOPE");
        assert!(matches!(read_header(&buf), Err(DeserializeError::BadMagic)));
    }

    #[test]
    fn header_too_short() {
        assert!(matches!(
            read_header(&[0u8; 10]),
            Err(DeserializeError::LengthMismatch { expected: 32, actual: 10 })
        ));
    }

    #[test]
    fn conversion_round_trip() {
        let original = parse_condition("status in (Open,Closed,\"\")").unwrap();
        let restored = from_serialized(to_serialized(&original)).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn catch_all_round_trip() {
        let original = ParsedCondition::truthy("flag");
        let restored = from_serialized(to_serialized(&original)).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn unknown_token_rejected() {
        let mut ser = serialized("x = 1");
        ser.token = Some(" equals ".into());
        assert!(matches!(
            from_serialized(ser),
            Err(DeserializeError::Validation(_))
        ));
    }

    #[test]
    fn family_mismatch_rejected() {
        let mut ser = serialized("x = 1");
        ser.comparator = Comparator::NotEqual;
        assert!(matches!(
            from_serialized(ser),
            Err(DeserializeError::Validation(_))
        ));
    }

    #[test]
    fn arity_violation_rejected() {
        let mut ser = serialized("x between (1,2)");
        ser.controls.push("3".into());
        assert!(matches!(
            from_serialized(ser),
            Err(DeserializeError::Validation(_))
        ));
    }

    #[test]
    fn digest_mismatch_rejected() {
        let mut ser = serialized("x = 1");
        ser.subject = "y".into();
        assert!(matches!(
            from_serialized(ser),
            Err(DeserializeError::Validation(_))
        ));
    }

    #[test]
    fn tokenless_non_catch_all_rejected() {
        let mut ser = serialized("x = 1");
        ser.token = None;
        assert!(matches!(
            from_serialized(ser),
            Err(DeserializeError::Validation(_))
        ));
    }
}
