//! Minimum-length two's-complement integer codec, shared by
//! Integer32, Counter32/Gauge32/TimeTicks (unsigned 32-bit), Counter64
//! (unsigned 64-bit) and the PDU's requestId/errorStatus/errorIndex fields.
//!
//! These functions encode/decode only the *value* bytes — the caller wraps
//! them in a TLV with the appropriate tag.

use snmp_core::{DecodeErrorKind, Result, SnmpError};

/// Encode a signed value with the minimum number of bytes such that no
/// leading 0x00 or 0xFF byte is redundant given the sign of the next bit.
pub fn encode_signed(value: i64) -> Vec<u8> {
    let be = value.to_be_bytes();
    let mut start = 0;
    while start + 1 < be.len() {
        let redundant_zero = be[start] == 0x00 && (be[start + 1] & 0x80) == 0;
        let redundant_ff = be[start] == 0xFF && (be[start + 1] & 0x80) != 0;
        if redundant_zero || redundant_ff {
            start += 1;
        } else {
            break;
        }
    }
    be[start..].to_vec()
}

/// Decode a signed minimum-length two's-complement integer.
pub fn decode_signed(bytes: &[u8]) -> Result<i64> {
    if bytes.is_empty() {
        return Err(SnmpError::decode(DecodeErrorKind::LengthMismatch));
    }
    if bytes.len() > 8 {
        return Err(SnmpError::decode(DecodeErrorKind::LengthMismatch));
    }
    let negative = bytes[0] & 0x80 != 0;
    let mut buf = [if negative { 0xFFu8 } else { 0x00 }; 8];
    let offset = 8 - bytes.len();
    buf[offset..].copy_from_slice(bytes);
    Ok(i64::from_be_bytes(buf))
}

/// Encode an unsigned value the same way a BER INTEGER would be encoded if
/// it were non-negative: minimal bytes, with a leading 0x00 inserted if the
/// most-significant bit of the shortest representation would otherwise be
/// mistaken for a sign bit.
pub fn encode_unsigned(value: u64) -> Vec<u8> {
    let be = value.to_be_bytes();
    let first_nonzero = be.iter().position(|&b| b != 0).unwrap_or(be.len() - 1);
    let mut out = be[first_nonzero..].to_vec();
    if out[0] & 0x80 != 0 {
        out.insert(0, 0x00);
    }
    out
}

/// Decode an unsigned integer, allowing (and stripping) a leading 0x00
/// padding byte. Fails if the value doesn't fit in `u64`.
pub fn decode_unsigned(bytes: &[u8]) -> Result<u64> {
    if bytes.is_empty() {
        return Err(SnmpError::decode(DecodeErrorKind::LengthMismatch));
    }
    let mut trimmed = bytes;
    while trimmed.len() > 1 && trimmed[0] == 0x00 {
        trimmed = &trimmed[1..];
    }
    if trimmed.len() > 9 || (trimmed.len() == 9 && trimmed[0] != 0x00) {
        return Err(SnmpError::decode(DecodeErrorKind::LengthMismatch));
    }
    let mut value: u64 = 0;
    for &b in trimmed {
        value = (value << 8) | b as u64;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_round_trip() {
        for v in [0i64, 1, -1, 127, 128, -128, -129, 300, i32::MAX as i64, i32::MIN as i64] {
            let enc = encode_signed(v);
            assert_eq!(decode_signed(&enc).unwrap(), v);
        }
    }

    #[test]
    fn signed_300_matches_known_vector() {
        // fixture 4: Integer32(300) -> 02 02 01 2C
        assert_eq!(encode_signed(300), vec![0x01, 0x2C]);
    }

    #[test]
    fn unsigned_round_trip() {
        for v in [0u64, 127, 128, 255, 256, u32::MAX as u64, u64::MAX] {
            let enc = encode_unsigned(v);
            assert_eq!(decode_unsigned(&enc).unwrap(), v);
        }
    }

    #[test]
    fn unsigned_300_matches_known_vector() {
        // fixture 3: Counter32(300) -> 41 02 01 2C
        assert_eq!(encode_unsigned(300), vec![0x01, 0x2C]);
    }

    #[test]
    fn unsigned_high_bit_gets_padding_byte() {
        let enc = encode_unsigned(0xFF);
        assert_eq!(enc, vec![0x00, 0xFF]);
    }
}
