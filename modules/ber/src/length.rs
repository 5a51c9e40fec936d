//! BER length octet encoding/decoding.

use snmp_core::{DecodeErrorKind, Result, SnmpError};

/// Append the BER length encoding of `len` to `out`.
///
/// Short form (`len < 128`): one byte. Long form: a leading byte with the
/// high bit set and the low 7 bits giving the count of following big-endian
/// length bytes.
pub fn encode_length_into(len: usize, out: &mut Vec<u8>) {
    if len < 128 {
        out.push(len as u8);
        return;
    }
    let be = len.to_be_bytes();
    let first_nonzero = be.iter().position(|&b| b != 0).unwrap_or(be.len() - 1);
    let significant = &be[first_nonzero..];
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}

pub fn encode_length(len: usize) -> Vec<u8> {
    let mut out = Vec::new();
    encode_length_into(len, &mut out);
    out
}

/// Parse a length field at the start of `data`, returning (length, bytes
/// consumed). Fails on buffer underrun with a short-buffer error.
pub fn decode_length(data: &[u8]) -> Result<(usize, usize)> {
    let first = *data.first().ok_or(SnmpError::decode(DecodeErrorKind::ShortBuffer))?;
    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }
    let count = (first & 0x7F) as usize;
    if count == 0 {
        // Indefinite length (0x80) is not used by SNMP's definite-length BER subset.
        return Err(SnmpError::decode(DecodeErrorKind::LengthMismatch));
    }
    if data.len() < 1 + count {
        return Err(SnmpError::decode(DecodeErrorKind::ShortBuffer));
    }
    if count > std::mem::size_of::<usize>() {
        return Err(SnmpError::decode(DecodeErrorKind::LengthMismatch));
    }
    let mut len = 0usize;
    for &b in &data[1..1 + count] {
        len = (len << 8) | b as usize;
    }
    Ok((len, 1 + count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form_round_trip() {
        for len in [0usize, 1, 127] {
            let enc = encode_length(len);
            assert_eq!(enc.len(), 1);
            let (got, consumed) = decode_length(&enc).unwrap();
            assert_eq!(got, len);
            assert_eq!(consumed, enc.len());
        }
    }

    #[test]
    fn long_form_round_trip() {
        for len in [128usize, 255, 256, 65535, 70000] {
            let enc = encode_length(len);
            assert!(enc[0] & 0x80 != 0);
            let (got, consumed) = decode_length(&enc).unwrap();
            assert_eq!(got, len);
            assert_eq!(consumed, enc.len());
        }
    }

    #[test]
    fn short_buffer_is_an_error() {
        assert!(decode_length(&[]).is_err());
        assert!(decode_length(&[0x82, 0x01]).is_err());
    }
}
