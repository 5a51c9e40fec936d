//! Decoder cursor: a (buffer, offset) pair that advances as TLVs are parsed
//!. All decode functions in this crate take a `Cursor` and
//! return the new offset implicitly via `&mut self`.

use crate::length;
use crate::tags::is_multi_byte_tag;
use snmp_core::{DecodeErrorKind, Result, SnmpError};

pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Read `n` raw bytes, advancing the cursor.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(SnmpError::decode(DecodeErrorKind::ShortBuffer));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Parse a TLV header: returns `(tag, value_len)` and advances past the
    /// header (but not past the value). Rejects the multi-byte tag
    /// extension, which SNMP's BER subset never uses.
    pub fn read_header(&mut self) -> Result<(u8, usize)> {
        let tag = *self
            .data
            .get(self.pos)
            .ok_or(SnmpError::decode(DecodeErrorKind::ShortBuffer))?;
        if is_multi_byte_tag(tag) {
            return Err(SnmpError::decode(DecodeErrorKind::MultiByteTagUnsupported));
        }
        let (len, header_len) = length::decode_length(&self.data[self.pos + 1..])?;
        self.pos += 1 + header_len;
        if self.remaining() < len {
            return Err(SnmpError::decode(DecodeErrorKind::ShortBuffer));
        }
        Ok((tag, len))
    }

    /// Parse a TLV header and return the matching tag's value bytes,
    /// advancing past the whole TLV.
    pub fn read_tlv(&mut self) -> Result<(u8, &'a [u8])> {
        let (tag, len) = self.read_header()?;
        let value = self.read_bytes(len)?;
        Ok((tag, value))
    }

    /// Like `read_tlv`, but fails unless the tag equals `expected`.
    pub fn expect_tlv(&mut self, expected: u8) -> Result<&'a [u8]> {
        let (tag, value) = self.read_tlv()?;
        if tag != expected {
            return Err(SnmpError::decode(DecodeErrorKind::InvalidTag));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags;

    #[test]
    fn reads_simple_tlv() {
        let data = [tags::OCTET_STRING, 0x02, b'h', b'i'];
        let mut c = Cursor::new(&data);
        let v = c.expect_tlv(tags::OCTET_STRING).unwrap();
        assert_eq!(v, b"hi");
        assert!(c.is_empty());
    }

    #[test]
    fn rejects_multi_byte_tag() {
        let data = [0x1F, 0x00];
        let mut c = Cursor::new(&data);
        assert!(c.read_header().is_err());
    }

    #[test]
    fn short_buffer_on_truncated_value() {
        let data = [tags::OCTET_STRING, 0x05, b'h', b'i'];
        let mut c = Cursor::new(&data);
        assert!(c.read_tlv().is_err());
    }
}
