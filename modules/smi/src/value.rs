//! The tagged-union of all wire-level SMI values.
//!
//! Re-architected design note: a single Rust enum dispatched
//! on the wire tag, rather than the inheritance hierarchy the original
//! library used. `encode`/`decode`/`to_display_string` are the polymorphic
//! operations; `Clone`/`PartialEq` come from `derive`.

use crate::oid::Oid;
use snmp_ber::{integer, tags, Buffer, Cursor};
use snmp_core::{DecodeErrorKind, Result, SnmpError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer32(i32),
    OctetString(Vec<u8>),
    Null,
    ObjectId(Oid),
    /// Transparent carrier of raw inner bytes. PDUs and USM headers are all
    /// Sequences in disguise; this variant is used when a
    /// Sequence appears as a *value* rather than a structural wrapper.
    Sequence(Vec<u8>),
    IpAddress([u8; 4]),
    Counter32(u32),
    /// Gauge32 and Unsigned32 share wire tag 0x42;
    /// the distinction, if any, must be carried out-of-band.
    Gauge32(u32),
    TimeTicks(u32),
    Opaque(Vec<u8>),
    Counter64(u64),
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
}

impl Value {
    /// Legacy SNMPv2p type from the original library's lineage. It has no
    /// distinct wire tag in this table and is carried on
    /// the wire as TimeTicks, the same aliasing that applies to
    /// Gauge32/Unsigned32.
    pub fn v2_party_clock(hundredths: u32) -> Value {
        Value::TimeTicks(hundredths)
    }

    pub fn tag(&self) -> u8 {
        match self {
            Value::Integer32(_) => tags::INTEGER,
            Value::OctetString(_) => tags::OCTET_STRING,
            Value::Null => tags::NULL,
            Value::ObjectId(_) => tags::OBJECT_ID,
            Value::Sequence(_) => tags::SEQUENCE,
            Value::IpAddress(_) => tags::IP_ADDRESS,
            Value::Counter32(_) => tags::COUNTER32,
            Value::Gauge32(_) => tags::GAUGE32,
            Value::TimeTicks(_) => tags::TIME_TICKS,
            Value::Opaque(_) => tags::OPAQUE,
            Value::Counter64(_) => tags::COUNTER64,
            Value::NoSuchObject => tags::NO_SUCH_OBJECT,
            Value::NoSuchInstance => tags::NO_SUCH_INSTANCE,
            Value::EndOfMibView => tags::END_OF_MIB_VIEW,
        }
    }

    /// An empty value of the variant corresponding to `tag` (BER tag-driven
    /// syntax dispatch). Unknown tags are a hard decode error.
    pub fn empty_for_tag(tag: u8) -> Result<Value> {
        Ok(match tag {
            tags::INTEGER => Value::Integer32(0),
            tags::OCTET_STRING => Value::OctetString(Vec::new()),
            tags::NULL => Value::Null,
            tags::OBJECT_ID => Value::ObjectId(Oid::new(vec![])),
            tags::SEQUENCE => Value::Sequence(Vec::new()),
            tags::IP_ADDRESS => Value::IpAddress([0; 4]),
            tags::COUNTER32 => Value::Counter32(0),
            tags::GAUGE32 => Value::Gauge32(0),
            tags::TIME_TICKS => Value::TimeTicks(0),
            tags::OPAQUE => Value::Opaque(Vec::new()),
            tags::COUNTER64 => Value::Counter64(0),
            tags::NO_SUCH_OBJECT => Value::NoSuchObject,
            tags::NO_SUCH_INSTANCE => Value::NoSuchInstance,
            tags::END_OF_MIB_VIEW => Value::EndOfMibView,
            _other => return Err(SnmpError::decode(DecodeErrorKind::UnknownSmiType)),
        })
    }

    pub fn is_exception(&self) -> bool {
        matches!(self, Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView)
    }

    /// Encode the value's body (no outer tag/length — callers wrap via
    /// `Buffer::write_tlv(value.tag(), &value.encode_body())`).
    pub fn encode_body(&self) -> Vec<u8> {
        match self {
            Value::Integer32(v) => integer::encode_signed(*v as i64),
            Value::OctetString(b) | Value::Opaque(b) | Value::Sequence(b) => b.clone(),
            Value::Null | Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView => Vec::new(),
            Value::ObjectId(oid) => oid.encode().unwrap_or_default(),
            Value::IpAddress(b) => b.to_vec(),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => {
                integer::encode_unsigned(*v as u64)
            }
            Value::Counter64(v) => integer::encode_unsigned(*v),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        Buffer::wrap_tlv(self.tag(), &self.encode_body())
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> Result<Value> {
        let (tag, body) = cursor.read_tlv()?;
        Value::decode_tagged(tag, body)
    }

    pub fn decode_tagged(tag: u8, body: &[u8]) -> Result<Value> {
        match tag {
            tags::INTEGER => Ok(Value::Integer32(integer::decode_signed(body)? as i32)),
            tags::OCTET_STRING => Ok(Value::OctetString(body.to_vec())),
            tags::NULL => {
                if !body.is_empty() {
                    return Err(SnmpError::decode(DecodeErrorKind::LengthMismatch));
                }
                Ok(Value::Null)
            }
            tags::OBJECT_ID => Ok(Value::ObjectId(Oid::decode(body)?)),
            tags::SEQUENCE => Ok(Value::Sequence(body.to_vec())),
            tags::IP_ADDRESS => {
                if body.len() != 4 {
                    return Err(SnmpError::decode(DecodeErrorKind::LengthMismatch));
                }
                let mut addr = [0u8; 4];
                addr.copy_from_slice(body);
                Ok(Value::IpAddress(addr))
            }
            tags::COUNTER32 => Ok(Value::Counter32(integer::decode_unsigned(body)? as u32)),
            tags::GAUGE32 => Ok(Value::Gauge32(integer::decode_unsigned(body)? as u32)),
            tags::TIME_TICKS => Ok(Value::TimeTicks(integer::decode_unsigned(body)? as u32)),
            tags::OPAQUE => Ok(Value::Opaque(body.to_vec())),
            tags::COUNTER64 => Ok(Value::Counter64(integer::decode_unsigned(body)?)),
            tags::NO_SUCH_OBJECT => {
                if !body.is_empty() {
                    return Err(SnmpError::decode(DecodeErrorKind::NonZeroLengthException));
                }
                Ok(Value::NoSuchObject)
            }
            tags::NO_SUCH_INSTANCE => {
                if !body.is_empty() {
                    return Err(SnmpError::decode(DecodeErrorKind::NonZeroLengthException));
                }
                Ok(Value::NoSuchInstance)
            }
            tags::END_OF_MIB_VIEW => {
                if !body.is_empty() {
                    return Err(SnmpError::decode(DecodeErrorKind::NonZeroLengthException));
                }
                Ok(Value::EndOfMibView)
            }
            _other => Err(SnmpError::decode(DecodeErrorKind::UnknownSmiType)),
        }
    }

    /// Textual form, used for display and test assertions — never by wire
    /// logic.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Integer32(v) => v.to_string(),
            Value::OctetString(b) => match std::str::from_utf8(b) {
                Ok(s) if b.iter().all(|&c| (0x20..0x7F).contains(&c) || c == b'\t' || c == b'\n') => {
                    s.to_string()
                }
                _ => hex_string(b),
            },
            Value::Null => "NULL".to_string(),
            Value::ObjectId(oid) => oid.to_string(),
            Value::Sequence(b) => format!("SEQUENCE({} bytes)", b.len()),
            Value::IpAddress(a) => format!("{}.{}.{}.{}", a[0], a[1], a[2], a[3]),
            Value::Counter32(v) => format!("Counter32: {}", v),
            Value::Gauge32(v) => format!("Gauge32: {}", v),
            Value::TimeTicks(v) => format!("Timeticks: ({}) {}", v, format_timeticks(*v)),
            Value::Opaque(b) => format!("Opaque: {}", hex_string(b)),
            Value::Counter64(v) => format!("Counter64: {}", v),
            Value::NoSuchObject => "noSuchObject".to_string(),
            Value::NoSuchInstance => "noSuchInstance".to_string(),
            Value::EndOfMibView => "endOfMibView".to_string(),
        }
    }
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect::<Vec<_>>().join(" ")
}

fn format_timeticks(hundredths: u32) -> String {
    let total_seconds = hundredths / 100;
    let days = total_seconds / 86400;
    let hours = (total_seconds % 86400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Compute `later - earlier` with wraparound at 2^32.
pub fn counter32_diff(earlier: u32, later: u32) -> u32 {
    later.wrapping_sub(earlier)
}

/// Compute `later - earlier` with wraparound at 2^64.
pub fn counter64_diff(earlier: u64, later: u64) -> u64 {
    later.wrapping_sub(earlier)
}
