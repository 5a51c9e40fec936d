//! Variable binding: an (OID, value) pair encoded as a Sequence containing
//! the two. Decoding must produce a value whose tag is one of the
//! allowed SMI tags — `Value::decode` already enforces that, an unknown tag
//! is a hard error there.

use snmp_ber::{tags, Buffer, Cursor};
use snmp_core::Result;
use snmp_smi::{Oid, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vb {
    pub oid: Oid,
    pub value: Value,
}

impl Vb {
    pub fn new(oid: Oid, value: Value) -> Self {
        Self { oid, value }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut body = Buffer::new();
        body.write_tlv(tags::OBJECT_ID, &self.oid.encode().unwrap_or_default());
        body.append(&self.value.encode());
        Buffer::wrap_tlv(tags::SEQUENCE, body.as_slice())
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> Result<Vb> {
        let body = cursor.expect_tlv(tags::SEQUENCE)?;
        let mut inner = Cursor::new(body);
        let oid_bytes = inner.expect_tlv(tags::OBJECT_ID)?;
        let oid = Oid::decode(oid_bytes)?;
        let value = Value::decode(&mut inner)?;
        Ok(Vb::new(oid, value))
    }
}

/// Encode an ordered list of varbinds as a Sequence of Sequences.
pub fn encode_varbind_list(vbs: &[Vb]) -> Vec<u8> {
    let mut body = Buffer::new();
    for vb in vbs {
        body.append(&vb.encode());
    }
    Buffer::wrap_tlv(tags::SEQUENCE, body.as_slice())
}

pub fn decode_varbind_list(cursor: &mut Cursor<'_>) -> Result<Vec<Vb>> {
    let body = cursor.expect_tlv(tags::SEQUENCE)?;
    let mut inner = Cursor::new(body);
    let mut out = Vec::new();
    while !inner.is_empty() {
        out.push(Vb::decode(&mut inner)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vb_round_trips() {
        let vb = Vb::new("1.3.6.1.2.1.1.2.0".parse().unwrap(), Value::Null);
        let enc = vb.encode();
        let mut c = Cursor::new(&enc);
        assert_eq!(Vb::decode(&mut c).unwrap(), vb);
    }

    #[test]
    fn varbind_list_round_trips_and_preserves_order() {
        let vbs = vec![
            Vb::new("1.3.6.1.2.1.1.1.0".parse().unwrap(), Value::OctetString(b"a".to_vec())),
            Vb::new("1.3.6.1.2.1.1.2.0".parse().unwrap(), Value::Null),
        ];
        let enc = encode_varbind_list(&vbs);
        let mut c = Cursor::new(&enc);
        let decoded = decode_varbind_list(&mut c).unwrap();
        assert_eq!(decoded, vbs);
    }
}
