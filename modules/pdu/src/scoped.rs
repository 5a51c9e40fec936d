//! ScopedPDU: the SNMPv3 wrapper around a `Pdu` that carries the context
//! the PDU applies to.

use crate::pdu::Pdu;
use snmp_ber::{tags, Buffer, Cursor};
use snmp_core::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedPdu {
    pub context_engine_id: Vec<u8>,
    pub context_name: Vec<u8>,
    pub pdu: Pdu,
}

impl ScopedPdu {
    pub fn new(context_engine_id: Vec<u8>, context_name: Vec<u8>, pdu: Pdu) -> Self {
        Self { context_engine_id, context_name, pdu }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut body = Buffer::new();
        body.write_tlv(tags::OCTET_STRING, &self.context_engine_id);
        body.write_tlv(tags::OCTET_STRING, &self.context_name);
        body.append(&self.pdu.encode());
        Buffer::wrap_tlv(tags::SEQUENCE, body.as_slice())
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> Result<ScopedPdu> {
        let body = cursor.expect_tlv(tags::SEQUENCE)?;
        let mut inner = Cursor::new(body);
        let context_engine_id = inner.expect_tlv(tags::OCTET_STRING)?.to_vec();
        let context_name = inner.expect_tlv(tags::OCTET_STRING)?.to_vec();
        let pdu = Pdu::decode(&mut inner)?;
        Ok(ScopedPdu::new(context_engine_id, context_name, pdu))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_pdu_round_trips() {
        let pdu = Pdu::get(1, vec!["1.3.6.1.2.1.1.1.0".parse().unwrap()]);
        let scoped = ScopedPdu::new(b"engine-1".to_vec(), b"".to_vec(), pdu);
        let enc = scoped.encode();
        let mut c = Cursor::new(&enc);
        let decoded = ScopedPdu::decode(&mut c).unwrap();
        assert_eq!(decoded, scoped);
    }
}
