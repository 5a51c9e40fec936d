//! SNMPv1/v2c community framing.
//!
//! Outer envelope: `Sequence { version, community, PDU }`. Decoding never
//! enforces version/community itself — `validate` does that against the
//! caller's configured target, since a generic decode is also useful for
//! logging/diagnostics on a mismatched reply.

use snmp_ber::{integer, tags, Buffer, Cursor};
use snmp_core::{Result, SnmpError};
use snmp_pdu::Pdu;

pub const VERSION_V1: u8 = 0;
pub const VERSION_V2C: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityMessage {
    pub version: u8,
    pub community: Vec<u8>,
    pub pdu: Pdu,
}

impl CommunityMessage {
    pub fn new(version: u8, community: Vec<u8>, pdu: Pdu) -> Self {
        Self { version, community, pdu }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut body = Buffer::new();
        body.write_tlv(tags::INTEGER, &integer::encode_signed(self.version as i64));
        body.write_tlv(tags::OCTET_STRING, &self.community);
        body.append(&self.pdu.encode());
        Buffer::wrap_tlv(tags::SEQUENCE, body.as_slice())
    }

    pub fn decode(raw: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(raw);
        let body = cursor.expect_tlv(tags::SEQUENCE)?;
        let mut inner = Cursor::new(body);
        let version_bytes = inner.expect_tlv(tags::INTEGER)?;
        let version = integer::decode_signed(version_bytes)? as i64;
        if !(0..=1).contains(&version) {
            return Err(SnmpError::VersionMismatch { expected: 1, actual: version as i32 });
        }
        let community = inner.expect_tlv(tags::OCTET_STRING)?.to_vec();
        let pdu = Pdu::decode(&mut inner)?;
        Ok(Self { version: version as u8, community, pdu })
    }

    /// Reject a version or community mismatch against the caller's
    /// configured target.
    pub fn validate(&self, expected_version: u8, expected_community: &[u8]) -> Result<()> {
        if self.version != expected_version {
            return Err(SnmpError::VersionMismatch {
                expected: expected_version as i32,
                actual: self.version as i32,
            });
        }
        if self.community != expected_community {
            return Err(SnmpError::CommunityMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snmp_smi::Oid;

    #[test]
    fn round_trips_get() {
        let pdu = Pdu::get(38, vec![Oid::new(vec![1, 3, 6, 1, 2, 1, 1, 2, 0])]);
        let msg = CommunityMessage::new(VERSION_V1, b"public".to_vec(), pdu);
        let enc = msg.encode();
        let decoded = CommunityMessage::decode(&enc).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn decodes_v1_get_fixture() {
        // fixture 1: v1 Get of sysDescr.0, community "public".
        let bytes = hex::decode(
            "302602010004067075626c6963a019020126020100020100300e300c06082b060102010102000500",
        )
        .unwrap();
        let msg = CommunityMessage::decode(&bytes).unwrap();
        assert_eq!(msg.version, VERSION_V1);
        assert_eq!(msg.community, b"public");
        assert_eq!(msg.pdu.request_id, 38);
        assert_eq!(msg.pdu.varbinds.len(), 1);
        assert_eq!(msg.pdu.varbinds[0].oid, "1.3.6.1.2.1.1.2.0".parse().unwrap());
    }

    #[test]
    fn decodes_v1_response_fixture() {
        // fixture 2: v1 Response carrying an ObjectId value.
        let bytes = hex::decode(
            "303802010004067075626c6963a22b0201260201000201003020301e06082b0601020101020006122b060104018f5101010182295d011b020201",
        )
        .unwrap();
        let msg = CommunityMessage::decode(&bytes).unwrap();
        assert_eq!(msg.version, VERSION_V1);
        assert_eq!(msg.community, b"public");
        assert_eq!(msg.pdu.varbinds.len(), 1);
        assert_eq!(msg.pdu.varbinds[0].oid, "1.3.6.1.2.1.1.2.0".parse().unwrap());
        assert_eq!(
            msg.pdu.varbinds[0].value,
            snmp_smi::Value::ObjectId("1.3.6.1.4.1.2001.1.1.1.297.93.1.27.2.2.1".parse().unwrap())
        );
    }

    #[test]
    fn version_mismatch_is_rejected_by_validate() {
        let pdu = Pdu::get(1, vec![Oid::new(vec![1, 3, 6, 1])]);
        let msg = CommunityMessage::new(VERSION_V1, b"public".to_vec(), pdu);
        assert!(msg.validate(VERSION_V2C, b"public").is_err());
    }

    #[test]
    fn community_mismatch_is_rejected_by_validate() {
        let pdu = Pdu::get(1, vec![Oid::new(vec![1, 3, 6, 1])]);
        let msg = CommunityMessage::new(VERSION_V1, b"public".to_vec(), pdu);
        assert!(msg.validate(VERSION_V1, b"private").is_err());
    }
}
