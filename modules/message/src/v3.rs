//! SNMPv3 message framing: `msgGlobalData`, USM
//! `msgSecurityParameters`, and the scoped-PDU wrapper (plaintext or
//! privacy-encrypted). Authentication and encryption themselves are
//! `snmp-usm`'s job; this module only builds/parses the envelope and
//! orchestrates calling into `snmp-usm` at the right moment.

use snmp_ber::{integer, tags, Buffer, Cursor};
use snmp_core::{Result, SnmpError, UsmErrorKind};
use snmp_pdu::ScopedPdu;
use snmp_usm::protocol::{AuthProtocol, PrivProtocol};
use snmp_usm::{auth, privacy};

pub const MSG_VERSION_V3: i32 = 3;
pub const SECURITY_MODEL_USM: i32 = 3;

/// `msgFlags`: a 1-byte OctetString with auth/priv/reportable bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsgFlags {
    pub auth: bool,
    pub priv_: bool,
    pub reportable: bool,
}

impl MsgFlags {
    const AUTH_BIT: u8 = 0x01;
    const PRIV_BIT: u8 = 0x02;
    const REPORTABLE_BIT: u8 = 0x04;

    pub fn new(auth: bool, priv_: bool, reportable: bool) -> Result<Self> {
        if priv_ && !auth {
            return Err(SnmpError::usm(UsmErrorKind::UnsupportedNoAuthPriv));
        }
        Ok(Self { auth, priv_, reportable })
    }

    pub fn to_byte(self) -> u8 {
        let mut b = 0u8;
        if self.auth {
            b |= Self::AUTH_BIT;
        }
        if self.priv_ {
            b |= Self::PRIV_BIT;
        }
        if self.reportable {
            b |= Self::REPORTABLE_BIT;
        }
        b
    }

    pub fn from_byte(b: u8) -> Result<Self> {
        let auth = b & Self::AUTH_BIT != 0;
        let priv_ = b & Self::PRIV_BIT != 0;
        let reportable = b & Self::REPORTABLE_BIT != 0;
        Self::new(auth, priv_, reportable)
    }
}

/// USM security parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsmSecurityParameters {
    pub authoritative_engine_id: Vec<u8>,
    pub engine_boots: i32,
    pub engine_time: i32,
    pub user_name: Vec<u8>,
    pub auth_params: Vec<u8>,
    pub priv_params: Vec<u8>,
}

impl UsmSecurityParameters {
    pub fn discovery() -> Self {
        Self {
            authoritative_engine_id: Vec::new(),
            engine_boots: 0,
            engine_time: 0,
            user_name: Vec::new(),
            auth_params: Vec::new(),
            priv_params: Vec::new(),
        }
    }

    fn encode_inner(&self) -> Vec<u8> {
        let mut body = Buffer::new();
        body.write_tlv(tags::OCTET_STRING, &self.authoritative_engine_id);
        body.write_tlv(tags::INTEGER, &integer::encode_signed(self.engine_boots as i64));
        body.write_tlv(tags::INTEGER, &integer::encode_signed(self.engine_time as i64));
        body.write_tlv(tags::OCTET_STRING, &self.user_name);
        body.write_tlv(tags::OCTET_STRING, &self.auth_params);
        body.write_tlv(tags::OCTET_STRING, &self.priv_params);
        body.into_vec()
    }

    /// Encode as the OctetString-wrapped Sequence carried in `msgSecurityParameters`.
    pub fn encode(&self) -> Vec<u8> {
        let inner = Buffer::wrap_tlv(tags::SEQUENCE, &self.encode_inner());
        Buffer::wrap_tlv(tags::OCTET_STRING, &inner)
    }

    /// Decode from the OctetString-wrapped Sequence, returning the
    /// structured fields plus the byte range of `auth_params` *within
    /// `raw`* so the caller can zero it in place for MAC verification.
    pub fn decode(raw: &[u8], octet_string_body: &[u8]) -> Result<(Self, std::ops::Range<usize>)> {
        // Every slice handed back by `Cursor` below borrows directly from
        // `octet_string_body` (and transitively from `raw`, since that
        // slice was itself carved from `raw` by the caller) — no copies
        // until we're done, so `byte_offset` below is valid address math
        // within one allocation.
        let mut outer = Cursor::new(octet_string_body);
        let seq_body = outer.expect_tlv(tags::SEQUENCE)?;

        let mut inner = Cursor::new(seq_body);
        let authoritative_engine_id = inner.expect_tlv(tags::OCTET_STRING)?.to_vec();
        let engine_boots = integer::decode_signed(inner.expect_tlv(tags::INTEGER)?)? as i32;
        let engine_time = integer::decode_signed(inner.expect_tlv(tags::INTEGER)?)? as i32;
        let user_name = inner.expect_tlv(tags::OCTET_STRING)?.to_vec();
        let auth_params = inner.expect_tlv(tags::OCTET_STRING)?;
        let start = byte_offset(raw, auth_params)?;
        let end = start + auth_params.len();
        let auth_params = auth_params.to_vec();
        let priv_params = inner.expect_tlv(tags::OCTET_STRING)?.to_vec();

        let params = Self {
            authoritative_engine_id,
            engine_boots,
            engine_time,
            user_name,
            auth_params,
            priv_params,
        };
        Ok((params, start..end))
    }
}

/// Address-arithmetic offset of `inner` within `outer`, valid because
/// `inner` is always a sub-slice carved from `outer`'s own backing storage
/// by the decode path above.
fn byte_offset(outer: &[u8], inner: &[u8]) -> Result<usize> {
    let outer_start = outer.as_ptr() as usize;
    let outer_end = outer_start + outer.len();
    let inner_start = inner.as_ptr() as usize;
    if inner_start < outer_start || inner_start + inner.len() > outer_end {
        return Err(SnmpError::decode(snmp_core::DecodeErrorKind::WrongSequenceContainer));
    }
    Ok(inner_start - outer_start)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopedPduData {
    Plaintext(ScopedPdu),
    Encrypted(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V3Message {
    pub msg_id: i32,
    pub msg_max_size: i32,
    pub flags: MsgFlags,
    pub security_params: UsmSecurityParameters,
    pub scoped_pdu_data: ScopedPduData,
}

impl V3Message {
    pub fn encode(&self) -> Vec<u8> {
        let mut global = Buffer::new();
        global.write_tlv(tags::INTEGER, &integer::encode_signed(self.msg_id as i64));
        global.write_tlv(tags::INTEGER, &integer::encode_signed(self.msg_max_size as i64));
        global.write_tlv(tags::OCTET_STRING, &[self.flags.to_byte()]);
        global.write_tlv(tags::INTEGER, &integer::encode_signed(SECURITY_MODEL_USM as i64));
        let global_bytes = Buffer::wrap_tlv(tags::SEQUENCE, global.as_slice());

        let mut body = Buffer::new();
        body.write_tlv(tags::INTEGER, &integer::encode_signed(MSG_VERSION_V3 as i64));
        body.append(&global_bytes);
        body.append(&self.security_params.encode());
        match &self.scoped_pdu_data {
            ScopedPduData::Plaintext(scoped) => body.append(&scoped.encode()),
            ScopedPduData::Encrypted(ct) => body.write_tlv(tags::OCTET_STRING, ct),
        }
        Buffer::wrap_tlv(tags::SEQUENCE, body.as_slice())
    }

    /// Parse the envelope. Returns the message plus the byte range of
    /// `auth_params` within `raw` for in-place MAC verification.
    pub fn decode(raw: &[u8]) -> Result<(Self, std::ops::Range<usize>)> {
        let mut cursor = Cursor::new(raw);
        let body = cursor.expect_tlv(tags::SEQUENCE)?;
        let mut inner = Cursor::new(body);

        let version = integer::decode_signed(inner.expect_tlv(tags::INTEGER)?)?;
        if version != MSG_VERSION_V3 as i64 {
            return Err(SnmpError::VersionMismatch { expected: MSG_VERSION_V3, actual: version as i32 });
        }

        let global_body = inner.expect_tlv(tags::SEQUENCE)?;
        let mut global = Cursor::new(global_body);
        let msg_id = integer::decode_signed(global.expect_tlv(tags::INTEGER)?)? as i32;
        let msg_max_size = integer::decode_signed(global.expect_tlv(tags::INTEGER)?)? as i32;
        let flags_bytes = global.expect_tlv(tags::OCTET_STRING)?;
        if flags_bytes.len() != 1 {
            return Err(SnmpError::decode(snmp_core::DecodeErrorKind::LengthMismatch));
        }
        let flags = MsgFlags::from_byte(flags_bytes[0])?;
        let security_model = integer::decode_signed(global.expect_tlv(tags::INTEGER)?)?;
        if security_model != SECURITY_MODEL_USM as i64 {
            return Err(SnmpError::usm(UsmErrorKind::UnsupportedSecurityModel));
        }

        let sec_params_octets = inner.expect_tlv(tags::OCTET_STRING)?;
        let (security_params, auth_range) = UsmSecurityParameters::decode(raw, sec_params_octets)?;

        let scoped_pdu_data = if flags.priv_ {
            let ct = inner.expect_tlv(tags::OCTET_STRING)?.to_vec();
            ScopedPduData::Encrypted(ct)
        } else {
            let scoped = ScopedPdu::decode(&mut inner)?;
            ScopedPduData::Plaintext(scoped)
        };

        let msg = V3Message { msg_id, msg_max_size, flags, security_params, scoped_pdu_data };
        Ok((msg, auth_range))
    }
}

/// Build a discovery request envelope: empty engineId,
/// boots=0, time=0, securityName blanked, auth=false, priv=false,
/// reportable=true.
pub fn discovery_message(msg_id: i32, msg_max_size: i32, scoped_pdu: ScopedPdu) -> V3Message {
    V3Message {
        msg_id,
        msg_max_size,
        flags: MsgFlags::new(false, false, true).expect("noAuthPriv is never requested here"),
        security_params: UsmSecurityParameters::discovery(),
        scoped_pdu_data: ScopedPduData::Plaintext(scoped_pdu),
    }
}

/// Encode `msg`, computing and inserting the HMAC if `auth` is set: encode once with `auth_params` zeroed, hash that exact byte
/// sequence, set the real MAC, and encode again — since the 12-byte field
/// is fixed-length, both encodes produce identical layout apart from that
/// one field's contents.
pub fn seal(mut msg: V3Message, auth_key: Option<(AuthProtocol, &[u8])>) -> Vec<u8> {
    match auth_key {
        Some((protocol, key)) => {
            msg.security_params.auth_params = vec![0u8; protocol.mac_len()];
            let unsigned = msg.encode();
            let mac = auth::compute_mac(protocol, key, &unsigned);
            msg.security_params.auth_params = mac.to_vec();
            msg.encode()
        }
        None => msg.encode(),
    }
}

/// Decode and, if authentication is in effect, verify the MAC in place on
/// the original received bytes.
pub fn open(raw: &[u8], auth_key: Option<(AuthProtocol, &[u8])>) -> Result<V3Message> {
    let (msg, auth_range) = V3Message::decode(raw)?;
    match auth_key {
        Some((protocol, key)) => {
            if !msg.flags.auth {
                return Err(SnmpError::usm(UsmErrorKind::AuthenticationFailed));
            }
            if msg.security_params.auth_params.len() != protocol.mac_len() {
                return Err(SnmpError::usm(UsmErrorKind::InvalidAuthParamsLength));
            }
            let mut buf = raw.to_vec();
            let received_mac = buf[auth_range.clone()].to_vec();
            for b in &mut buf[auth_range] {
                *b = 0;
            }
            auth::verify_mac(protocol, key, &buf, &received_mac)?;
        }
        None => {
            if msg.flags.auth {
                return Err(SnmpError::usm(UsmErrorKind::AuthenticationFailed));
            }
        }
    }
    Ok(msg)
}

/// Encrypt a ScopedPdu into `ScopedPduData::Encrypted`, filling
/// `msg.security_params.priv_params` with the derived salt.
pub fn encrypt_scoped_pdu(
    scoped_pdu: &ScopedPdu,
    protocol: PrivProtocol,
    key: &[u8],
    engine_boots: u32,
    engine_time: u32,
) -> Result<(ScopedPduData, Vec<u8>)> {
    let plaintext = scoped_pdu.encode();
    let (ciphertext, params) = privacy::encrypt(protocol, key, engine_boots, engine_time, &plaintext)?;
    Ok((ScopedPduData::Encrypted(ciphertext), params.to_vec()))
}

/// Decrypt `ScopedPduData::Encrypted` back into a `ScopedPdu`.
pub fn decrypt_scoped_pdu(
    ciphertext: &[u8],
    protocol: PrivProtocol,
    key: &[u8],
    engine_boots: u32,
    engine_time: u32,
    priv_params: &[u8],
) -> Result<ScopedPdu> {
    if priv_params.len() != 8 {
        return Err(SnmpError::usm(UsmErrorKind::InvalidPrivParamsLength));
    }
    let mut params = [0u8; 8];
    params.copy_from_slice(priv_params);
    let plaintext = privacy::decrypt(protocol, key, engine_boots, engine_time, &params, ciphertext)
        .map_err(|_| SnmpError::usm(UsmErrorKind::AuthenticationFailed))?;
    let mut cursor = Cursor::new(&plaintext);
    ScopedPdu::decode(&mut cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snmp_pdu::Pdu;
    use snmp_smi::Oid;

    fn sample_scoped_pdu() -> ScopedPdu {
        let pdu = Pdu::get(7, vec![Oid::new(vec![1, 3, 6, 1, 2, 1, 1, 1, 0])]);
        ScopedPdu::new(b"engine-1".to_vec(), Vec::new(), pdu)
    }

    #[test]
    fn noauthpriv_combination_is_rejected() {
        assert!(MsgFlags::new(false, true, true).is_err());
    }

    #[test]
    fn plaintext_message_round_trips() {
        let msg = V3Message {
            msg_id: 42,
            msg_max_size: 65535,
            flags: MsgFlags::new(false, false, true).unwrap(),
            security_params: UsmSecurityParameters::discovery(),
            scoped_pdu_data: ScopedPduData::Plaintext(sample_scoped_pdu()),
        };
        let enc = msg.encode();
        let (decoded, _range) = V3Message::decode(&enc).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn seal_and_open_round_trip_with_auth() {
        let key = vec![1u8; 16];
        let mut sec = UsmSecurityParameters::discovery();
        sec.authoritative_engine_id = b"engine-1".to_vec();
        sec.user_name = b"user1".to_vec();
        let msg = V3Message {
            msg_id: 1,
            msg_max_size: 65535,
            flags: MsgFlags::new(true, false, true).unwrap(),
            security_params: sec,
            scoped_pdu_data: ScopedPduData::Plaintext(sample_scoped_pdu()),
        };
        let raw = seal(msg, Some((AuthProtocol::Md5, &key)));
        let opened = open(&raw, Some((AuthProtocol::Md5, &key))).unwrap();
        assert_eq!(opened.msg_id, 1);
    }

    #[test]
    fn tampered_auth_field_fails_verification() {
        let key = vec![1u8; 16];
        let msg = V3Message {
            msg_id: 1,
            msg_max_size: 65535,
            flags: MsgFlags::new(true, false, true).unwrap(),
            security_params: UsmSecurityParameters::discovery(),
            scoped_pdu_data: ScopedPduData::Plaintext(sample_scoped_pdu()),
        };
        let mut raw = seal(msg, Some((AuthProtocol::Md5, &key)));
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        assert!(open(&raw, Some((AuthProtocol::Md5, &key))).is_err());
    }

    #[test]
    fn encrypt_decrypt_scoped_pdu_round_trips() {
        let key = vec![2u8; 16];
        let scoped = sample_scoped_pdu();
        let (data, params) = encrypt_scoped_pdu(&scoped, PrivProtocol::Aes128, &key, 5, 500).unwrap();
        let ScopedPduData::Encrypted(ct) = data else { panic!("expected encrypted") };
        let decoded = decrypt_scoped_pdu(&ct, PrivProtocol::Aes128, &key, 5, 500, &params).unwrap();
        assert_eq!(decoded, scoped);
    }

    #[test]
    fn discovery_message_has_empty_identity_and_reportable_flag() {
        let msg = discovery_message(1, 65535, sample_scoped_pdu());
        assert!(msg.security_params.authoritative_engine_id.is_empty());
        assert!(msg.flags.reportable);
        assert!(!msg.flags.auth);
        assert!(!msg.flags.priv_);
    }
}
