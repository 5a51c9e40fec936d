//! PDU assembly and parsing.
//!
//! Encode order for non-Bulk PDUs: requestId, errorStatus, errorIndex,
//! varbind-list. For GetBulk the two integer fields hold nonRepeaters and
//! maxRepetitions instead. The whole is wrapped in a PDU-tagged constructed
//! TLV. request-id is generated at encode time if the caller left it 0.

use crate::kind::PduKind;
use crate::varbind::{decode_varbind_list, encode_varbind_list, Vb};
use snmp_ber::{integer, tags, Buffer, Cursor};
use snmp_core::rng::random_request_id;
use snmp_core::{DecodeErrorKind, Result, SnmpError};
use snmp_smi::{well_known, Value};

/// The two integer fields that follow requestId, whose meaning depends on
/// the PDU kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduFields {
    Standard { error_status: i32, error_index: i32 },
    Bulk { non_repeaters: i32, max_repetitions: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    pub kind: PduKind,
    pub request_id: i32,
    pub fields: PduFields,
    pub varbinds: Vec<Vb>,
}

impl Pdu {
    fn new(kind: PduKind, request_id: i32, fields: PduFields, varbinds: Vec<Vb>) -> Self {
        Self { kind, request_id, fields, varbinds }
    }

    pub fn get(request_id: i32, oids: Vec<snmp_smi::Oid>) -> Self {
        let varbinds = oids.into_iter().map(|oid| Vb::new(oid, Value::Null)).collect();
        Self::new(PduKind::Get, request_id, std_fields(), varbinds)
    }

    pub fn get_next(request_id: i32, oids: Vec<snmp_smi::Oid>) -> Self {
        let varbinds = oids.into_iter().map(|oid| Vb::new(oid, Value::Null)).collect();
        Self::new(PduKind::GetNext, request_id, std_fields(), varbinds)
    }

    pub fn get_bulk(request_id: i32, non_repeaters: i32, max_repetitions: i32, oids: Vec<snmp_smi::Oid>) -> Self {
        let varbinds = oids.into_iter().map(|oid| Vb::new(oid, Value::Null)).collect();
        Self::new(
            PduKind::GetBulk,
            request_id,
            PduFields::Bulk { non_repeaters, max_repetitions },
            varbinds,
        )
    }

    pub fn set(request_id: i32, varbinds: Vec<Vb>) -> Self {
        Self::new(PduKind::Set, request_id, std_fields(), varbinds)
    }

    pub fn response(request_id: i32, error_status: i32, error_index: i32, varbinds: Vec<Vb>) -> Self {
        Self::new(
            PduKind::Response,
            request_id,
            PduFields::Standard { error_status, error_index },
            varbinds,
        )
    }

    pub fn report(request_id: i32, varbinds: Vec<Vb>) -> Self {
        Self::new(PduKind::Report, request_id, std_fields(), varbinds)
    }

    /// V2Trap (SNMPv2c/v3 trap). `sys_up_time` and `trap_oid` are injected
    /// as the first two varbinds; callers need not (and should not)
    /// include them in `varbinds`.
    pub fn v2_trap(request_id: i32, sys_up_time: u32, trap_oid: snmp_smi::Oid, mut varbinds: Vec<Vb>) -> Self {
        let mut vbs = vec![
            Vb::new(well_known::sys_up_time(), Value::TimeTicks(sys_up_time)),
            Vb::new(well_known::snmp_trap_oid(), Value::ObjectId(trap_oid)),
        ];
        vbs.append(&mut varbinds);
        Self::new(PduKind::V2Trap, request_id, std_fields(), vbs)
    }

    pub fn inform(request_id: i32, sys_up_time: u32, trap_oid: snmp_smi::Oid, mut varbinds: Vec<Vb>) -> Self {
        let mut vbs = vec![
            Vb::new(well_known::sys_up_time(), Value::TimeTicks(sys_up_time)),
            Vb::new(well_known::snmp_trap_oid(), Value::ObjectId(trap_oid)),
        ];
        vbs.append(&mut varbinds);
        Self::new(PduKind::Inform, request_id, std_fields(), vbs)
    }

    /// The first two varbinds of a V2Trap/Inform PDU, split out from the
    /// caller-supplied bindings.
    pub fn trap_bindings(&self) -> Option<(&Vb, &Vb)> {
        if !self.kind.injects_trap_bindings() {
            return None;
        }
        match (self.varbinds.first(), self.varbinds.get(1)) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let request_id = if self.request_id == 0 { random_request_id() } else { self.request_id };
        let mut body = Buffer::new();
        body.append(&Value::Integer32(request_id).encode());
        match self.fields {
            PduFields::Standard { error_status, error_index } => {
                body.append(&Value::Integer32(error_status).encode());
                body.append(&Value::Integer32(error_index).encode());
            }
            PduFields::Bulk { non_repeaters, max_repetitions } => {
                body.append(&Value::Integer32(non_repeaters).encode());
                body.append(&Value::Integer32(max_repetitions).encode());
            }
        }
        body.append(&encode_varbind_list(&self.varbinds));
        Buffer::wrap_tlv(self.kind.tag(), body.as_slice())
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> Result<Pdu> {
        let (tag, body) = cursor.read_tlv()?;
        let kind = PduKind::from_tag(tag)?;
        let mut inner = Cursor::new(body);

        let request_id_bytes = inner.expect_tlv(tags::INTEGER)?;
        let request_id = integer::decode_signed(request_id_bytes)? as i32;

        let a_bytes = inner.expect_tlv(tags::INTEGER)?;
        let a = integer::decode_signed(a_bytes)? as i32;
        let b_bytes = inner.expect_tlv(tags::INTEGER)?;
        let b = integer::decode_signed(b_bytes)? as i32;

        let fields = if kind.is_bulk() {
            PduFields::Bulk { non_repeaters: a, max_repetitions: b }
        } else {
            PduFields::Standard { error_status: a, error_index: b }
        };

        let varbinds = decode_varbind_list(&mut inner)?;

        if kind.injects_trap_bindings() {
            validate_trap_bindings(&varbinds)?;
        }

        Ok(Pdu::new(kind, request_id, fields, varbinds))
    }
}

fn std_fields() -> PduFields {
    PduFields::Standard { error_status: 0, error_index: 0 }
}

fn validate_trap_bindings(varbinds: &[Vb]) -> Result<()> {
    let sys_up_time_oid = well_known::sys_up_time();
    let trap_oid_oid = well_known::snmp_trap_oid();
    match (varbinds.first(), varbinds.get(1)) {
        (Some(first), Some(second)) if first.oid == sys_up_time_oid && second.oid == trap_oid_oid => Ok(()),
        _ => Err(SnmpError::decode(DecodeErrorKind::WrongSequenceContainer)),
    }
}
