//! The nine PDU types and their wire tags.

use snmp_ber::tags;
use snmp_core::{DecodeErrorKind, Result, SnmpError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduKind {
    Get,
    GetNext,
    Response,
    Set,
    Trap,
    GetBulk,
    Inform,
    V2Trap,
    Report,
}

impl PduKind {
    pub fn tag(self) -> u8 {
        match self {
            PduKind::Get => tags::PDU_GET,
            PduKind::GetNext => tags::PDU_GET_NEXT,
            PduKind::Response => tags::PDU_RESPONSE,
            PduKind::Set => tags::PDU_SET,
            PduKind::Trap => tags::PDU_TRAP,
            PduKind::GetBulk => tags::PDU_GET_BULK,
            PduKind::Inform => tags::PDU_INFORM,
            PduKind::V2Trap => tags::PDU_V2_TRAP,
            PduKind::Report => tags::PDU_REPORT,
        }
    }

    pub fn from_tag(tag: u8) -> Result<PduKind> {
        Ok(match tag {
            tags::PDU_GET => PduKind::Get,
            tags::PDU_GET_NEXT => PduKind::GetNext,
            tags::PDU_RESPONSE => PduKind::Response,
            tags::PDU_SET => PduKind::Set,
            tags::PDU_TRAP => PduKind::Trap,
            tags::PDU_GET_BULK => PduKind::GetBulk,
            tags::PDU_INFORM => PduKind::Inform,
            tags::PDU_V2_TRAP => PduKind::V2Trap,
            tags::PDU_REPORT => PduKind::Report,
            _ => return Err(SnmpError::decode(DecodeErrorKind::InvalidTag)),
        })
    }

    /// GetBulk is the only PDU whose second/third integer fields are
    /// nonRepeaters/maxRepetitions rather than errorStatus/errorIndex.
    pub fn is_bulk(self) -> bool {
        matches!(self, PduKind::GetBulk)
    }

    /// V2Trap/Inform get sysUpTime.0 and snmpTrapOID.0 injected as the
    /// first two varbinds on encode.
    pub fn injects_trap_bindings(self) -> bool {
        matches!(self, PduKind::V2Trap | PduKind::Inform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_for_all_kinds() {
        let kinds = [
            PduKind::Get,
            PduKind::GetNext,
            PduKind::Response,
            PduKind::Set,
            PduKind::Trap,
            PduKind::GetBulk,
            PduKind::Inform,
            PduKind::V2Trap,
            PduKind::Report,
        ];
        for k in kinds {
            assert_eq!(PduKind::from_tag(k.tag()).unwrap(), k);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(PduKind::from_tag(0x99).is_err());
    }
}
