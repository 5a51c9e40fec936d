//! Shared helpers used by both `CommunityTarget` and `UserTarget`:
//! turning a varbind list into a lookup map, checking a Response PDU for
//! protocol-level failure, and the generic walk loop used by `walk()`.

use snmp_core::{ErrorStatus, Result, SnmpError};
use snmp_pdu::{Pdu, PduKind, Vb};
use snmp_smi::{Oid, Value};
use std::collections::BTreeMap;

pub fn varbinds_to_map(varbinds: Vec<Vb>) -> BTreeMap<Oid, Value> {
    varbinds.into_iter().map(|vb| (vb.oid, vb.value)).collect()
}

/// Check a decoded reply PDU against the request it answers: must be a Response, must echo the request-id, and a non-zero
/// errorStatus fails the whole request.
pub fn check_response(pdu: &Pdu, expected_request_id: i32) -> Result<&[Vb]> {
    if pdu.kind != PduKind::Response {
        return Err(SnmpError::UnexpectedPduType { actual: pdu.kind.tag() });
    }
    if pdu.request_id != expected_request_id {
        return Err(SnmpError::RequestIdMismatch { expected: expected_request_id, actual: pdu.request_id });
    }
    let snmp_pdu::PduFields::Standard { error_status, error_index } = pdu.fields else {
        return Err(SnmpError::UnexpectedPduType { actual: pdu.kind.tag() });
    };
    let status = ErrorStatus::from_i32(error_status);
    if !status.is_success() {
        return Err(SnmpError::AgentError { status, index: error_index });
    }
    Ok(&pdu.varbinds)
}

/// Walk a subtree rooted at `root`, calling `next(previous_oid)` to fetch
/// each successive varbind (typically backed by GetNext or unrolled
/// GetBulk results) until a reply falls outside the subtree, is an
/// exception value, or doesn't advance.
pub async fn walk_subtree<F, Fut>(root: &Oid, mut next: F) -> Result<Vec<Vb>>
where
    F: FnMut(Oid) -> Fut,
    Fut: std::future::Future<Output = Result<Option<Vb>>>,
{
    let mut out = Vec::new();
    let mut cursor = root.clone();
    loop {
        let Some(vb) = next(cursor.clone()).await? else {
            break;
        };
        if !root.is_proper_prefix_of(&vb.oid) && &vb.oid != root {
            break;
        }
        if vb.oid <= cursor {
            break;
        }
        if vb.value.is_exception() {
            break;
        }
        cursor = vb.oid.clone();
        out.push(vb);
    }
    Ok(out)
}
