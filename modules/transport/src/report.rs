//! Report-PDU classification: a Report is either a
//! discovery response (`usmStatsUnknownEngineIDs`) or a generic
//! error/informational report.

use snmp_pdu::Pdu;
use snmp_smi::well_known;

pub enum ReportKind {
    UnknownEngineId,
    NotInTimeWindow,
    Other,
}

pub fn classify(pdu: &Pdu) -> ReportKind {
    match pdu.varbinds.first() {
        Some(vb) if vb.oid == well_known::usm_stats_unknown_engine_ids() => ReportKind::UnknownEngineId,
        Some(vb) if vb.oid == well_known::usm_stats_not_in_time_windows() => ReportKind::NotInTimeWindow,
        _ => ReportKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snmp_pdu::Vb;
    use snmp_smi::Value;

    #[test]
    fn classifies_unknown_engine_id_report() {
        let pdu = Pdu::report(1, vec![Vb::new(well_known::usm_stats_unknown_engine_ids(), Value::Counter32(1))]);
        assert!(matches!(classify(&pdu), ReportKind::UnknownEngineId));
    }

    #[test]
    fn classifies_other_report() {
        let pdu = Pdu::report(1, vec![]);
        assert!(matches!(classify(&pdu), ReportKind::Other));
    }
}
