//! Well-known OIDs used by more than one crate, collected
//! here so they're derived once rather than at every call site.

use crate::oid::Oid;

/// sysUpTime.0 — injected as the first Vb of V2Trap/Inform PDUs.
pub fn sys_up_time() -> Oid {
    Oid::new(vec![1, 3, 6, 1, 2, 1, 1, 3, 0])
}

/// snmpTrapOID.0 — injected as the second Vb of V2Trap/Inform PDUs.
pub fn snmp_trap_oid() -> Oid {
    Oid::new(vec![1, 3, 6, 1, 6, 3, 1, 1, 4, 1, 0])
}

/// usmStatsUnknownEngineIDs.0 — identifies a discovery Report.
pub fn usm_stats_unknown_engine_ids() -> Oid {
    Oid::new(vec![1, 3, 6, 1, 6, 3, 15, 1, 1, 4, 0])
}

/// usmStatsNotInTimeWindows.0 — identifies a time-window-failure Report.
pub fn usm_stats_not_in_time_windows() -> Oid {
    Oid::new(vec![1, 3, 6, 1, 6, 3, 15, 1, 1, 2, 0])
}

/// sysDescr.0, used throughout the test fixtures.
pub fn sys_descr() -> Oid {
    Oid::new(vec![1, 3, 6, 1, 2, 1, 1, 1, 0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_oids_render_correctly() {
        assert_eq!(sys_up_time().to_string(), "1.3.6.1.2.1.1.3.0");
        assert_eq!(snmp_trap_oid().to_string(), "1.3.6.1.6.3.1.1.4.1.0");
        assert_eq!(
            usm_stats_unknown_engine_ids().to_string(),
            "1.3.6.1.6.3.15.1.1.4.0"
        );
    }
}
