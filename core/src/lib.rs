//! Shared error types and low-level helpers used across the SNMP manager
//! core crates (`snmp-ber`, `snmp-smi`, `snmp-pdu`, `snmp-usm`,
//! `snmp-message`, `snmp-transport`).

pub mod error;
pub mod rng;

pub use error::{DecodeErrorKind, Result, SnmpError, UsmErrorKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_human_readable() {
        let e = SnmpError::RequestTimedOut { attempts: 3 };
        assert_eq!(e.to_string(), "request timed out after 3 attempts");
    }
}
