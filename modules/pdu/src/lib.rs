//! PDU and varbind model for the SNMP manager core.

pub mod kind;
pub mod pdu;
pub mod scoped;
pub mod varbind;

pub use kind::PduKind;
pub use pdu::{Pdu, PduFields};
pub use scoped::ScopedPdu;
pub use varbind::Vb;
