//! SMI value types and Object Identifier for the SNMP manager core.

pub mod ip;
pub mod oid;
pub mod value;
pub mod well_known;

pub use oid::Oid;
pub use value::{counter32_diff, counter64_diff, Value};
