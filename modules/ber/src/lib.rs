//! BER/TLV codec for the SNMP manager core.
//!
//! This crate implements only the generic, SMI-independent wire mechanics:
//! the byte buffer (§4.1), TLV header encode/parse and length encoding
//! (§4.2), minimum-length two's-complement integers, and the OID
//! sub-identifier codec. The tagged SMI value union lives in `snmp-smi`.

pub mod buffer;
pub mod cursor;
pub mod integer;
pub mod length;
pub mod oid;
pub mod tags;

pub use buffer::Buffer;
pub use cursor::Cursor;
