//! Wire tag catalogue.

pub const INTEGER: u8 = 0x02;
pub const OCTET_STRING: u8 = 0x04;
pub const NULL: u8 = 0x05;
pub const OBJECT_ID: u8 = 0x06;
pub const SEQUENCE: u8 = 0x30;

pub const IP_ADDRESS: u8 = 0x40;
pub const COUNTER32: u8 = 0x41;
pub const GAUGE32: u8 = 0x42;
pub const TIME_TICKS: u8 = 0x43;
pub const OPAQUE: u8 = 0x44;
pub const COUNTER64: u8 = 0x46;

pub const NO_SUCH_OBJECT: u8 = 0x80;
pub const NO_SUCH_INSTANCE: u8 = 0x81;
pub const END_OF_MIB_VIEW: u8 = 0x82;

pub const PDU_GET: u8 = 0xA0;
pub const PDU_GET_NEXT: u8 = 0xA1;
pub const PDU_RESPONSE: u8 = 0xA2;
pub const PDU_SET: u8 = 0xA3;
pub const PDU_TRAP: u8 = 0xA4;
pub const PDU_GET_BULK: u8 = 0xA5;
pub const PDU_INFORM: u8 = 0xA6;
pub const PDU_V2_TRAP: u8 = 0xA7;
pub const PDU_REPORT: u8 = 0xA8;

/// Low 5 bits of the tag byte that signal the (unsupported) multi-byte tag
/// extension.
pub const MULTI_BYTE_TAG_MASK: u8 = 0x1F;

pub fn is_multi_byte_tag(tag_byte: u8) -> bool {
    (tag_byte & MULTI_BYTE_TAG_MASK) == MULTI_BYTE_TAG_MASK
}
