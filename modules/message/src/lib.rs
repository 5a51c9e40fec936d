//! Wire framing for the SNMP manager core: v1/v2c
//! community envelopes and SNMPv3 message/USM framing with scoped-PDU
//! wrap/encrypt.

pub mod community;
pub mod v3;

pub use community::CommunityMessage;
pub use v3::{MsgFlags, ScopedPduData, UsmSecurityParameters, V3Message};
