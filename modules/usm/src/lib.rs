//! SNMPv3 User-based Security Model: password-to-key
//! localization, HMAC-MD5-96/HMAC-SHA1-96 authentication, and
//! DES-CBC/3DES-CBC/AES-CFB-128/192/256 privacy.

pub mod auth;
pub mod localize;
pub mod params;
pub mod privacy;
pub mod protocol;

pub use params::SecureAgentParameters;
pub use protocol::{AuthProtocol, PrivProtocol};
