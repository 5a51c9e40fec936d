//! HMAC-MD5-96 / HMAC-SHA1-96 authentication.
//!
//! The caller is responsible for zeroing `msgAuthenticationParameters`
//! before computing the MAC over the full encoded packet, and for writing
//! the truncated MAC back into that field afterward — this module only
//! does the hashing and the constant-time comparison.

use crate::protocol::AuthProtocol;
use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use snmp_core::{Result, SnmpError, UsmErrorKind};
use subtle::ConstantTimeEq;

fn compute_full_mac(protocol: AuthProtocol, key: &[u8], message: &[u8]) -> Vec<u8> {
    match protocol {
        AuthProtocol::Md5 => {
            let mut mac = Hmac::<Md5>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        AuthProtocol::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

/// Compute the 12-byte truncated MAC over `message` (the encoded packet
/// with `msgAuthenticationParameters` set to 12 zero bytes).
pub fn compute_mac(protocol: AuthProtocol, key: &[u8], message: &[u8]) -> [u8; 12] {
    let full = compute_full_mac(protocol, key, message);
    let mut out = [0u8; 12];
    out.copy_from_slice(&full[..12]);
    out
}

/// Verify a received 12-byte MAC in constant time. Authentication failure
/// is always a hard error.
pub fn verify_mac(protocol: AuthProtocol, key: &[u8], message: &[u8], received_mac: &[u8]) -> Result<()> {
    if received_mac.len() != 12 {
        return Err(SnmpError::usm(UsmErrorKind::InvalidAuthParamsLength));
    }
    let expected = compute_mac(protocol, key, message);
    if expected.ct_eq(received_mac).into() {
        Ok(())
    } else {
        Err(SnmpError::usm(UsmErrorKind::AuthenticationFailed))
    }
}
