//! Password-to-key localization (RFC 3414 §2.6,).
//!
//! Expand the password cyclically into a 1,048,576-byte buffer, hash it,
//! then hash `digest || engineId || digest`. Key extension for privacy
//! protocols needing more material than the auth protocol produces repeats
//! the same `hash(key || engineId || key)` step.

use crate::protocol::AuthProtocol;
use digest::Digest;
use md5::Md5;
use sha1::Sha1;
use snmp_core::{Result, SnmpError, UsmErrorKind};
use zeroize::Zeroizing;

const EXPANSION_LEN: usize = 1_048_576;
const MIN_PASSWORD_LEN: usize = 8;

fn password_to_key_generic<D: Digest>(password: &[u8]) -> Vec<u8> {
    let mut hasher = D::new();
    let mut buf = [0u8; 64];
    let mut index = 0usize;
    let mut produced = 0usize;
    while produced < EXPANSION_LEN {
        for slot in buf.iter_mut() {
            *slot = password[index % password.len()];
            index += 1;
        }
        hasher.update(buf);
        produced += 64;
    }
    hasher.finalize().to_vec()
}

fn localize_generic<D: Digest>(digest: &[u8], engine_id: &[u8]) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(digest);
    hasher.update(engine_id);
    hasher.update(digest);
    hasher.finalize().to_vec()
}

/// Hash the expanded password (the un-localized step of RFC 3414 §2.6).
pub fn password_to_key(protocol: AuthProtocol, password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(SnmpError::usm(UsmErrorKind::SecretTooShort));
    }
    let digest = match protocol {
        AuthProtocol::Md5 => password_to_key_generic::<Md5>(password),
        AuthProtocol::Sha1 => password_to_key_generic::<Sha1>(password),
    };
    Ok(Zeroizing::new(digest))
}

/// Localize an already-expanded digest against a specific engineId.
pub fn localize_key(protocol: AuthProtocol, digest: &[u8], engine_id: &[u8]) -> Zeroizing<Vec<u8>> {
    let localized = match protocol {
        AuthProtocol::Md5 => localize_generic::<Md5>(digest, engine_id),
        AuthProtocol::Sha1 => localize_generic::<Sha1>(digest, engine_id),
    };
    Zeroizing::new(localized)
}

/// Full password-to-localized-key pipeline in one call.
pub fn localize_password(
    protocol: AuthProtocol,
    password: &[u8],
    engine_id: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let digest = password_to_key(protocol, password)?;
    Ok(localize_key(protocol, &digest, engine_id))
}

/// Extend `key` to at least `needed_len` bytes by repeatedly hashing
/// `key || engineId || key` and appending the result, then truncating to the exact length.
pub fn extend_key(protocol: AuthProtocol, key: &[u8], engine_id: &[u8], needed_len: usize) -> Zeroizing<Vec<u8>> {
    let mut out = key.to_vec();
    while out.len() < needed_len {
        let next = match protocol {
            AuthProtocol::Md5 => localize_generic::<Md5>(&out, engine_id),
            AuthProtocol::Sha1 => localize_generic::<Sha1>(&out, engine_id),
        };
        out.extend_from_slice(&next);
    }
    out.truncate(needed_len);
    Zeroizing::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3414_md5_password_to_key_vector() {
        // fixture 5.
        let engine_id = hex::decode("000000000000000000000002").unwrap();
        let key = localize_password(AuthProtocol::Md5, b"maplesyrup", &engine_id).unwrap();
        assert_eq!(
            key.as_slice(),
            hex::decode("526f5eed9fcce26f8964c2930787d82b").unwrap().as_slice()
        );
    }

    #[test]
    fn rejects_short_password() {
        assert!(password_to_key(AuthProtocol::Md5, b"short").is_err());
    }

    #[test]
    fn extend_key_reaches_requested_length() {
        let key = localize_password(AuthProtocol::Md5, b"maplesyrup", b"engine").unwrap();
        let extended = extend_key(AuthProtocol::Md5, &key, b"engine", 32);
        assert_eq!(extended.len(), 32);
        assert_eq!(&extended[..16], key.as_slice());
    }
}
