//! Privacy (encryption/decryption) for USM.
//!
//! Key material for every protocol is drawn from the localized/extended
//! authentication key: DES and 3DES use the first bytes as the cipher key
//! and the next 8 as a pre-IV; AES-CFB uses only a cipher key, no pre-IV.
//! `msgPrivacyParameters` is always 8 bytes on the wire in this library,
//! regardless of which protocol generated it.

use crate::protocol::PrivProtocol;
use aes::cipher::{AsyncStreamCipher, KeyIvInit};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut};
use des::TdesEde3;
use snmp_core::rng::next_salt;
use snmp_core::{Result, SnmpError, UsmErrorKind};

type DesCbcEnc = cbc::Encryptor<des::Des>;
type DesCbcDec = cbc::Decryptor<des::Des>;
type Des3CbcEnc = cbc::Encryptor<TdesEde3>;
type Des3CbcDec = cbc::Decryptor<TdesEde3>;
type Aes128Cfb = cfb_mode::Encryptor<aes::Aes128>;
type Aes128CfbDec = cfb_mode::Decryptor<aes::Aes128>;
type Aes192Cfb = cfb_mode::Encryptor<aes::Aes192>;
type Aes192CfbDec = cfb_mode::Decryptor<aes::Aes192>;
type Aes256Cfb = cfb_mode::Encryptor<aes::Aes256>;
type Aes256CfbDec = cfb_mode::Decryptor<aes::Aes256>;

/// `msgPrivacyParameters`: 8 bytes, carried verbatim on the wire and used
/// by the receiver to reconstruct the IV.
pub type PrivParams = [u8; 8];

/// Generate fresh `msgPrivacyParameters` for an outgoing encrypt.
/// The salt counter occupies the low 4 bytes; callers that need engineBoots
/// in the high 4 bytes (DES/3DES) overwrite them afterward.
pub fn next_priv_params() -> PrivParams {
    let mut out = [0u8; 8];
    out[4..8].copy_from_slice(&next_salt().to_be_bytes());
    out
}

fn des_like_iv(pre_iv: &[u8], params: &PrivParams) -> [u8; 8] {
    let mut iv = [0u8; 8];
    for i in 0..8 {
        iv[i] = pre_iv[i] ^ params[i];
    }
    iv
}

/// AES-CFB IV: engineBoots (4 bytes BE) || engineTime (4 bytes BE) || salt
/// (8 bytes), per RFC 3826.
fn aes_iv(engine_boots: u32, engine_time: u32, params: &PrivParams) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[0..4].copy_from_slice(&engine_boots.to_be_bytes());
    iv[4..8].copy_from_slice(&engine_time.to_be_bytes());
    iv[8..16].copy_from_slice(params);
    iv
}

fn pad_to_block(mut data: Vec<u8>, block: usize) -> Vec<u8> {
    let rem = data.len() % block;
    if rem != 0 {
        data.resize(data.len() + (block - rem), 0);
    }
    data
}

/// Encrypt a ScopedPdu plaintext, returning (ciphertext, privacyParameters).
pub fn encrypt(
    protocol: PrivProtocol,
    key: &[u8],
    engine_boots: u32,
    engine_time: u32,
    plaintext: &[u8],
) -> Result<(Vec<u8>, PrivParams)> {
    let params = next_priv_params();
    let params = match protocol {
        PrivProtocol::Des | PrivProtocol::Des3 => {
            // High 4 bytes engineBoots, low 4 a monotonic salt.
            let mut p = [0u8; 8];
            p[0..4].copy_from_slice(&engine_boots.to_be_bytes());
            p[4..8].copy_from_slice(&params[0..4]);
            p
        }
        _ => params,
    };

    let ciphertext = match protocol {
        PrivProtocol::Des => {
            if key.len() < 16 {
                return Err(SnmpError::usm(UsmErrorKind::InvalidPrivParamsLength));
            }
            let cipher_key = &key[0..8];
            let pre_iv = &key[8..16];
            let iv = des_like_iv(pre_iv, &params);
            let mut data = pad_to_block(plaintext.to_vec(), 8);
            let len = data.len();
            DesCbcEnc::new(cipher_key.into(), &iv.into())
                .encrypt_padded_mut::<cbc::cipher::block_padding::NoPadding>(&mut data, len)
                .map(|b| b.to_vec())
                .map_err(|_| SnmpError::usm(UsmErrorKind::UnsupportedPrivacyProtocol))?
        }
        PrivProtocol::Des3 => {
            if key.len() < 32 {
                return Err(SnmpError::usm(UsmErrorKind::InvalidPrivParamsLength));
            }
            let cipher_key = &key[0..24];
            let pre_iv = &key[24..32];
            let iv = des_like_iv(pre_iv, &params);
            let mut data = pad_to_block(plaintext.to_vec(), 8);
            let len = data.len();
            Des3CbcEnc::new(cipher_key.into(), &iv.into())
                .encrypt_padded_mut::<cbc::cipher::block_padding::NoPadding>(&mut data, len)
                .map(|b| b.to_vec())
                .map_err(|_| SnmpError::usm(UsmErrorKind::UnsupportedPrivacyProtocol))?
        }
        PrivProtocol::Aes128 => {
            let iv = aes_iv(engine_boots, engine_time, &params);
            let mut data = plaintext.to_vec();
            Aes128Cfb::new(key.into(), &iv.into()).encrypt(&mut data);
            data
        }
        PrivProtocol::Aes192 => {
            let iv = aes_iv(engine_boots, engine_time, &params);
            let mut data = plaintext.to_vec();
            Aes192Cfb::new(key.into(), &iv.into()).encrypt(&mut data);
            data
        }
        PrivProtocol::Aes256 => {
            let iv = aes_iv(engine_boots, engine_time, &params);
            let mut data = plaintext.to_vec();
            Aes256Cfb::new(key.into(), &iv.into()).encrypt(&mut data);
            data
        }
    };

    Ok((ciphertext, params))
}

/// Decrypt a ciphertext produced by `encrypt` (or a compliant peer).
pub fn decrypt(
    protocol: PrivProtocol,
    key: &[u8],
    engine_boots: u32,
    engine_time: u32,
    params: &PrivParams,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    match protocol {
        PrivProtocol::Des => {
            if key.len() < 16 {
                return Err(SnmpError::usm(UsmErrorKind::InvalidPrivParamsLength));
            }
            if ciphertext.is_empty() || ciphertext.len() % 8 != 0 {
                return Err(SnmpError::usm(UsmErrorKind::InvalidPrivParamsLength));
            }
            let cipher_key = &key[0..8];
            let pre_iv = &key[8..16];
            let iv = des_like_iv(pre_iv, params);
            let mut data = ciphertext.to_vec();
            let len = data.len();
            let out = DesCbcDec::new(cipher_key.into(), &iv.into())
                .decrypt_padded_mut::<cbc::cipher::block_padding::NoPadding>(&mut data[..len])
                .map_err(|_| SnmpError::usm(UsmErrorKind::AuthenticationFailed))?;
            Ok(out.to_vec())
        }
        PrivProtocol::Des3 => {
            if key.len() < 32 {
                return Err(SnmpError::usm(UsmErrorKind::InvalidPrivParamsLength));
            }
            if ciphertext.is_empty() || ciphertext.len() % 8 != 0 {
                return Err(SnmpError::usm(UsmErrorKind::InvalidPrivParamsLength));
            }
            let cipher_key = &key[0..24];
            let pre_iv = &key[24..32];
            let iv = des_like_iv(pre_iv, params);
            let mut data = ciphertext.to_vec();
            let len = data.len();
            let out = Des3CbcDec::new(cipher_key.into(), &iv.into())
                .decrypt_padded_mut::<cbc::cipher::block_padding::NoPadding>(&mut data[..len])
                .map_err(|_| SnmpError::usm(UsmErrorKind::AuthenticationFailed))?;
            Ok(out.to_vec())
        }
        PrivProtocol::Aes128 => {
            let iv = aes_iv(engine_boots, engine_time, params);
            let mut data = ciphertext.to_vec();
            Aes128CfbDec::new(key.into(), &iv.into()).decrypt(&mut data);
            Ok(data)
        }
        PrivProtocol::Aes192 => {
            let iv = aes_iv(engine_boots, engine_time, params);
            let mut data = ciphertext.to_vec();
            Aes192CfbDec::new(key.into(), &iv.into()).decrypt(&mut data);
            Ok(data)
        }
        PrivProtocol::Aes256 => {
            let iv = aes_iv(engine_boots, engine_time, params);
            let mut data = ciphertext.to_vec();
            Aes256CfbDec::new(key.into(), &iv.into()).decrypt(&mut data);
            Ok(data)
        }
    }
}
