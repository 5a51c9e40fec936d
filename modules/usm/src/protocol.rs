//! Authentication and privacy protocol selectors.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthProtocol {
    Md5,
    Sha1,
}

impl AuthProtocol {
    /// Digest length in bytes, and therefore the localized-key length.
    pub fn digest_len(self) -> usize {
        match self {
            AuthProtocol::Md5 => 16,
            AuthProtocol::Sha1 => 20,
        }
    }

    /// HMAC output is always truncated to 96 bits on the wire (HMAC-MD5-96 /
    /// HMAC-SHA1-96).
    pub fn mac_len(self) -> usize {
        12
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivProtocol {
    Des,
    Des3,
    Aes128,
    Aes192,
    Aes256,
}

impl PrivProtocol {
    /// Cipher key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            PrivProtocol::Des => 8,
            PrivProtocol::Des3 => 24,
            PrivProtocol::Aes128 => 16,
            PrivProtocol::Aes192 => 24,
            PrivProtocol::Aes256 => 32,
        }
    }

    /// Total key material drawn from the localized/extended key: the
    /// cipher key, plus (for the CBC protocols) an 8-byte pre-IV that
    /// follows it in the same key buffer.
    pub fn key_material_len(self) -> usize {
        match self {
            PrivProtocol::Des | PrivProtocol::Des3 => self.key_len() + 8,
            PrivProtocol::Aes128 | PrivProtocol::Aes192 | PrivProtocol::Aes256 => self.key_len(),
        }
    }

    /// `msgPrivacyParameters` length on the wire — 8 bytes for every
    /// protocol this library supports.
    pub fn priv_params_len(self) -> usize {
        8
    }

    pub fn is_block_cipher(self) -> bool {
        matches!(self, PrivProtocol::Des | PrivProtocol::Des3)
    }
}
