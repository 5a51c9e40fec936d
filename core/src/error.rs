use thiserror::Error;

/// Result alias used throughout the SNMP manager core.
pub type Result<T> = std::result::Result<T, SnmpError>;

/// BER/PDU decoding failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    ShortBuffer,
    InvalidTag,
    WrongSequenceContainer,
    LengthMismatch,
    UnknownSmiType,
    InvalidOidEncoding,
    MultiByteTagUnsupported,
    NonZeroLengthException,
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ShortBuffer => "short buffer",
            Self::InvalidTag => "invalid tag",
            Self::WrongSequenceContainer => "wrong sequence container",
            Self::LengthMismatch => "length mismatch",
            Self::UnknownSmiType => "unknown SMI value type",
            Self::InvalidOidEncoding => "invalid OID sub-identifier encoding",
            Self::MultiByteTagUnsupported => "multi-byte tag extension not supported",
            Self::NonZeroLengthException => "non-zero length for exception value",
        };
        f.write_str(s)
    }
}

/// USM failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsmErrorKind {
    AuthenticationFailed,
    UnsupportedSecurityModel,
    UnsupportedNoAuthPriv,
    InvalidAuthParamsLength,
    InvalidPrivParamsLength,
    UnsupportedPrivacyProtocol,
    InvalidAuthoritativeEngineId,
    EngineTimeOutsideWindow,
    SecretTooShort,
}

impl std::fmt::Display for UsmErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AuthenticationFailed => "authentication failed",
            Self::UnsupportedSecurityModel => "unsupported security model",
            Self::UnsupportedNoAuthPriv => "unsupported noAuthPriv combination",
            Self::InvalidAuthParamsLength => "invalid authentication-parameters length",
            Self::InvalidPrivParamsLength => "invalid privacy-parameters length",
            Self::UnsupportedPrivacyProtocol => "unsupported privacy protocol",
            Self::InvalidAuthoritativeEngineId => "invalid authoritative engineId",
            Self::EngineTimeOutsideWindow => "engine time outside window",
            Self::SecretTooShort => "secret too short",
        };
        f.write_str(s)
    }
}

/// The single error type shared by every crate in this workspace. Callers
/// match on one enum regardless of which layer (BER, PDU, USM, transport)
/// raised it.
#[derive(Debug, Error)]
pub enum SnmpError {
    #[error("decode error: {kind}")]
    Decode { kind: DecodeErrorKind },

    #[error("version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: i32, actual: i32 },

    #[error("PDU type {actual:#04x} unexpected for this context")]
    UnexpectedPduType { actual: u8 },

    #[error("request-id mismatch: expected {expected}, got {actual}")]
    RequestIdMismatch { expected: i32, actual: i32 },

    #[error("community mismatch")]
    CommunityMismatch,

    #[error("securityName mismatch")]
    SecurityNameMismatch,

    #[error("USM error: {kind}")]
    Usm { kind: UsmErrorKind },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("host unreachable: {0}")]
    HostUnreachable(String),

    #[error("message size {size} exceeds maximum {max}")]
    MessageSizeExceeded { size: usize, max: usize },

    #[error("request timed out after {attempts} attempts")]
    RequestTimedOut { attempts: u32 },

    #[error("socket terminated")]
    SocketTerminated,

    #[error("agent reported error status {status:?} at index {index}")]
    AgentError { status: crate::error::ErrorStatus, index: i32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report received: {0}")]
    Report(String),
}

impl SnmpError {
    pub fn decode(kind: DecodeErrorKind) -> Self {
        Self::Decode { kind }
    }

    pub fn usm(kind: UsmErrorKind) -> Self {
        Self::Usm { kind }
    }

    /// True for transport errors that indicate simple packet loss and
    /// should be retried up to the configured cap.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::RequestTimedOut { .. })
    }
}

/// RFC 3416 error-status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    Other(i32),
}

impl ErrorStatus {
    pub fn from_i32(v: i32) -> Self {
        match v {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => Self::Other(other),
        }
    }

    pub fn to_i32(self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Other(v) => v,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::NoError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_round_trips() {
        for code in 0..=18 {
            let s = ErrorStatus::from_i32(code);
            assert_eq!(s.to_i32(), code);
        }
    }

    #[test]
    fn unknown_error_status_preserved() {
        let s = ErrorStatus::from_i32(99);
        assert_eq!(s.to_i32(), 99);
    }
}
