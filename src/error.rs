use core::fmt::{Display, Formatter, Result};

/// Custom error type during key, signature and encoding operations
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The scalar is out of range or the point is not a valid public key
    InvalidKeyMaterial,
    /// A byte or text encoding could not be decoded
    Encoding(EncodingError),
    /// No public key could be recovered from a compact signature
    RecoveryFailure,
    /// No valid signature could be produced within the attempt limits
    SigningFailure,
    /// The signature does not verify against the message and public key
    InvalidSignature,
}

/// Reasons for which an encoded key, address or signature is rejected
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncodingError {
    /// The text contains characters outside the Base58 alphabet
    InvalidBase58,
    /// The Base58Check checksum does not match the payload
    ChecksumMismatch,
    /// The decoded payload has an unexpected length
    InvalidLength(usize),
    /// The decoded payload starts with an unexpected version byte
    InvalidVersion(u8),
    /// The trailing compression marker of a secret has an unexpected value
    InvalidCompressionFlag(u8),
    /// The signature is not strictly DER encoded
    MalformedSignature,
    /// The signature has a high s value
    NonCanonicalSignature,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::InvalidKeyMaterial => {
                write!(f, "The key material is out of range or not on the curve.")
            }
            Self::Encoding(e) => write!(f, "Invalid encoding: {}", e),
            Self::RecoveryFailure => {
                write!(f, "No public key can be recovered from this signature.")
            }
            Self::SigningFailure => {
                write!(f, "No valid nonce was found to compute the signature.")
            }
            Self::InvalidSignature => {
                write!(f, "The signature is invalid or was incorrectly computed.")
            }
        }
    }
}

impl Display for EncodingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::InvalidBase58 => write!(f, "not a Base58 string"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::InvalidLength(len) => write!(f, "unexpected payload length {}", len),
            Self::InvalidVersion(version) => write!(f, "unexpected version byte {:#04x}", version),
            Self::InvalidCompressionFlag(flag) => {
                write!(f, "unexpected compression marker {:#04x}", flag)
            }
            Self::MalformedSignature => write!(f, "malformed DER signature"),
            Self::NonCanonicalSignature => write!(f, "signature s value is not low"),
        }
    }
}

impl From<EncodingError> for Error {
    fn from(e: EncodingError) -> Self {
        Self::Encoding(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for EncodingError {}
