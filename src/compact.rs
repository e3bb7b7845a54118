//! This module provides the 65-byte compact signature format,
//! embedding a recovery id so that the signer's public key can be
//! reconstructed from the signature and the message digest alone.

use super::error::Error;
use super::signature::Signature;
use super::{
    COMPACT_HEADER_BASE, COMPACT_HEADER_COMPRESSED_FLAG, COMPACT_SIGNATURE_LENGTH, SCALAR_LENGTH,
};

use core::fmt;

/// Identifies which of the (at most four) points sharing an x
/// coordinate with the signature's r was used during signing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RecoveryId(u8);

impl RecoveryId {
    /// Builds a recovery id from the parity of R.y and whether R.x
    /// overflowed the group order.
    pub fn new(is_y_odd: bool, is_x_reduced: bool) -> Self {
        RecoveryId((is_y_odd as u8) | ((is_x_reduced as u8) << 1))
    }

    /// Builds a recovery id from its integer value in 0..=3
    pub fn from_u8(id: u8) -> Option<Self> {
        if id < 4 {
            Some(RecoveryId(id))
        } else {
            None
        }
    }

    /// The integer value of this id
    pub fn to_u8(self) -> u8 {
        self.0
    }

    /// Whether the y coordinate of R is odd
    pub fn is_y_odd(self) -> bool {
        self.0 & 1 != 0
    }

    /// Whether the x coordinate of R was at least the group order
    pub fn is_x_reduced(self) -> bool {
        self.0 & 2 != 0
    }

    /// All possible recovery ids, in increasing order
    pub fn all() -> impl Iterator<Item = RecoveryId> {
        (0u8..4).map(RecoveryId)
    }
}

/// A compact signature: header byte followed by r and s.
///
/// The header is `27 + recovery id`, plus 4 when the signer's public
/// key is serialized in compressed form.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct CompactSignature([u8; COMPACT_SIGNATURE_LENGTH]);

impl CompactSignature {
    pub(crate) fn new(signature: &Signature, recovery_id: RecoveryId, compressed: bool) -> Self {
        let mut bytes = [0u8; COMPACT_SIGNATURE_LENGTH];
        bytes[0] = COMPACT_HEADER_BASE
            + recovery_id.to_u8()
            + if compressed {
                COMPACT_HEADER_COMPRESSED_FLAG
            } else {
                0
            };
        bytes[1..].copy_from_slice(&signature.to_bytes());

        CompactSignature(bytes)
    }

    /// Constructs a compact signature from a slice, which must be 65 bytes long.
    ///
    /// No validation of the header or of r and s happens here; it is
    /// deferred to recovery.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != COMPACT_SIGNATURE_LENGTH {
            return None;
        }

        let mut array = [0u8; COMPACT_SIGNATURE_LENGTH];
        array.copy_from_slice(bytes);

        Some(CompactSignature(array))
    }

    /// Converts this compact signature to an array of bytes
    pub fn to_bytes(&self) -> [u8; COMPACT_SIGNATURE_LENGTH] {
        self.0
    }

    /// The leading header byte
    pub fn header(&self) -> u8 {
        self.0[0]
    }

    /// Decodes the recovery id and the compressed flag from the header.
    ///
    /// Headers outside 27..=34 are rejected.
    pub fn recovery_id(&self) -> Result<(RecoveryId, bool), Error> {
        let header = self
            .header()
            .checked_sub(COMPACT_HEADER_BASE)
            .filter(|h| *h < 2 * COMPACT_HEADER_COMPRESSED_FLAG)
            .ok_or(Error::RecoveryFailure)?;

        let compressed = header & COMPACT_HEADER_COMPRESSED_FLAG != 0;
        let id = RecoveryId::from_u8(header & 3).ok_or(Error::RecoveryFailure)?;

        Ok((id, compressed))
    }

    /// Whether the header marks the signer's key as compressed
    pub fn is_compressed(&self) -> Result<bool, Error> {
        self.recovery_id().map(|(_, compressed)| compressed)
    }

    /// The (r, s) pair carried by this compact signature
    pub fn signature(&self) -> Result<Signature, Error> {
        let mut bytes = [0u8; 2 * SCALAR_LENGTH];
        bytes.copy_from_slice(&self.0[1..]);

        Signature::from_bytes(&bytes).map_err(|_| Error::RecoveryFailure)
    }
}

impl AsRef<[u8]> for CompactSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for CompactSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompactSignature(")?;
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}
