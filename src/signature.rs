//! This module provides a `Signature` struct holding an ECDSA
//! (r, s) pair, together with its strict DER codec.
//!
//! DER parsing is a single forward pass over the input:
//! sequence tag, sequence length, then two integers (tag, length,
//! bytes), then the end of input. Any deviation from the minimal
//! encoding rejects the whole signature; nothing is ever retried.

use super::error::{EncodingError, Error};
use super::{MAX_DER_SIGNATURE_LENGTH, MIN_DER_SIGNATURE_LENGTH, SCALAR_LENGTH};

use core::fmt;
use core::ops::Deref;

use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::scalar::IsHigh;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, Scalar, U256};

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

/// An ECDSA signature not attached to its message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Signature {
    pub(crate) r: Scalar,
    pub(crate) s: Scalar,
}

impl Signature {
    /// Builds a signature from its components, both of which must be
    /// in the range [1, n-1].
    pub(crate) fn from_scalars(r: Scalar, s: Scalar) -> Result<Self, Error> {
        if bool::from(r.is_zero() | s.is_zero()) {
            return Err(EncodingError::MalformedSignature.into());
        }

        Ok(Signature { r, s })
    }

    /// Constructs a signature from the 64-byte concatenation of r and s
    pub fn from_bytes(bytes: &[u8; 2 * SCALAR_LENGTH]) -> Result<Self, Error> {
        let mut component = [0u8; SCALAR_LENGTH];

        component.copy_from_slice(&bytes[..SCALAR_LENGTH]);
        let r = scalar_from_bytes(&component).ok_or(EncodingError::MalformedSignature)?;

        component.copy_from_slice(&bytes[SCALAR_LENGTH..]);
        let s = scalar_from_bytes(&component).ok_or(EncodingError::MalformedSignature)?;

        Ok(Signature { r, s })
    }

    /// Converts this signature to the 64-byte concatenation of r and s
    pub fn to_bytes(&self) -> [u8; 2 * SCALAR_LENGTH] {
        let mut bytes = [0u8; 2 * SCALAR_LENGTH];
        bytes[..SCALAR_LENGTH].copy_from_slice(&self.r_bytes());
        bytes[SCALAR_LENGTH..].copy_from_slice(&self.s_bytes());

        bytes
    }

    /// The big-endian r component
    pub fn r_bytes(&self) -> [u8; SCALAR_LENGTH] {
        scalar_to_bytes(&self.r)
    }

    /// The big-endian s component
    pub fn s_bytes(&self) -> [u8; SCALAR_LENGTH] {
        scalar_to_bytes(&self.s)
    }

    /// Returns true if s is at most n/2.
    pub fn is_low_s(&self) -> bool {
        !bool::from(self.s.is_high())
    }

    /// Returns the same signature with s replaced by n - s when s is high.
    pub fn normalize_s(&self) -> Self {
        if self.is_low_s() {
            *self
        } else {
            Signature {
                r: self.r,
                s: -self.s,
            }
        }
    }

    /// Returns true if r fits in 32 DER bytes, i.e. its top bit is clear.
    pub fn has_low_r(&self) -> bool {
        self.r_bytes()[0] < 0x80
    }

    /// Parses a strictly DER encoded signature.
    ///
    /// Both components must be in the range [1, n-1]. The value of s is
    /// not required to be low here; canonical form is enforced by
    /// verification.
    pub fn from_der(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < MIN_DER_SIGNATURE_LENGTH || bytes.len() > MAX_DER_SIGNATURE_LENGTH {
            return Err(EncodingError::MalformedSignature.into());
        }

        let mut reader = DerReader::new(bytes);
        reader.expect_tag(SEQUENCE_TAG)?;
        let len = reader.read_length()?;
        if len != reader.remaining() {
            return Err(EncodingError::MalformedSignature.into());
        }

        let r = reader.read_integer()?;
        let s = reader.read_integer()?;
        if reader.remaining() != 0 {
            return Err(EncodingError::MalformedSignature.into());
        }

        Signature::from_scalars(r, s)
    }

    /// Serializes this signature with minimal DER integers
    pub fn to_der(&self) -> DerSignature {
        let mut bytes = [0u8; MAX_DER_SIGNATURE_LENGTH];

        let mut pos = 2;
        pos = write_integer(&mut bytes, pos, &self.r_bytes());
        pos = write_integer(&mut bytes, pos, &self.s_bytes());

        bytes[0] = SEQUENCE_TAG;
        bytes[1] = (pos - 2) as u8;

        DerSignature { bytes, len: pos }
    }
}

/// A DER encoded signature of at most 72 bytes.
#[derive(Clone, Copy)]
pub struct DerSignature {
    bytes: [u8; MAX_DER_SIGNATURE_LENGTH],
    len: usize,
}

impl DerSignature {
    /// Returns the encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl Deref for DerSignature {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for DerSignature {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for DerSignature {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for DerSignature {}

impl fmt::Debug for DerSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerSignature(")?;
        for byte in self.as_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

/// Interprets 32 big-endian bytes as a scalar in [1, n-1].
pub(crate) fn scalar_from_bytes(bytes: &[u8; SCALAR_LENGTH]) -> Option<Scalar> {
    let scalar: Option<Scalar> = Scalar::from_repr(FieldBytes::from(*bytes)).into();

    scalar.filter(|s| !bool::from(s.is_zero()))
}

/// Serializes a scalar as 32 big-endian bytes.
pub(crate) fn scalar_to_bytes(scalar: &Scalar) -> [u8; SCALAR_LENGTH] {
    let mut bytes = [0u8; SCALAR_LENGTH];
    bytes.copy_from_slice(&scalar.to_bytes());
    bytes
}

/// Interprets a message digest as a scalar, reduced modulo n.
pub(crate) fn scalar_from_digest(digest: &[u8; SCALAR_LENGTH]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*digest))
}

fn write_integer(out: &mut [u8], mut pos: usize, value: &[u8; SCALAR_LENGTH]) -> usize {
    // Components are non-zero, so at least one byte survives the trimming
    let start = value
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(SCALAR_LENGTH - 1);
    let digits = &value[start..];
    let pad = digits[0] & 0x80 != 0;

    out[pos] = INTEGER_TAG;
    out[pos + 1] = (digits.len() + pad as usize) as u8;
    pos += 2;
    if pad {
        out[pos] = 0x00;
        pos += 1;
    }
    out[pos..pos + digits.len()].copy_from_slice(digits);

    pos + digits.len()
}

struct DerReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        DerReader { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn read_byte(&mut self) -> Result<u8, Error> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(EncodingError::MalformedSignature)?;
        self.pos += 1;

        Ok(byte)
    }

    fn expect_tag(&mut self, tag: u8) -> Result<(), Error> {
        if self.read_byte()? != tag {
            return Err(EncodingError::MalformedSignature.into());
        }

        Ok(())
    }

    /// Reads a short-form length; long forms never fit in 72 bytes.
    fn read_length(&mut self) -> Result<usize, Error> {
        let len = self.read_byte()?;
        if len & 0x80 != 0 {
            return Err(EncodingError::MalformedSignature.into());
        }

        Ok(len as usize)
    }

    fn read_integer(&mut self) -> Result<Scalar, Error> {
        self.expect_tag(INTEGER_TAG)?;
        let len = self.read_length()?;
        if len == 0 || len > SCALAR_LENGTH + 1 || len > self.remaining() {
            return Err(EncodingError::MalformedSignature.into());
        }

        let mut digits = &self.bytes[self.pos..self.pos + len];
        self.pos += len;

        // Negative
        if digits[0] & 0x80 != 0 {
            return Err(EncodingError::MalformedSignature.into());
        }
        if digits[0] == 0x00 && len > 1 {
            // Superfluous padding
            if digits[1] & 0x80 == 0 {
                return Err(EncodingError::MalformedSignature.into());
            }
            digits = &digits[1..];
        }
        if digits.len() > SCALAR_LENGTH {
            return Err(EncodingError::MalformedSignature.into());
        }

        let mut value = [0u8; SCALAR_LENGTH];
        value[SCALAR_LENGTH - digits.len()..].copy_from_slice(digits);

        Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(value)))
            .ok_or_else(|| EncodingError::MalformedSignature.into())
    }
}
