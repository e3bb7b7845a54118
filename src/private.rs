//! This module provides a `PrivateKey` wrapping struct around a
//! `Scalar` element, with deterministic ECDSA signing.

use super::base58::{decode_check, encode_versioned};
use super::compact::{CompactSignature, RecoveryId};
use super::error::{EncodingError, Error};
use super::network::NetworkParams;
use super::nonce::{counter_entropy, NonceGenerator, EXTRA_ENTROPY_LENGTH};
use super::signature::{scalar_from_bytes, scalar_from_digest, scalar_to_bytes, Signature};
use super::{
    PublicKey, DIGEST_LENGTH, MAX_LOW_R_ATTEMPTS, MAX_NONCE_CANDIDATES, PRIVATE_KEY_LENGTH,
};

use alloc::string::String;
use core::fmt;

use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::AffineCoordinates;
use k256::elliptic_curve::scalar::IsHigh;
use k256::{ProjectivePoint, Scalar, U256};
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq, CtOption};
use tracing::{debug, trace};
use zeroize::Zeroizing;

/// A private key, with the serialization form of its public key
#[derive(Clone, Copy)]
pub struct PrivateKey {
    pub(crate) scalar: Scalar,
    compressed: bool,
}

impl PrivateKey {
    /// Generates a new random private key.
    ///
    /// Random 32-byte strings are drawn until one of them is a valid
    /// scalar in [1, n-1].
    pub fn generate(mut rng: impl CryptoRng + RngCore, compressed: bool) -> Self {
        let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
        loop {
            rng.fill_bytes(&mut bytes);
            if let Some(scalar) = scalar_from_bytes(&bytes) {
                return PrivateKey { scalar, compressed };
            }
        }
    }

    /// Constructs a private key from an array of bytes.
    ///
    /// The result is none if the bytes do not encode an integer in
    /// [1, n-1].
    pub fn from_bytes(bytes: &[u8; PRIVATE_KEY_LENGTH], compressed: bool) -> CtOption<Self> {
        let scalar = scalar_from_bytes(bytes);
        let is_valid = Choice::from(scalar.is_some() as u8);

        CtOption::new(
            PrivateKey {
                scalar: scalar.unwrap_or(Scalar::ONE),
                compressed,
            },
            is_valid,
        )
    }

    /// Constructs a private key from a 32-byte slice
    pub fn from_slice(bytes: &[u8], compressed: bool) -> Result<Self, Error> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(Error::InvalidKeyMaterial);
        }

        let mut array = [0u8; PRIVATE_KEY_LENGTH];
        array.copy_from_slice(bytes);

        Option::<Self>::from(PrivateKey::from_bytes(&array, compressed))
            .ok_or(Error::InvalidKeyMaterial)
    }

    /// Converts this private key to an array of bytes
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        scalar_to_bytes(&self.scalar)
    }

    /// Whether the associated public key is serialized in compressed form
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Decodes a Base58Check exported secret.
    ///
    /// The payload must be the network's secret version byte followed by
    /// either the 32-byte scalar, or the scalar and the compression marker.
    pub fn decode_secret(text: &str, params: &NetworkParams) -> Result<Self, Error> {
        let data = Zeroizing::new(decode_check(text)?);

        let compressed = match data.len() {
            len if len == 1 + PRIVATE_KEY_LENGTH => false,
            len if len == 2 + PRIVATE_KEY_LENGTH => {
                let flag = data[1 + PRIVATE_KEY_LENGTH];
                if flag != params.compression_marker {
                    debug!(flag, "rejecting secret with unknown compression marker");
                    return Err(EncodingError::InvalidCompressionFlag(flag).into());
                }
                true
            }
            len => {
                debug!(len, "rejecting secret with unexpected payload length");
                return Err(EncodingError::InvalidLength(len).into());
            }
        };

        if data[0] != params.secret_key {
            debug!(version = data[0], "rejecting secret with unexpected version");
            return Err(EncodingError::InvalidVersion(data[0]).into());
        }

        PrivateKey::from_slice(&data[1..1 + PRIVATE_KEY_LENGTH], compressed)
    }

    /// Encodes this private key as a Base58Check exported secret
    pub fn encode_secret(&self, params: &NetworkParams) -> String {
        let flag = if self.compressed {
            Some(params.compression_marker)
        } else {
            None
        };

        let bytes = Zeroizing::new(self.to_bytes());
        encode_versioned(params.secret_key, &bytes[..], flag)
    }

    /// Computes the public key associated to this private key
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_private_key(self)
    }

    /// Checks that a public key matches this private key, including its
    /// serialization form.
    pub fn verify_pubkey(&self, pkey: &PublicKey) -> bool {
        self.public_key() == *pkey
    }

    /// Computes a deterministic ECDSA signature of `digest`.
    ///
    /// Without `extra_entropy`, signing retries with increasing counters
    /// until r has its top bit clear, so that the DER encoding is at most
    /// 70 bytes. With `Some(counter)`, the counter is folded into the
    /// nonce derivation and the first resulting signature is returned
    /// as is. The returned s is always low.
    pub fn sign(
        &self,
        digest: &[u8; DIGEST_LENGTH],
        extra_entropy: Option<u32>,
    ) -> Result<Signature, Error> {
        if let Some(counter) = extra_entropy {
            let (signature, _) = self.sign_with_entropy(digest, counter_entropy(counter).as_ref())?;
            return Ok(signature);
        }

        for attempt in 0..MAX_LOW_R_ATTEMPTS {
            let (signature, _) = self.sign_with_entropy(digest, counter_entropy(attempt).as_ref())?;
            if signature.has_low_r() {
                return Ok(signature);
            }
            trace!(attempt, "signature has a high R, grinding");
        }

        debug!("no low R signature found");
        Err(Error::SigningFailure)
    }

    /// Computes a deterministic compact signature of `digest`, from which
    /// the public key of this private key can be recovered.
    ///
    /// No grinding is performed; `extra_entropy` is folded into the
    /// nonce derivation as for `sign`.
    pub fn sign_compact(
        &self,
        digest: &[u8; DIGEST_LENGTH],
        extra_entropy: Option<u32>,
    ) -> Result<CompactSignature, Error> {
        let entropy = extra_entropy.and_then(counter_entropy);
        let (signature, _) = self.sign_with_entropy(digest, entropy.as_ref())?;
        let pkey = self.public_key();

        let recovery_id = RecoveryId::all()
            .find(|id| {
                PublicKey::recover(digest, &signature, *id, self.compressed)
                    .map(|candidate| candidate == pkey)
                    .unwrap_or(false)
            })
            .ok_or(Error::SigningFailure)?;

        Ok(CompactSignature::new(&signature, recovery_id, self.compressed))
    }

    /// Computes a signature with low s, along with the recovery id of
    /// the nonce point.
    fn sign_with_entropy(
        &self,
        digest: &[u8; DIGEST_LENGTH],
        extra: Option<&[u8; EXTRA_ENTROPY_LENGTH]>,
    ) -> Result<(Signature, RecoveryId), Error> {
        let z = scalar_from_digest(digest);
        let secret = Zeroizing::new(self.to_bytes());
        let mut nonces = NonceGenerator::new(&secret, digest, extra);

        for _ in 0..MAX_NONCE_CANDIDATES {
            let candidate = Zeroizing::new(nonces.next_candidate());
            let k = match scalar_from_bytes(&candidate) {
                Some(k) => k,
                None => {
                    trace!("nonce candidate out of range");
                    continue;
                }
            };

            let r_point = (ProjectivePoint::GENERATOR * k).to_affine();
            let x = r_point.x();
            let r = <Scalar as Reduce<U256>>::reduce_bytes(&x);
            if bool::from(r.is_zero()) {
                continue;
            }

            let k_inv: Option<Scalar> = k.invert().into();
            let k_inv = match k_inv {
                Some(k_inv) => k_inv,
                None => continue,
            };

            let s = k_inv * (z + r * self.scalar);
            if bool::from(s.is_zero()) {
                continue;
            }

            // r differs from x only when x was at least n
            let x_reduced = scalar_to_bytes(&r)[..] != x[..];
            let recovery_id = RecoveryId::new(bool::from(r_point.y_is_odd()), x_reduced);

            let signature = Signature::from_scalars(r, s)?;
            if bool::from(s.is_high()) {
                let flipped = RecoveryId::new(!recovery_id.is_y_odd(), x_reduced);
                return Ok((signature.normalize_s(), flipped));
            }

            return Ok((signature, recovery_id));
        }

        debug!("nonce candidates exhausted");
        Err(Error::SigningFailure)
    }
}

impl ConstantTimeEq for PrivateKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.scalar.ct_eq(&other.scalar) & Choice::from((self.compressed == other.compressed) as u8)
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("scalar", &"..")
            .field("compressed", &self.compressed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashes::hash256;
    use rand_core::OsRng;

    const SECRET: &str = "6z8tDFZ9cJy8CWVAZiHawKM7DbhDdCpnQEyLDNUwMz4LBvqDSzb";
    const SECRET_COMPRESSED: &str = "TRBo35EtzrJimo9KDPECnjykSc8WioBuPafdobpJwcqhgpdQaQCf";

    #[test]
    fn test_secret_encoding() {
        let params = NetworkParams::MAINNET;

        let key = PrivateKey::decode_secret(SECRET, &params).unwrap();
        assert!(!key.is_compressed());
        assert_eq!(
            hex::encode(key.to_bytes()),
            "9471bc752344203bfc7150ef38d1c80549ddd5c0f2c9381455dc7f2f6337a41d"
        );
        assert_eq!(key.encode_secret(&params), SECRET);

        let key_c = PrivateKey::decode_secret(SECRET_COMPRESSED, &params).unwrap();
        assert!(key_c.is_compressed());
        assert_eq!(key_c.to_bytes(), key.to_bytes());
        assert_ne!(key_c, key);
        assert_eq!(key_c.encode_secret(&params), SECRET_COMPRESSED);

        // Right payload, wrong network
        assert_eq!(
            PrivateKey::decode_secret(SECRET, &NetworkParams::TESTNET),
            Err(Error::Encoding(EncodingError::InvalidVersion(178)))
        );
    }

    #[test]
    fn test_invalid_secrets() {
        let params = NetworkParams::MAINNET;

        // Out of range scalars
        let zero = encode_versioned(params.secret_key, &[0u8; 32], None);
        assert_eq!(
            PrivateKey::decode_secret(&zero, &params),
            Err(Error::InvalidKeyMaterial)
        );
        let max = encode_versioned(params.secret_key, &[0xffu8; 32], None);
        assert_eq!(
            PrivateKey::decode_secret(&max, &params),
            Err(Error::InvalidKeyMaterial)
        );

        // Unknown compression marker
        let flagged = encode_versioned(params.secret_key, &[1u8; 32], Some(0x02));
        assert_eq!(
            PrivateKey::decode_secret(&flagged, &params),
            Err(Error::Encoding(EncodingError::InvalidCompressionFlag(0x02)))
        );

        // Wrong length
        let short = encode_versioned(params.secret_key, &[1u8; 31], None);
        assert_eq!(
            PrivateKey::decode_secret(&short, &params),
            Err(Error::Encoding(EncodingError::InvalidLength(32)))
        );
    }

    #[test]
    fn test_from_bytes() {
        assert!(bool::from(PrivateKey::from_bytes(&[0u8; 32], true).is_none()));
        assert!(bool::from(PrivateKey::from_bytes(&[0xffu8; 32], true).is_none()));
        assert!(PrivateKey::from_slice(&[1u8; 31], true).is_err());

        let mut rng = OsRng;
        for _ in 0..100 {
            let key = PrivateKey::generate(&mut rng, false);
            let bytes = key.to_bytes();

            assert_eq!(key, PrivateKey::from_bytes(&bytes, false).unwrap());
            assert_eq!(key, PrivateKey::from_slice(&bytes, false).unwrap());
        }
    }

    #[test]
    fn test_verify_pubkey() {
        let mut rng = OsRng;
        let key = PrivateKey::generate(&mut rng, true);
        let other = PrivateKey::generate(&mut rng, true);

        assert!(key.verify_pubkey(&key.public_key()));
        assert!(!key.verify_pubkey(&key.public_key().to_uncompressed()));
        assert!(!key.verify_pubkey(&other.public_key()));
    }

    #[test]
    fn test_signature() {
        let key = PrivateKey::decode_secret(SECRET, &NetworkParams::MAINNET).unwrap();
        let digest = hash256(b"Very deterministic message");

        // The first nonce gives a high R, grinding picks the next one
        let (first, _) = key.sign_with_entropy(&digest, None).unwrap();
        assert!(!first.has_low_r());

        let signature = key.sign(&digest, None).unwrap();
        assert!(signature.has_low_r());
        assert!(signature.is_low_s());
        assert_eq!(signature, key.sign(&digest, Some(1)).unwrap());
        assert_eq!(signature, key.sign(&digest, None).unwrap());

        // Counter zero means no extra input
        assert_eq!(first, key.sign(&digest, Some(0)).unwrap());
    }

    #[test]
    fn test_recovery_id_matches_search() {
        let mut rng = OsRng;
        let mut digest = [0u8; 32];

        for _ in 0..16 {
            rng.fill_bytes(&mut digest);
            let key = PrivateKey::generate(&mut rng, true);

            let (signature, recovery_id) = key.sign_with_entropy(&digest, None).unwrap();
            let compact = key.sign_compact(&digest, None).unwrap();

            assert_eq!(compact.signature().unwrap(), signature);
            assert_eq!(compact.recovery_id().unwrap(), (recovery_id, true));
        }
    }

    #[test]
    fn test_debug_hides_scalar() {
        let key = PrivateKey::decode_secret(SECRET, &NetworkParams::MAINNET).unwrap();
        let debug = format!("{:?}", key);

        assert!(!debug.contains("9471bc75"));
        assert!(debug.contains("compressed: false"));
    }
}
