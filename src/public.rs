//! This module provides a `PublicKey` wrapping struct around an
//! `AffinePoint` together with its SEC1 serialization.

use super::compact::{CompactSignature, RecoveryId};
use super::error::{EncodingError, Error};
use super::hashes::hash160;
use super::signature::{scalar_from_digest, Signature};
use super::{
    PrivateKey, COMPRESSED_PUBLIC_KEY_LENGTH, DIGEST_LENGTH, KEY_ID_LENGTH,
    UNCOMPRESSED_PUBLIC_KEY_LENGTH,
};

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use k256::elliptic_curve::bigint::{Encoding, Limb};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::{AffineCoordinates, DecompressPoint};
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::Curve;
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar, Secp256k1, U256};
use subtle::Choice;
use tracing::debug;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// The 20-byte identity hash of a serialized public key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct KeyId(pub [u8; KEY_ID_LENGTH]);

impl KeyId {
    /// Returns the raw identity bytes
    pub fn as_bytes(&self) -> &[u8; KEY_ID_LENGTH] {
        &self.0
    }
}

/// A public key, either in compressed or uncompressed form.
///
/// Two public keys are equal only if their serialized forms are equal:
/// the compressed and uncompressed encodings of a same point differ.
#[derive(Clone, Copy)]
pub struct PublicKey {
    point: AffinePoint,
    bytes: [u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH],
    len: usize,
}

impl PublicKey {
    /// Encodes a non-identity point in the requested form.
    fn from_affine(point: AffinePoint, compressed: bool) -> Self {
        let encoded = point.to_encoded_point(compressed);
        let len = encoded.len();

        let mut bytes = [0u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH];
        bytes[..len].copy_from_slice(encoded.as_bytes());

        PublicKey { point, bytes, len }
    }

    /// Computes a public key from a provided private key
    pub fn from_private_key(sk: &PrivateKey) -> Self {
        let point = ProjectivePoint::GENERATOR * sk.scalar;

        PublicKey::from_affine(point.to_affine(), sk.is_compressed())
    }

    /// Parses a SEC1 encoded public key.
    ///
    /// Accepts 33 bytes with a 0x02 or 0x03 prefix, or 65 bytes with a
    /// 0x04 prefix. The point must lie on the curve.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let expected = match bytes.first() {
            Some(0x02) | Some(0x03) => COMPRESSED_PUBLIC_KEY_LENGTH,
            Some(0x04) => UNCOMPRESSED_PUBLIC_KEY_LENGTH,
            _ => return Err(Error::InvalidKeyMaterial),
        };
        if bytes.len() != expected {
            return Err(Error::InvalidKeyMaterial);
        }

        let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| Error::InvalidKeyMaterial)?;
        let point: Option<AffinePoint> = AffinePoint::from_encoded_point(&encoded).into();
        let point = point.ok_or(Error::InvalidKeyMaterial)?;

        let mut array = [0u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH];
        array[..expected].copy_from_slice(bytes);

        Ok(PublicKey {
            point,
            bytes: array,
            len: expected,
        })
    }

    /// Returns the serialized form of this public key
    pub fn serialize(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Returns the serialized form of this public key
    pub fn as_bytes(&self) -> &[u8] {
        self.serialize()
    }

    /// Whether this key is serialized in compressed form
    pub fn is_compressed(&self) -> bool {
        self.len == COMPRESSED_PUBLIC_KEY_LENGTH
    }

    /// Returns the same point in compressed form
    pub fn to_compressed(&self) -> Self {
        PublicKey::from_affine(self.point, true)
    }

    /// Returns the same point in uncompressed form
    pub fn to_uncompressed(&self) -> Self {
        PublicKey::from_affine(self.point, false)
    }

    /// Computes the identity hash of the serialized form of this key
    pub fn id(&self) -> KeyId {
        KeyId(hash160(self.serialize()))
    }

    /// Verifies a DER encoded signature of `digest` against this public key.
    ///
    /// Malformed encodings, high s values and signatures that do not
    /// verify all yield `false`.
    pub fn verify(&self, digest: &[u8; DIGEST_LENGTH], der: &[u8]) -> bool {
        Signature::from_der(der)
            .and_then(|signature| self.verify_signature(&signature, digest))
            .is_ok()
    }

    /// Verifies a signature against a digest and this public key
    pub fn verify_signature(
        &self,
        signature: &Signature,
        digest: &[u8; DIGEST_LENGTH],
    ) -> Result<(), Error> {
        if !signature.is_low_s() {
            return Err(EncodingError::NonCanonicalSignature.into());
        }

        let s_inv: Option<Scalar> = signature.s.invert().into();
        let s_inv = s_inv.ok_or(Error::InvalidSignature)?;

        let z = scalar_from_digest(digest);
        let u1 = z * s_inv;
        let u2 = signature.r * s_inv;

        let r_point = ProjectivePoint::GENERATOR * u1 + ProjectivePoint::from(self.point) * u2;
        if r_point == ProjectivePoint::IDENTITY {
            return Err(Error::InvalidSignature);
        }

        let x = <Scalar as Reduce<U256>>::reduce_bytes(&r_point.to_affine().x());
        if x == signature.r {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }

    /// Recovers the public key that produced a 65-byte compact signature.
    ///
    /// The serialized form of the result follows the compressed flag
    /// encoded in the signature header.
    pub fn recover_compact(
        digest: &[u8; DIGEST_LENGTH],
        compact_signature: &[u8],
    ) -> Result<Self, Error> {
        let compact =
            CompactSignature::from_slice(compact_signature).ok_or(Error::RecoveryFailure)?;

        PublicKey::recover_from_compact(digest, &compact)
    }

    /// Recovers the public key that produced a compact signature
    pub fn recover_from_compact(
        digest: &[u8; DIGEST_LENGTH],
        compact: &CompactSignature,
    ) -> Result<Self, Error> {
        let (recovery_id, compressed) = compact.recovery_id()?;
        let signature = compact.signature()?;

        PublicKey::recover(digest, &signature, recovery_id, compressed)
    }

    /// Recovers a public key from a signature and an explicit recovery id
    pub fn recover(
        digest: &[u8; DIGEST_LENGTH],
        signature: &Signature,
        recovery_id: RecoveryId,
        compressed: bool,
    ) -> Result<Self, Error> {
        let r_bytes = signature.r_bytes();
        let x_bytes = if recovery_id.is_x_reduced() {
            let (x, carry) = U256::from_be_slice(&r_bytes).adc(&Secp256k1::ORDER, Limb::ZERO);
            if carry.0 != 0 {
                debug!("recovered x coordinate overflows");
                return Err(Error::RecoveryFailure);
            }
            x.to_be_bytes()
        } else {
            r_bytes
        };

        let r_point: Option<AffinePoint> = AffinePoint::decompress(
            &FieldBytes::from(x_bytes),
            Choice::from(recovery_id.is_y_odd() as u8),
        )
        .into();
        let r_point = r_point.ok_or_else(|| {
            debug!(
                recovery_id = recovery_id.to_u8(),
                "no curve point for the signature's r"
            );
            Error::RecoveryFailure
        })?;

        let r_inv: Option<Scalar> = signature.r.invert().into();
        let r_inv = r_inv.ok_or(Error::RecoveryFailure)?;

        let z = scalar_from_digest(digest);
        let u1 = -(z * r_inv);
        let u2 = signature.s * r_inv;

        let point = ProjectivePoint::GENERATOR * u1 + ProjectivePoint::from(r_point) * u2;
        if point == ProjectivePoint::IDENTITY {
            debug!("recovered point is the identity");
            return Err(Error::RecoveryFailure);
        }

        Ok(PublicKey::from_affine(point.to_affine(), compressed))
    }
}

impl From<&PrivateKey> for PublicKey {
    fn from(sk: &PrivateKey) -> Self {
        PublicKey::from_private_key(sk)
    }
}

impl From<PrivateKey> for PublicKey {
    fn from(sk: PrivateKey) -> Self {
        PublicKey::from_private_key(&sk)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        self.serialize()
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.serialize() == other.serialize()
    }
}

impl Eq for PublicKey {}

impl PartialOrd for PublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PublicKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.serialize().cmp(other.serialize())
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serialize().hash(state);
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey(")?;
        for byte in self.serialize() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

#[cfg(feature = "serialize")]
impl Serialize for PublicKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.as_bytes())
    }
}

#[cfg(feature = "serialize")]
impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::{Error as DeError, SeqAccess, Visitor};

        struct PublicKeyVisitor;

        impl<'de> Visitor<'de> for PublicKeyVisitor {
            type Value = PublicKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a 33 or 65 byte SEC1 public key")
            }

            fn visit_bytes<E: DeError>(self, v: &[u8]) -> Result<PublicKey, E> {
                PublicKey::from_slice(v).map_err(E::custom)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<PublicKey, A::Error> {
                let mut bytes = [0u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH];
                let mut len = 0;
                while let Some(byte) = seq.next_element::<u8>()? {
                    if len == UNCOMPRESSED_PUBLIC_KEY_LENGTH {
                        return Err(A::Error::invalid_length(len + 1, &self));
                    }
                    bytes[len] = byte;
                    len += 1;
                }

                PublicKey::from_slice(&bytes[..len]).map_err(A::Error::custom)
            }
        }

        deserializer.deserialize_bytes(PublicKeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    const GENERATOR_COMPRESSED: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const GENERATOR_UNCOMPRESSED: &str = "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

    fn key_one(compressed: bool) -> PrivateKey {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        PrivateKey::from_bytes(&bytes, compressed).unwrap()
    }

    #[test]
    fn test_encoding() {
        let compressed = PublicKey::from_private_key(&key_one(true));
        let uncompressed = PublicKey::from_private_key(&key_one(false));

        assert_eq!(hex::encode(compressed.serialize()), GENERATOR_COMPRESSED);
        assert_eq!(hex::encode(uncompressed.serialize()), GENERATOR_UNCOMPRESSED);
        assert!(compressed.is_compressed());
        assert!(!uncompressed.is_compressed());

        assert_ne!(compressed, uncompressed);
        assert_eq!(compressed.to_uncompressed(), uncompressed);
        assert_eq!(uncompressed.to_compressed(), compressed);

        let parsed = PublicKey::from_slice(&hex::decode(GENERATOR_COMPRESSED).unwrap()).unwrap();
        assert_eq!(parsed, compressed);
        let parsed =
            PublicKey::from_slice(&hex::decode(GENERATOR_UNCOMPRESSED).unwrap()).unwrap();
        assert_eq!(parsed, uncompressed);

        // Test random keys encoding
        let mut rng = OsRng;

        for _ in 0..100 {
            let key = PrivateKey::generate(&mut rng, true);
            let pkey = key.public_key();

            assert_eq!(pkey, PublicKey::from_slice(pkey.serialize()).unwrap());
        }
    }

    #[test]
    fn test_invalid_encodings() {
        let compressed = hex::decode(GENERATOR_COMPRESSED).unwrap();
        let uncompressed = hex::decode(GENERATOR_UNCOMPRESSED).unwrap();

        assert!(PublicKey::from_slice(&[]).is_err());
        assert!(PublicKey::from_slice(&compressed[..32]).is_err());
        assert!(PublicKey::from_slice(&uncompressed[..33]).is_err());

        // Hybrid encoding
        let mut bytes = uncompressed.clone();
        bytes[0] = 0x06;
        assert!(PublicKey::from_slice(&bytes).is_err());

        // Point off the curve
        let mut bytes = uncompressed.clone();
        bytes[64] ^= 1;
        assert_eq!(PublicKey::from_slice(&bytes), Err(Error::InvalidKeyMaterial));

        // x coordinate without a matching y (x = 5 is not on secp256k1)
        let mut bytes = [0u8; 33];
        bytes[0] = 0x02;
        bytes[32] = 5;
        assert!(PublicKey::from_slice(&bytes).is_err());
    }

    #[test]
    fn test_id() {
        let compressed = PublicKey::from_private_key(&key_one(true));
        let uncompressed = PublicKey::from_private_key(&key_one(false));

        assert_eq!(
            hex::encode(compressed.id().as_bytes()),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
        assert_eq!(
            hex::encode(uncompressed.id().as_bytes()),
            "91b24bf9f5288532960ac687abb035127b1d28a5"
        );
    }

    #[test]
    fn test_signature() {
        let mut rng = OsRng;
        let digest = [0x42u8; 32];

        let skey = PrivateKey::generate(&mut rng, true);
        let pkey = PublicKey::from_private_key(&skey);

        let signature = skey.sign(&digest, None).unwrap();
        assert!(pkey.verify_signature(&signature, &digest).is_ok());
        assert!(pkey.verify(&digest, &signature.to_der()));

        let mut wrong_digest = digest;
        wrong_digest[0] ^= 1;
        assert_eq!(
            pkey.verify_signature(&signature, &wrong_digest),
            Err(Error::InvalidSignature)
        );

        // High s is rejected even though the equation holds
        let high = Signature {
            r: signature.r,
            s: -signature.s,
        };
        assert_eq!(
            pkey.verify_signature(&high, &digest),
            Err(Error::Encoding(EncodingError::NonCanonicalSignature))
        );
        assert!(!pkey.verify(&digest, &high.to_der()));
        assert!(pkey.verify_signature(&high.normalize_s(), &digest).is_ok());
    }

    #[test]
    fn test_recovery() {
        let mut rng = OsRng;
        let digest = [0x17u8; 32];

        for compressed in [false, true] {
            let skey = PrivateKey::generate(&mut rng, compressed);
            let pkey = skey.public_key();

            let compact = skey.sign_compact(&digest, None).unwrap();
            let recovered = PublicKey::recover_compact(&digest, compact.as_ref()).unwrap();
            assert_eq!(recovered, pkey);
            assert_eq!(recovered.is_compressed(), compressed);

            // Flipping the compressed flag changes only the serialization
            let mut bytes = compact.to_bytes();
            bytes[0] ^= 4;
            let flipped = PublicKey::recover_compact(&digest, &bytes).unwrap();
            assert_ne!(flipped, pkey);
            assert_eq!(flipped.to_compressed(), pkey.to_compressed());

            // Wrong digest recovers some other key, or nothing
            let mut wrong_digest = digest;
            wrong_digest[31] ^= 1;
            if let Ok(other) = PublicKey::recover_compact(&wrong_digest, compact.as_ref()) {
                assert_ne!(other, pkey);
            }
        }

        assert_eq!(
            PublicKey::recover_compact(&digest, &[0u8; 64]),
            Err(Error::RecoveryFailure)
        );

        let mut bytes = [0u8; 65];
        bytes[0] = 27;
        assert_eq!(
            PublicKey::recover_compact(&digest, &bytes),
            Err(Error::RecoveryFailure)
        );
    }

    #[test]
    #[cfg(feature = "serialize")]
    fn test_serde() {
        let mut rng = OsRng;

        for compressed in [false, true] {
            let pkey = PrivateKey::generate(&mut rng, compressed).public_key();

            let encoded = bincode::serialize(&pkey).unwrap();
            // Length prefix followed by the SEC1 bytes
            assert_eq!(encoded.len(), 8 + pkey.serialize().len());

            let parsed: PublicKey = bincode::deserialize(&encoded).unwrap();
            assert_eq!(parsed, pkey);
        }

        let id = PrivateKey::generate(&mut rng, true).public_key().id();
        let encoded = bincode::serialize(&id).unwrap();
        assert_eq!(encoded.len(), KEY_ID_LENGTH);
        assert_eq!(bincode::deserialize::<KeyId>(&encoded).unwrap(), id);
    }
}
