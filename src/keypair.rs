//! This module provides a `KeyPair` struct
//! combining a `PrivateKey` and an associated `PublicKey`.

use super::address::Address;
use super::compact::CompactSignature;
use super::error::Error;
use super::network::NetworkParams;
use super::{PrivateKey, PublicKey, Signature, DIGEST_LENGTH};

use rand_core::{CryptoRng, RngCore};

/// A KeyPair
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyPair {
    /// A private key
    pub private_key: PrivateKey,
    /// A public key
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random key pair
    pub fn new(mut rng: impl CryptoRng + RngCore, compressed: bool) -> Self {
        let private_key = PrivateKey::generate(&mut rng, compressed);

        KeyPair::from_private_key(private_key)
    }

    /// Generates a new key pair from a provided private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();

        KeyPair {
            private_key,
            public_key,
        }
    }

    /// Decodes a key pair from an exported secret
    pub fn decode_secret(text: &str, params: &NetworkParams) -> Result<Self, Error> {
        PrivateKey::decode_secret(text, params).map(KeyPair::from_private_key)
    }

    /// Computes a deterministic low-R ECDSA signature
    pub fn sign(&self, digest: &[u8; DIGEST_LENGTH]) -> Result<Signature, Error> {
        self.private_key.sign(digest, None)
    }

    /// Computes a deterministic compact signature
    pub fn sign_compact(&self, digest: &[u8; DIGEST_LENGTH]) -> Result<CompactSignature, Error> {
        self.private_key.sign_compact(digest, None)
    }

    /// Verifies a signature against a digest and this key pair
    pub fn verify_signature(
        &self,
        signature: &Signature,
        digest: &[u8; DIGEST_LENGTH],
    ) -> Result<(), Error> {
        self.public_key.verify_signature(signature, digest)
    }

    /// The address of this key pair's public key on the given network
    pub fn address(&self, params: &NetworkParams) -> Address {
        Address::from_public_key(&self.public_key, params)
    }
}

impl From<PrivateKey> for KeyPair {
    fn from(private_key: PrivateKey) -> Self {
        KeyPair::from_private_key(private_key)
    }
}

impl From<&PrivateKey> for KeyPair {
    fn from(private_key: &PrivateKey) -> Self {
        KeyPair::from_private_key(*private_key)
    }
}

impl From<KeyPair> for PrivateKey {
    fn from(key_pair: KeyPair) -> Self {
        key_pair.private_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    #[test]
    fn test_signature() {
        let mut rng = OsRng;
        let mut digest = [0u8; 32];
        rng.fill_bytes(&mut digest);

        let key_pair = KeyPair::new(&mut rng, true);

        let signature = key_pair.sign(&digest).unwrap();
        assert!(key_pair.verify_signature(&signature, &digest).is_ok());

        let compact = key_pair.sign_compact(&digest).unwrap();
        assert_eq!(
            PublicKey::recover_from_compact(&digest, &compact).unwrap(),
            key_pair.public_key
        );
    }

    #[test]
    fn test_conversions() {
        let mut rng = OsRng;
        let params = NetworkParams::MAINNET;

        let private_key = PrivateKey::generate(&mut rng, false);
        let key_pair = KeyPair::from(&private_key);
        assert_eq!(key_pair.public_key, private_key.public_key());
        assert_eq!(PrivateKey::from(key_pair), private_key);

        let decoded = KeyPair::decode_secret(&private_key.encode_secret(&params), &params).unwrap();
        assert_eq!(decoded, key_pair);
        assert_eq!(
            decoded.address(&params).id(),
            private_key.public_key().id()
        );
    }
}
