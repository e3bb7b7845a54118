//! This module provides the digest functions used for message
//! hashing, Base58Check checksums and public key identities.

use super::{DIGEST_LENGTH, KEY_ID_LENGTH};

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Computes the double SHA-256 digest of `data`.
pub fn hash256(data: &[u8]) -> [u8; DIGEST_LENGTH] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);

    let mut out = [0u8; DIGEST_LENGTH];
    out.copy_from_slice(&second);
    out
}

/// Computes RIPEMD-160 over the SHA-256 digest of `data`.
pub fn hash160(data: &[u8]) -> [u8; KEY_ID_LENGTH] {
    let inner = Sha256::digest(data);
    let outer = Ripemd160::digest(inner);

    let mut out = [0u8; KEY_ID_LENGTH];
    out.copy_from_slice(&outer);
    out
}
