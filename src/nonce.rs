// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides the deterministic nonce generation of RFC 6979,
//! instantiated with HMAC-SHA256.
//!
//! The generator is seeded with the secret scalar, the message digest and
//! optionally 32 bytes of extra input, in that order, and yields an
//! unbounded stream of 32-byte candidates. Callers are responsible for
//! discarding candidates that are not valid scalars.

use super::{DIGEST_LENGTH, PRIVATE_KEY_LENGTH};

use hmac::digest::{Key, KeyInit};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of the optional extra input folded into the seed.
pub(crate) const EXTRA_ENTROPY_LENGTH: usize = 32;

/// Encodes a signing counter as the 32-byte extra input of the generator.
///
/// The counter is written in little-endian in the first four bytes, the
/// rest is left zeroed. A zero counter means no extra input at all.
pub(crate) fn counter_entropy(counter: u32) -> Option<[u8; EXTRA_ENTROPY_LENGTH]> {
    if counter == 0 {
        return None;
    }

    let mut data = [0u8; EXTRA_ENTROPY_LENGTH];
    data[0..4].copy_from_slice(&counter.to_le_bytes());

    Some(data)
}

/// HMAC-DRBG state producing nonce candidates, wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct NonceGenerator {
    k: [u8; 32],
    v: [u8; 32],
    retry: bool,
}

impl NonceGenerator {
    /// Seeds a new generator.
    pub(crate) fn new(
        secret: &[u8; PRIVATE_KEY_LENGTH],
        digest: &[u8; DIGEST_LENGTH],
        extra: Option<&[u8; EXTRA_ENTROPY_LENGTH]>,
    ) -> Self {
        let mut k = [0u8; 32];
        let mut v = [1u8; 32];
        let extra: &[u8] = match extra {
            Some(data) => data,
            None => &[],
        };

        k = hmac(&k, &[&v, &[0x00], secret, digest, extra]);
        v = hmac(&k, &[&v]);
        k = hmac(&k, &[&v, &[0x01], secret, digest, extra]);
        v = hmac(&k, &[&v]);

        NonceGenerator { k, v, retry: false }
    }

    /// Produces the next nonce candidate.
    pub(crate) fn next_candidate(&mut self) -> [u8; 32] {
        if self.retry {
            self.k = hmac(&self.k, &[&self.v, &[0x00]]);
            self.v = hmac(&self.k, &[&self.v]);
        }

        self.v = hmac(&self.k, &[&self.v]);
        self.retry = true;

        self.v
    }
}

fn hmac(key: &[u8; 32], parts: &[&[u8]]) -> [u8; 32] {
    // Keys shorter than the block are zero padded by HMAC itself
    let mut block = Key::<HmacSha256>::default();
    block[..key.len()].copy_from_slice(key);

    let mut mac = <HmacSha256 as KeyInit>::new(&block);
    block.as_mut_slice().zeroize();
    for part in parts {
        mac.update(part);
    }

    let result = mac.finalize();
    let bytes = result.into_bytes();

    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    out
}
