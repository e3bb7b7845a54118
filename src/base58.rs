// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides the Base58Check codec: a payload followed by
//! the first four bytes of its double SHA-256 digest, rendered with the
//! Base58 alphabet.

use super::error::{EncodingError, Error};
use super::hashes::hash256;
use super::CHECKSUM_LENGTH;

use alloc::string::String;
use alloc::vec::Vec;
use tracing::debug;

/// Encodes `payload` with a trailing checksum in Base58.
pub fn encode_check(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LENGTH);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));

    bs58::encode(data).into_string()
}

/// Decodes a Base58Check string, returning the payload without its checksum.
pub fn decode_check(text: &str) -> Result<Vec<u8>, Error> {
    let mut data = bs58::decode(text)
        .into_vec()
        .map_err(|_| EncodingError::InvalidBase58)?;

    if data.len() < CHECKSUM_LENGTH {
        debug!(len = data.len(), "Base58Check payload too short");
        return Err(EncodingError::InvalidLength(data.len()).into());
    }

    let split = data.len() - CHECKSUM_LENGTH;
    if checksum(&data[..split]) != data[split..] {
        debug!("Base58Check checksum mismatch");
        return Err(EncodingError::ChecksumMismatch.into());
    }

    data.truncate(split);
    Ok(data)
}

/// Encodes a version byte, a body and an optional trailing flag byte.
pub(crate) fn encode_versioned(version: u8, body: &[u8], flag: Option<u8>) -> String {
    let mut payload = Vec::with_capacity(body.len() + 2);
    payload.push(version);
    payload.extend_from_slice(body);
    if let Some(flag) = flag {
        payload.push(flag);
    }

    encode_check(&payload)
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = hash256(payload);

    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&digest[..CHECKSUM_LENGTH]);
    out
}
