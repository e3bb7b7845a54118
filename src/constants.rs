// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module defines all constants used in this crate.

/// Scalar element length in bytes (serialized form)
pub const SCALAR_LENGTH: usize = 32;

/// Private key length in bytes (serialized form)
pub const PRIVATE_KEY_LENGTH: usize = SCALAR_LENGTH;

/// Compressed public key length in bytes (parity prefix and x coordinate)
pub const COMPRESSED_PUBLIC_KEY_LENGTH: usize = SCALAR_LENGTH + 1;

/// Uncompressed public key length in bytes (0x04 prefix, x and y coordinates)
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 2 * SCALAR_LENGTH + 1;

/// Digest length in bytes of the messages being signed
pub const DIGEST_LENGTH: usize = 32;

/// Identity hash length in bytes
pub const KEY_ID_LENGTH: usize = 20;

/// Maximum length in bytes of a strict DER signature
pub const MAX_DER_SIGNATURE_LENGTH: usize = 72;

/// Minimum length in bytes of a strict DER signature
pub const MIN_DER_SIGNATURE_LENGTH: usize = 8;

/// Compact signature length in bytes (header, r and s)
pub const COMPACT_SIGNATURE_LENGTH: usize = 1 + 2 * SCALAR_LENGTH;

/// Base58Check checksum length in bytes
pub const CHECKSUM_LENGTH: usize = 4;

/// Offset added to the recovery id in the compact signature header.
pub const COMPACT_HEADER_BASE: u8 = 27;

/// Extra offset in the compact signature header marking a compressed key.
pub const COMPACT_HEADER_COMPRESSED_FLAG: u8 = 4;

/// Maximum number of signing attempts while grinding for a low R value.
///
/// Each attempt independently yields a low R with probability close to
/// one half, so running out of attempts is practically impossible.
pub const MAX_LOW_R_ATTEMPTS: u32 = 256;

/// Maximum number of nonce candidates drawn for a single signature.
pub const MAX_NONCE_CANDIDATES: usize = 64;
