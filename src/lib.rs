// Copyright (c) 2021-2022 Toposware, Inc.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This crate provides secp256k1 key management for a Bitcoin-derived
//! node: deterministic ECDSA signing with low-R grinding, strict DER
//! verification, public key recovery from compact signatures, and the
//! Base58Check encodings of exported secrets and addresses.

//! # Usage
//!
//! To generate a new random private key, whose public key is serialized
//! in compressed form, do as the following:
//!
//! ```rust
//! use ecdsa_keys::PrivateKey;
//! use rand_core::OsRng;
//!
//! let mut rng = OsRng;
//! let skey = PrivateKey::generate(&mut rng, true);
//! let pkey = skey.public_key();
//!
//! assert!(skey.verify_pubkey(&pkey));
//! ```
//!
//! To sign a 32-byte `digest` and verify the resulting DER signature:
//!
//! ```rust
//! use ecdsa_keys::{hash256, PrivateKey};
//! use rand_core::OsRng;
//!
//! let skey = PrivateKey::generate(OsRng, true);
//! let digest = hash256(b"A message to be signed");
//!
//! let signature = skey.sign(&digest, None).unwrap();
//! let der = signature.to_der();
//!
//! assert!(der.len() <= 70);
//! assert!(skey.public_key().verify(&digest, &der));
//! ```
//!
//! Signing is deterministic: the same key and digest always give the
//! same signature. Compact signatures allow recovering the signer's
//! public key:
//!
//! ```rust
//! use ecdsa_keys::{hash256, PrivateKey, PublicKey};
//! use rand_core::OsRng;
//!
//! let skey = PrivateKey::generate(OsRng, false);
//! let digest = hash256(b"A message to be signed");
//!
//! let compact = skey.sign_compact(&digest, None).unwrap();
//! let recovered = PublicKey::recover_compact(&digest, compact.as_ref()).unwrap();
//!
//! assert_eq!(recovered, skey.public_key());
//! ```
//!
//! Exported secrets and addresses are Base58Check strings whose version
//! bytes are provided by `NetworkParams`:
//!
//! ```rust
//! use ecdsa_keys::{Address, NetworkParams, PrivateKey};
//!
//! let params = NetworkParams::MAINNET;
//! let skey = PrivateKey::decode_secret(
//!     "TRBo35EtzrJimo9KDPECnjykSc8WioBuPafdobpJwcqhgpdQaQCf",
//!     &params,
//! )
//! .unwrap();
//!
//! let address = Address::from_public_key(&skey.public_key(), &params);
//! assert_eq!(address.encode(), "MBeR1CLYqGPoonVC18AAywEuho3MeGFSwP");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![no_std]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
#[macro_use]
extern crate std;

mod constants;
pub use constants::*;

mod error;
pub use error::{EncodingError, Error};

/// The digest functions.
mod hashes;
pub use hashes::{hash160, hash256};

/// The deterministic nonce module.
mod nonce;

/// The Base58Check codec.
pub mod base58;

/// The network parameters module.
mod network;
pub use network::NetworkParams;

/// The private key module.
mod private;

/// The public key module.
mod public;

/// The key pair module.
mod keypair;

/// The DER signature module.
mod signature;

/// The compact signature module.
mod compact;

/// The address module.
mod address;

pub use private::PrivateKey;
pub use public::{KeyId, PublicKey};

pub use keypair::KeyPair;

pub use signature::{DerSignature, Signature};

pub use compact::{CompactSignature, RecoveryId};

pub use address::Address;
