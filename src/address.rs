//! This module provides pay-to-pubkey-hash addresses: a network
//! version byte and a public key identity hash, in Base58Check.

use super::base58::{decode_check, encode_versioned};
use super::error::{EncodingError, Error};
use super::network::NetworkParams;
use super::{KeyId, PublicKey, KEY_ID_LENGTH};

use alloc::string::String;
use core::fmt::{self, Display, Formatter};
use tracing::debug;

/// An address paying to the identity hash of a public key
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Address {
    version: u8,
    id: KeyId,
}

impl Address {
    /// Builds the address of a key identity on the given network
    pub fn new(id: KeyId, params: &NetworkParams) -> Self {
        Address {
            version: params.pubkey_address,
            id,
        }
    }

    /// Builds the address of a public key on the given network.
    ///
    /// Compressed and uncompressed forms of a same key yield different
    /// addresses.
    pub fn from_public_key(pkey: &PublicKey, params: &NetworkParams) -> Self {
        Address::new(pkey.id(), params)
    }

    /// The identity hash this address pays to
    pub fn id(&self) -> KeyId {
        self.id
    }

    /// The version byte of this address
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Encodes this address in Base58Check
    pub fn encode(&self) -> String {
        encode_versioned(self.version, self.id.as_bytes(), None)
    }

    /// Decodes a Base58Check address for the given network
    pub fn decode(text: &str, params: &NetworkParams) -> Result<Self, Error> {
        let data = decode_check(text)?;
        if data.len() != 1 + KEY_ID_LENGTH {
            debug!(len = data.len(), "rejecting address with unexpected length");
            return Err(EncodingError::InvalidLength(data.len()).into());
        }
        if data[0] != params.pubkey_address {
            debug!(version = data[0], "rejecting address with unexpected version");
            return Err(EncodingError::InvalidVersion(data[0]).into());
        }

        let mut id = [0u8; KEY_ID_LENGTH];
        id.copy_from_slice(&data[1..]);

        Ok(Address {
            version: data[0],
            id: KeyId(id),
        })
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
