//! This module provides the `NetworkParams` struct holding the
//! network-specific version bytes of the text encodings.

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Version bytes and markers used by the Base58Check text formats.
///
/// These values belong to the surrounding node configuration and are
/// passed explicitly to every encoding and decoding routine.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serialize", derive(Deserialize, Serialize))]
pub struct NetworkParams {
    /// Version byte prefixed to pay-to-pubkey-hash addresses
    pub pubkey_address: u8,
    /// Version byte prefixed to exported secret keys
    pub secret_key: u8,
    /// Trailing byte marking an exported secret as compressed
    pub compression_marker: u8,
}

impl NetworkParams {
    /// Main network parameters
    pub const MAINNET: Self = NetworkParams {
        pubkey_address: 50,
        secret_key: 178,
        compression_marker: 0x01,
    };

    /// Test network parameters
    pub const TESTNET: Self = NetworkParams {
        pubkey_address: 111,
        secret_key: 239,
        compression_marker: 0x01,
    };
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self::MAINNET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        assert_eq!(NetworkParams::default(), NetworkParams::MAINNET);
        assert_ne!(NetworkParams::MAINNET, NetworkParams::TESTNET);
    }

    #[test]
    #[cfg(feature = "serialize")]
    fn test_serde() {
        let params = NetworkParams::TESTNET;
        let encoded = bincode::serialize(&params).unwrap();
        assert_eq!(encoded, [111, 239, 1]);

        let parsed: NetworkParams = bincode::deserialize(&encoded).unwrap();
        assert_eq!(parsed, params);
    }
}
