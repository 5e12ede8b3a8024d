use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BtcError;

/// Base58 version byte for mainnet P2PKH addresses ("1...").
pub const MAINNET_P2PKH_VERSION: u8 = 0x00;

/// Base58 version byte for testnet and signet P2PKH addresses ("m..." / "n...").
pub const TESTNET_P2PKH_VERSION: u8 = 0x6F;

/// Supported Bitcoin networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BtcNetwork {
    #[default]
    Mainnet,
    Testnet,
    Signet,
}

impl BtcNetwork {
    /// Version byte prefixed to the hash160 of a P2PKH address.
    pub fn p2pkh_version(self) -> u8 {
        match self {
            BtcNetwork::Mainnet => MAINNET_P2PKH_VERSION,
            BtcNetwork::Testnet | BtcNetwork::Signet => TESTNET_P2PKH_VERSION,
        }
    }

    /// Whether `version` is this network's P2PKH version byte.
    pub fn accepts_p2pkh_version(self, version: u8) -> bool {
        self.p2pkh_version() == version
    }
}

impl std::fmt::Display for BtcNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BtcNetwork::Mainnet => write!(f, "mainnet"),
            BtcNetwork::Testnet => write!(f, "testnet"),
            BtcNetwork::Signet => write!(f, "signet"),
        }
    }
}

impl FromStr for BtcNetwork {
    type Err = BtcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(BtcNetwork::Mainnet),
            "testnet" | "test" | "testnet3" => Ok(BtcNetwork::Testnet),
            "signet" => Ok(BtcNetwork::Signet),
            other => Err(BtcError::MalformedInput(format!(
                "unknown network '{other}' (expected mainnet, testnet or signet)"
            ))),
        }
    }
}
