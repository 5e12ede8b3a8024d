use std::fmt;

use crate::error::BtcError;
use crate::keys::PublicKey;
use crate::network::BtcNetwork;

/// Decoded length of a base58check P2PKH address, checksum excluded.
const PAYLOAD_LEN: usize = 21;

/// A P2PKH address: network version byte plus the hash160 of a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    network: BtcNetwork,
    hash160: [u8; 20],
}

impl Address {
    pub fn from_hash160(hash160: [u8; 20], network: BtcNetwork) -> Self {
        Self { network, hash160 }
    }

    pub fn network(&self) -> BtcNetwork {
        self.network
    }

    pub fn hash160(&self) -> &[u8; 20] {
        &self.hash160
    }

    /// Base58Check string: `version || hash160 || sha256d(...)[..4]`.
    pub fn encode(&self) -> String {
        let mut payload = Vec::with_capacity(PAYLOAD_LEN);
        payload.push(self.network.p2pkh_version());
        payload.extend_from_slice(&self.hash160);
        bs58::encode(payload).with_check().into_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Derive the P2PKH address of a public key.
///
/// Steps:
/// 1. Serialize the key compressed (33 bytes)
/// 2. RIPEMD-160(SHA-256(pubkey)) -> 20-byte hash
/// 3. Prepend the network version byte
/// 4. Base58Check encode
pub fn derive_address(public_key: &PublicKey, network: BtcNetwork) -> Result<Address, BtcError> {
    let compressed = public_key.serialize_compressed();
    if compressed[0] != 0x02 && compressed[0] != 0x03 {
        return Err(BtcError::EncodingError(format!(
            "unexpected compressed key prefix 0x{:02x}",
            compressed[0]
        )));
    }
    Ok(Address::from_hash160(public_key.hash160(), network))
}

/// Decode and validate a base58check P2PKH address for `network`.
pub fn decode_address(address: &str, network: BtcNetwork) -> Result<Address, BtcError> {
    let payload = bs58::decode(address)
        .with_check(None)
        .into_vec()
        .map_err(|e| BtcError::InvalidAddress(format!("{address}: {e}")))?;

    if payload.len() != PAYLOAD_LEN {
        return Err(BtcError::InvalidAddress(format!(
            "{address}: expected {PAYLOAD_LEN} payload bytes, got {}",
            payload.len()
        )));
    }

    let version = payload[0];
    if !network.accepts_p2pkh_version(version) {
        return Err(BtcError::InvalidAddress(format!(
            "{address}: version byte 0x{version:02x} is not a {network} P2PKH address (expected 0x{:02x})",
            network.p2pkh_version()
        )));
    }

    let mut hash160 = [0u8; 20];
    hash160.copy_from_slice(&payload[1..]);
    Ok(Address::from_hash160(hash160, network))
}
