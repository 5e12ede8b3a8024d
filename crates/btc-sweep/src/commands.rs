//! Subcommand implementations, separate from argument parsing and
//! process setup so they can be called from tests.

use std::fmt;

use chain_btc::{
    derive_address, generate_keypair, parse_private_key, sweep, Address, BtcError, BtcNetwork,
    FundingLookup, PublicKey, SignedTransaction, SpendRequest, SweepConfig,
};
use zeroize::Zeroizing;

/// Output of `keygen`.
pub struct KeygenOutput {
    pub private_key_hex: Zeroizing<String>,
    pub public_key_hex: String,
    pub address: Address,
}

impl fmt::Display for KeygenOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "private key: {}", self.private_key_hex.as_str())?;
        writeln!(f, "public key:  {}", self.public_key_hex)?;
        write!(f, "address:     {}", self.address)
    }
}

pub fn keygen(network: BtcNetwork) -> Result<KeygenOutput, BtcError> {
    let pair = generate_keypair();
    let address = derive_address(&pair.public_key, network)?;
    tracing::info!(%network, %address, "generated keypair");
    Ok(KeygenOutput {
        private_key_hex: pair.private_key.to_hex(),
        public_key_hex: hex::encode(pair.public_key.serialize_compressed()),
        address,
    })
}

/// Address of a hex SEC1 public key.
pub fn address_for_pubkey(pubkey_hex: &str, network: BtcNetwork) -> Result<Address, BtcError> {
    let bytes = hex::decode(pubkey_hex.trim())
        .map_err(|e| BtcError::InvalidKeyFormat(format!("invalid public key hex: {e}")))?;
    let public_key = PublicKey::from_sec1_bytes(&bytes)?;
    derive_address(&public_key, network)
}

/// Parse the string arguments of `spend` and run the sweep.
///
/// Arguments are trimmed once here; the core parsers reject whitespace.
pub fn spend<L>(
    config: &SweepConfig,
    privkey_hex: &str,
    destination: &str,
    txid_hex: &str,
    vout: u32,
    lookup: &L,
) -> Result<SignedTransaction, BtcError>
where
    L: FundingLookup + ?Sized,
{
    let request = SpendRequest {
        private_key: parse_private_key(privkey_hex.trim())?,
        destination: destination.trim().to_string(),
        funding_txid: txid_hex.trim().parse()?,
        vout,
    };
    sweep(config, &request, lookup)
}
