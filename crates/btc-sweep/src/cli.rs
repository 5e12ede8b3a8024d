//! Command-line interface for `btc-sweep`.

use std::path::PathBuf;

use chain_btc::BtcNetwork;
use clap::{Args, Parser, Subcommand};

/// Sweep a P2PKH output to an address, or generate keys and addresses.
#[derive(Parser, Debug)]
#[command(name = "btc-sweep", version, propagate_version = true)]
pub struct Cli {
    /// JSON configuration file.
    #[arg(long, short = 'c', global = true, env = "BTC_SWEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// mainnet, testnet, or signet. Overrides the config file.
    #[arg(long, short = 'n', global = true, env = "BTC_SWEEP_NETWORK")]
    pub network: Option<BtcNetwork>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a keypair and print the key, public key, and address.
    Keygen,
    /// Build and sign a transaction spending one output to an address.
    Spend(SpendArgs),
    /// Derive the P2PKH address of a public key.
    Address(AddressArgs),
}

#[derive(Args, Debug)]
pub struct SpendArgs {
    /// Hex private key controlling the funding output.
    #[arg(long, env = "BTC_SWEEP_PRIVKEY", hide_env_values = true)]
    pub privkey: String,

    /// Destination address.
    #[arg(long)]
    pub address: String,

    /// Funding transaction id (hex, as shown by block explorers).
    #[arg(long)]
    pub txid: String,

    /// Index of the output to spend.
    #[arg(long)]
    pub vout: u32,

    /// Fee in satoshis. Overrides the config file.
    #[arg(long)]
    pub fee: Option<u64>,
}

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Hex SEC1 public key, compressed or uncompressed.
    #[arg(long)]
    pub pubkey: String,
}
