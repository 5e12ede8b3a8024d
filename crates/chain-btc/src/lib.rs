//! Bitcoin P2PKH spending core.
//!
//! Generates secp256k1 keypairs, derives and decodes Base58Check P2PKH
//! addresses, and builds, signs, and serializes single-input,
//! single-output legacy transactions. No I/O happens here; the funding
//! transaction comes in through the [`FundingLookup`] trait.

pub mod address;
pub mod builder;
pub mod config;
pub mod error;
pub mod funding;
pub mod hash;
pub mod keys;
pub mod network;
pub mod script;
pub mod sighash;
pub mod signer;
pub mod sweep;
pub mod transaction;

pub use address::{decode_address, derive_address, Address};
pub use builder::build_transaction;
pub use config::{SweepConfig, DEFAULT_FEE_SAT};
pub use error::BtcError;
pub use funding::{select_funding_output, FundingLookup, FundingOutput, FundingTransaction};
pub use keys::{generate_keypair, parse_private_key, KeyPair, PrivateKey, PublicKey};
pub use network::BtcNetwork;
pub use script::{pay_to_address_script, signature_script, Script, ScriptBuilder};
pub use sighash::{compute_signature_hash, SighashType, SIGHASH_SINGLE_BUG_DIGEST};
pub use signer::{sign_input, verify_input};
pub use sweep::{sign_spend, sweep, SignedTransaction, SpendRequest};
pub use transaction::{OutPoint, Transaction, TxIn, TxOut, Txid};
