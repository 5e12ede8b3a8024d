//! Transaction model.
//!
//! The fields mirror the legacy wire layout. Encoding, decoding, and txid
//! computation go through `bitcoin::Transaction` and its consensus codec.

use std::fmt;
use std::str::FromStr;

use bitcoin::absolute::LockTime;
use bitcoin::consensus;
use bitcoin::hashes::Hash;
use bitcoin::{Amount, ScriptBuf, Sequence, Witness};

use crate::error::BtcError;
use crate::script::Script;

/// Version written by `build_transaction`.
pub const TX_VERSION: u32 = 1;

/// Final sequence number: no relative lock time, no replacement.
pub const SEQUENCE_FINAL: u32 = 0xFFFF_FFFF;

/// Transaction hash in internal byte order.
///
/// Parsed from and displayed as the conventional reversed hex used by
/// block explorers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Txid([u8; 32]);

impl Txid {
    pub const fn from_internal_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_internal_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    fn to_bitcoin(self) -> bitcoin::Txid {
        bitcoin::Txid::from_byte_array(self.0)
    }
}

impl From<bitcoin::Txid> for Txid {
    fn from(txid: bitcoin::Txid) -> Self {
        Self(txid.to_byte_array())
    }
}

impl FromStr for Txid {
    type Err = BtcError;

    /// Parse a 64-character hex txid (big-endian display order).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        bitcoin::Txid::from_str(s)
            .map(Self::from)
            .map_err(|e| BtcError::MalformedInput(format!("invalid txid {s:?}: {e}")))
    }
}

impl fmt::Display for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_bitcoin(), f)
    }
}

impl fmt::Debug for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Txid({self})")
    }
}

/// Reference to an output of an earlier transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutPoint {
    pub txid: Txid,
    pub vout: u32,
}

impl OutPoint {
    pub fn new(txid: Txid, vout: u32) -> Self {
        Self { txid, vout }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxIn {
    pub previous_output: OutPoint,
    /// Empty until the input is signed.
    pub script_sig: Script,
    pub sequence: u32,
}

impl TxIn {
    /// An unsigned input spending `previous_output`.
    pub fn new(previous_output: OutPoint) -> Self {
        Self {
            previous_output,
            script_sig: Script::new(),
            sequence: SEQUENCE_FINAL,
        }
    }

    fn to_bitcoin(&self) -> bitcoin::TxIn {
        bitcoin::TxIn {
            previous_output: bitcoin::OutPoint::new(
                self.previous_output.txid.to_bitcoin(),
                self.previous_output.vout,
            ),
            script_sig: ScriptBuf::from_bytes(self.script_sig.as_bytes().to_vec()),
            sequence: Sequence(self.sequence),
            witness: Witness::default(),
        }
    }

    fn from_bitcoin(input: bitcoin::TxIn) -> Result<Self, BtcError> {
        if !input.witness.is_empty() {
            return Err(BtcError::SerializationError(
                "segwit inputs are not supported".into(),
            ));
        }
        Ok(Self {
            previous_output: OutPoint::new(
                input.previous_output.txid.into(),
                input.previous_output.vout,
            ),
            script_sig: Script::from_bytes(input.script_sig.into_bytes()),
            sequence: input.sequence.0,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    /// Amount in satoshis.
    pub value: u64,
    pub script_pubkey: Script,
}

impl TxOut {
    pub fn new(value: u64, script_pubkey: Script) -> Self {
        Self {
            value,
            script_pubkey,
        }
    }

    fn to_bitcoin(&self) -> bitcoin::TxOut {
        bitcoin::TxOut {
            value: Amount::from_sat(self.value),
            script_pubkey: ScriptBuf::from_bytes(self.script_pubkey.as_bytes().to_vec()),
        }
    }

    fn from_bitcoin(output: bitcoin::TxOut) -> Self {
        Self {
            value: output.value.to_sat(),
            script_pubkey: Script::from_bytes(output.script_pubkey.into_bytes()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

impl Transaction {
    /// Empty version-1 transaction with lock time 0.
    pub fn new() -> Self {
        Self {
            version: TX_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    /// Consensus serialization.
    ///
    /// A transaction with no inputs is written with the segwit marker and
    /// flag so that its empty input list is not read as the marker.
    pub fn serialize(&self) -> Vec<u8> {
        consensus::serialize(&self.to_bitcoin())
    }

    /// Lowercase hex of `serialize()`.
    pub fn to_hex(&self) -> String {
        consensus::encode::serialize_hex(&self.to_bitcoin())
    }

    /// Parse exactly one legacy transaction; trailing bytes are an error.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, BtcError> {
        let tx: bitcoin::Transaction = consensus::deserialize(bytes)
            .map_err(|e| BtcError::SerializationError(format!("invalid transaction: {e}")))?;
        Self::from_bitcoin(tx)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, BtcError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| BtcError::SerializationError(format!("invalid hex: {e}")))?;
        Self::deserialize(&bytes)
    }

    /// Double SHA-256 of the serialization.
    pub fn txid(&self) -> Txid {
        self.to_bitcoin().compute_txid().into()
    }

    pub fn total_output_value(&self) -> u64 {
        self.outputs.iter().map(|o| o.value).sum()
    }

    pub(crate) fn to_bitcoin(&self) -> bitcoin::Transaction {
        bitcoin::Transaction {
            version: bitcoin::transaction::Version(self.version as i32),
            lock_time: LockTime::from_consensus(self.lock_time),
            input: self.inputs.iter().map(TxIn::to_bitcoin).collect(),
            output: self.outputs.iter().map(TxOut::to_bitcoin).collect(),
        }
    }

    fn from_bitcoin(tx: bitcoin::Transaction) -> Result<Self, BtcError> {
        Ok(Self {
            version: tx.version.0 as u32,
            inputs: tx
                .input
                .into_iter()
                .map(TxIn::from_bitcoin)
                .collect::<Result<_, _>>()?,
            outputs: tx.output.into_iter().map(TxOut::from_bitcoin).collect(),
            lock_time: tx.lock_time.to_consensus_u32(),
        })
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}
