//! Legacy (pre-segwit) signature hashing.
//!
//! Digests come from `bitcoin::sighash::SighashCache::legacy_signature_hash`.
//! This module adds the argument checks and maps [`SighashType`] onto
//! `EcdsaSighashType`.
//!
//! `OP_CODESEPARATOR` is not stripped from the subscript; P2PKH locking
//! scripts never contain it.

use std::fmt;

use bitcoin::hashes::Hash;
use bitcoin::sighash::{EcdsaSighashType, SighashCache};

use crate::error::BtcError;
use crate::script::Script;
use crate::transaction::Transaction;

/// Digest returned for `SIGHASH_SINGLE` when the input has no output at the
/// same index: the integer one in little-endian byte order.
pub const SIGHASH_SINGLE_BUG_DIGEST: [u8; 32] = {
    let mut one = [0u8; 32];
    one[0] = 0x01;
    one
};

/// Which parts of the transaction a signature commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SighashType {
    /// All inputs and all outputs.
    #[default]
    All,
    /// All inputs, no outputs.
    None,
    /// All inputs, and the output at the signed input's index.
    Single,
    AllPlusAnyoneCanPay,
    NonePlusAnyoneCanPay,
    SinglePlusAnyoneCanPay,
}

impl SighashType {
    /// The 4-byte value appended to the preimage.
    pub fn to_u32(self) -> u32 {
        EcdsaSighashType::from(self).to_u32()
    }

    /// The byte appended to a DER signature in an unlocking script.
    pub fn to_byte(self) -> u8 {
        self.to_u32() as u8
    }

    /// Parse one of the six standard values. Anything else is rejected.
    pub fn from_u32(value: u32) -> Result<Self, BtcError> {
        EcdsaSighashType::from_standard(value)
            .map(Self::from)
            .map_err(|_| BtcError::SigningError(format!("non-standard sighash type 0x{value:02x}")))
    }

    pub fn anyone_can_pay(self) -> bool {
        matches!(
            self,
            SighashType::AllPlusAnyoneCanPay
                | SighashType::NonePlusAnyoneCanPay
                | SighashType::SinglePlusAnyoneCanPay
        )
    }

    fn is_single(self) -> bool {
        matches!(self, SighashType::Single | SighashType::SinglePlusAnyoneCanPay)
    }
}

impl From<SighashType> for EcdsaSighashType {
    fn from(t: SighashType) -> Self {
        match t {
            SighashType::All => EcdsaSighashType::All,
            SighashType::None => EcdsaSighashType::None,
            SighashType::Single => EcdsaSighashType::Single,
            SighashType::AllPlusAnyoneCanPay => EcdsaSighashType::AllPlusAnyoneCanPay,
            SighashType::NonePlusAnyoneCanPay => EcdsaSighashType::NonePlusAnyoneCanPay,
            SighashType::SinglePlusAnyoneCanPay => EcdsaSighashType::SinglePlusAnyoneCanPay,
        }
    }
}

impl From<EcdsaSighashType> for SighashType {
    fn from(t: EcdsaSighashType) -> Self {
        match t {
            EcdsaSighashType::All => SighashType::All,
            EcdsaSighashType::None => SighashType::None,
            EcdsaSighashType::Single => SighashType::Single,
            EcdsaSighashType::AllPlusAnyoneCanPay => SighashType::AllPlusAnyoneCanPay,
            EcdsaSighashType::NonePlusAnyoneCanPay => SighashType::NonePlusAnyoneCanPay,
            EcdsaSighashType::SinglePlusAnyoneCanPay => SighashType::SinglePlusAnyoneCanPay,
        }
    }
}

impl fmt::Display for SighashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&EcdsaSighashType::from(*self), f)
    }
}

/// Legacy signature hash of input `input_index` spending an output locked
/// by `subscript`.
///
/// Fails with `MalformedInput` if the input index is out of range or the
/// subscript is empty.
pub fn compute_signature_hash(
    tx: &Transaction,
    input_index: usize,
    subscript: &Script,
    sighash_type: SighashType,
) -> Result<[u8; 32], BtcError> {
    if input_index >= tx.inputs.len() {
        return Err(BtcError::MalformedInput(format!(
            "input index {input_index} out of range: transaction has {} inputs",
            tx.inputs.len()
        )));
    }
    if subscript.is_empty() {
        return Err(BtcError::MalformedInput("subscript is empty".into()));
    }
    if sighash_type.is_single() && input_index >= tx.outputs.len() {
        tracing::debug!(input_index, "SIGHASH_SINGLE without matching output, digest is one");
    }

    let unsigned = tx.to_bitcoin();
    let cache = SighashCache::new(&unsigned);
    let digest = cache
        .legacy_signature_hash(
            input_index,
            bitcoin::Script::from_bytes(subscript.as_bytes()),
            sighash_type.to_u32(),
        )
        .map_err(|e| BtcError::MalformedInput(format!("signature hash: {e}")))?
        .to_byte_array();

    tracing::debug!(
        input_index,
        sighash_type = %sighash_type,
        digest = %hex::encode(digest),
        "computed signature hash"
    );
    Ok(digest)
}
