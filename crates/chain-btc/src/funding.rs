//! Funding-output lookup seam and validation of what it returns.

use crate::error::BtcError;
use crate::script::Script;
use crate::transaction::{OutPoint, TxOut, Txid};

/// A previous transaction as reported by a lookup backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingTransaction {
    /// The hash the backend claims for the transaction.
    pub hash: Txid,
    pub outputs: Vec<TxOut>,
}

/// The single output being spent, with everything needed to sign for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingOutput {
    pub outpoint: OutPoint,
    pub value: u64,
    pub script_pubkey: Script,
}

/// Fetches a previous transaction by id.
///
/// Implementations do their own I/O and retrying. Failures surface as
/// `BtcError::LookupFailure`.
pub trait FundingLookup {
    fn lookup(&self, txid: &Txid) -> Result<FundingTransaction, BtcError>;
}

impl<T: FundingLookup + ?Sized> FundingLookup for &T {
    fn lookup(&self, txid: &Txid) -> Result<FundingTransaction, BtcError> {
        (**self).lookup(txid)
    }
}

/// Pick output `vout` of `funding`, checking it is the transaction that was
/// asked for.
pub fn select_funding_output(
    funding: &FundingTransaction,
    requested: &Txid,
    vout: u32,
) -> Result<FundingOutput, BtcError> {
    if funding.hash != *requested {
        return Err(BtcError::HashMismatch {
            requested: requested.to_string(),
            returned: funding.hash.to_string(),
        });
    }

    let output = usize::try_from(vout)
        .ok()
        .and_then(|i| funding.outputs.get(i))
        .ok_or(BtcError::OutOfRangeOutputIndex {
            index: vout,
            count: funding.outputs.len(),
        })?;

    Ok(FundingOutput {
        outpoint: OutPoint::new(funding.hash, vout),
        value: output.value,
        script_pubkey: output.script_pubkey.clone(),
    })
}
