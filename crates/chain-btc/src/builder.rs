use crate::address::Address;
use crate::error::BtcError;
use crate::script::{pay_to_address_script, Script};
use crate::transaction::{OutPoint, Transaction, TxIn, TxOut};

/// Build an unsigned one-input, one-output transaction.
///
/// The input spends `outpoint` with an empty unlocking script; the output
/// pays `funding_value - fee_sat` to `destination`.
///
/// # Errors
///
/// - `InsufficientFunds` if `funding_value <= fee_sat`
/// - `MalformedInput` if the outpoint hash is all zeros or
///   `funding_script` is empty
pub fn build_transaction(
    outpoint: OutPoint,
    funding_value: u64,
    funding_script: &Script,
    destination: &Address,
    fee_sat: u64,
) -> Result<Transaction, BtcError> {
    if outpoint.txid.is_zero() {
        return Err(BtcError::MalformedInput("funding outpoint hash is empty".into()));
    }
    if funding_script.is_empty() {
        return Err(BtcError::MalformedInput("funding locking script is empty".into()));
    }
    if funding_value <= fee_sat {
        return Err(BtcError::InsufficientFunds {
            value: funding_value,
            fee: fee_sat,
        });
    }

    let mut tx = Transaction::new();
    tx.inputs.push(TxIn::new(outpoint));
    tx.outputs.push(TxOut::new(
        funding_value - fee_sat,
        pay_to_address_script(destination),
    ));
    Ok(tx)
}
