//! Library entry point: spend one funding output to one address.

use crate::address::{decode_address, Address};
use crate::builder::build_transaction;
use crate::config::SweepConfig;
use crate::error::BtcError;
use crate::funding::{select_funding_output, FundingLookup, FundingOutput};
use crate::keys::PrivateKey;
use crate::signer::{sign_input, verify_input};
use crate::transaction::{Transaction, Txid};

/// What the caller wants to spend and where to send it.
#[derive(Debug, Clone)]
pub struct SpendRequest {
    pub private_key: PrivateKey,
    /// Base58Check address, decoded against the configured network.
    pub destination: String,
    pub funding_txid: Txid,
    pub vout: u32,
}

/// A fully signed transaction ready for broadcast.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub txid: Txid,
    pub bytes: Vec<u8>,
    /// Lowercase hex of `bytes`.
    pub hex: String,
    pub fee_sat: u64,
}

/// Look up the funding transaction, validate it, then build, sign, and
/// serialize the spend.
pub fn sweep<L>(
    config: &SweepConfig,
    request: &SpendRequest,
    lookup: &L,
) -> Result<SignedTransaction, BtcError>
where
    L: FundingLookup + ?Sized,
{
    let destination = decode_address(&request.destination, config.network)?;

    tracing::debug!(txid = %request.funding_txid, vout = request.vout, "looking up funding transaction");
    let funding = lookup.lookup(&request.funding_txid)?;
    let output = select_funding_output(&funding, &request.funding_txid, request.vout)?;

    sign_spend(config, &request.private_key, &destination, &output)
}

/// Build and sign the spend of an already validated funding output.
pub fn sign_spend(
    config: &SweepConfig,
    private_key: &PrivateKey,
    destination: &Address,
    funding: &FundingOutput,
) -> Result<SignedTransaction, BtcError> {
    if destination.network().p2pkh_version() != config.network.p2pkh_version() {
        return Err(BtcError::InvalidAddress(format!(
            "{destination} is a {} address, expected {}",
            destination.network(),
            config.network
        )));
    }

    let mut transaction = build_transaction(
        funding.outpoint,
        funding.value,
        &funding.script_pubkey,
        destination,
        config.fee_sat,
    )?;

    sign_input(
        &mut transaction,
        0,
        private_key,
        &funding.script_pubkey,
        config.sighash_type,
    )?;
    verify_input(&transaction, 0, &funding.script_pubkey)?;

    let bytes = transaction.serialize();
    let hex = hex::encode(&bytes);
    let txid = transaction.txid();

    tracing::info!(
        %txid,
        size = bytes.len(),
        input_value = funding.value,
        output_value = transaction.total_output_value(),
        fee_sat = config.fee_sat,
        "signed transaction"
    );

    Ok(SignedTransaction {
        transaction,
        txid,
        bytes,
        hex,
        fee_sat: config.fee_sat,
    })
}
