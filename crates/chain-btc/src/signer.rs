//! ECDSA signing and verification of P2PKH inputs.

use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::Signature;

use crate::error::BtcError;
use crate::hash;
use crate::keys::{PrivateKey, PublicKey};
use crate::script::{parse_signature_script, signature_script, Script};
use crate::sighash::{compute_signature_hash, SighashType};
use crate::transaction::Transaction;

/// Sign input `input_index` and write the unlocking script into it.
///
/// Must run after every other field of `tx` is final: the signature commits
/// to the serialized transaction. Nonces are derived per RFC 6979 and the
/// signature is normalized to low-S.
///
/// When `subscript` is a P2PKH locking script, the key's hash160 must match
/// the one it commits to.
pub fn sign_input(
    tx: &mut Transaction,
    input_index: usize,
    private_key: &PrivateKey,
    subscript: &Script,
    sighash_type: SighashType,
) -> Result<Script, BtcError> {
    let public_key = private_key.public_key();
    if let Some(expected) = subscript.p2pkh_hash() {
        let actual = public_key.hash160();
        if actual != expected {
            return Err(BtcError::SigningError(format!(
                "signing key hash {} does not match subscript hash {}",
                hex::encode(actual),
                hex::encode(expected)
            )));
        }
    }

    let digest = compute_signature_hash(tx, input_index, subscript, sighash_type)?;

    let signature: Signature = private_key
        .signing_key()
        .sign_prehash(&digest)
        .map_err(|e| BtcError::SigningError(format!("ECDSA signing failed: {e}")))?;
    let signature = signature.normalize_s().unwrap_or(signature);

    // DER signature followed by the sighash type byte
    let der = signature.to_der();
    let mut sig_with_type = Vec::with_capacity(der.len() + 1);
    sig_with_type.extend_from_slice(der.as_bytes());
    sig_with_type.push(sighash_type.to_byte());

    let script_sig = signature_script(&sig_with_type, &public_key.serialize_compressed());
    tracing::debug!(
        input_index,
        signature_len = sig_with_type.len(),
        script_sig_len = script_sig.len(),
        "signed input"
    );

    tx.inputs[input_index].script_sig = script_sig.clone();
    Ok(script_sig)
}

/// Check the unlocking script of input `input_index` against `subscript`.
///
/// Verifies the `<signature> <pubkey>` shape, that the pushed key hashes to
/// the subscript's P2PKH hash, and the ECDSA signature over the recomputed
/// signature hash.
pub fn verify_input(tx: &Transaction, input_index: usize, subscript: &Script) -> Result<(), BtcError> {
    let input = tx.inputs.get(input_index).ok_or_else(|| {
        BtcError::MalformedInput(format!(
            "input index {input_index} out of range: transaction has {} inputs",
            tx.inputs.len()
        ))
    })?;

    let (sig_with_type, pubkey_bytes) = parse_signature_script(&input.script_sig)?;
    let (type_byte, der) = sig_with_type
        .split_last()
        .ok_or_else(|| BtcError::SigningError("empty signature push".into()))?;
    let sighash_type = SighashType::from_u32(u32::from(*type_byte))?;

    if let Some(expected) = subscript.p2pkh_hash() {
        if hash::hash160(pubkey_bytes) != expected {
            return Err(BtcError::SigningError(
                "public key in unlocking script does not match subscript hash".into(),
            ));
        }
    }

    let public_key = PublicKey::from_sec1_bytes(pubkey_bytes)?;
    let digest = compute_signature_hash(tx, input_index, subscript, sighash_type)?;
    public_key.verify(&digest, der)
}
