//! Cross-checks against rust-bitcoin: wire format, txid, legacy sighash,
//! P2PKH addresses, and signature validity under libsecp256k1.

use std::str::FromStr;

use bitcoin::consensus::deserialize;
use bitcoin::hashes::Hash;
use bitcoin::secp256k1::{ecdsa, Message, Secp256k1};
use bitcoin::sighash::SighashCache;
use bitcoin::ScriptBuf;
use chain_btc::*;
use proptest::prelude::*;

fn key(n: u8) -> PrivateKey {
    let mut bytes = [0u8; 32];
    bytes[31] = n;
    PrivateKey::from_bytes(&bytes).unwrap()
}

fn p2pkh_of(key: &PrivateKey) -> Script {
    pay_to_address_script(&derive_address(&key.public_key(), BtcNetwork::Mainnet).unwrap())
}

fn to_bitcoin(tx: &Transaction) -> bitcoin::Transaction {
    deserialize(&tx.serialize()).expect("rust-bitcoin rejects serialization")
}

fn three_in_two_out() -> Transaction {
    let mut tx = Transaction::new();
    for n in 1..=3u8 {
        let mut input = TxIn::new(OutPoint::new(Txid::from_internal_bytes([n; 32]), n as u32));
        input.sequence = 0xFFFF_FFF0 + n as u32;
        tx.inputs.push(input);
    }
    tx.outputs.push(TxOut::new(10_000, p2pkh_of(&key(7))));
    tx.outputs.push(TxOut::new(25_000, p2pkh_of(&key(8))));
    tx.lock_time = 650_000;
    tx
}

#[test]
fn signed_spend_parses_identically() {
    let funding = FundingOutput {
        outpoint: OutPoint::new(
            "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"
                .parse()
                .unwrap(),
            0,
        ),
        value: 50_000,
        script_pubkey: p2pkh_of(&key(1)),
    };
    let destination = derive_address(&key(2).public_key(), BtcNetwork::Mainnet).unwrap();
    let signed = sign_spend(&SweepConfig::default(), &key(1), &destination, &funding).unwrap();

    let btx = to_bitcoin(&signed.transaction);
    assert_eq!(btx.version.0, 1);
    assert_eq!(btx.lock_time.to_consensus_u32(), 0);
    assert_eq!(btx.input.len(), 1);
    assert_eq!(
        btx.input[0].previous_output.txid.to_string(),
        funding.outpoint.txid.to_string()
    );
    assert_eq!(btx.input[0].previous_output.vout, 0);
    assert_eq!(btx.input[0].sequence.0, 0xFFFF_FFFF);
    assert_eq!(
        btx.input[0].script_sig.as_bytes(),
        signed.transaction.inputs[0].script_sig.as_bytes()
    );
    assert_eq!(btx.output[0].value.to_sat(), 40_000);
    assert_eq!(
        btx.output[0].script_pubkey.as_bytes(),
        pay_to_address_script(&destination).as_bytes()
    );
    assert_eq!(btx.compute_txid().to_string(), signed.txid.to_string());
    assert_eq!(bitcoin::consensus::serialize(&btx), signed.bytes);
}

#[test]
fn sighash_matches_for_every_type_and_input() {
    let tx = three_in_two_out();
    let btx = to_bitcoin(&tx);
    let cache = SighashCache::new(&btx);
    let subscript = p2pkh_of(&key(1));
    let bscript = ScriptBuf::from_bytes(subscript.as_bytes().to_vec());

    for t in [0x01u32, 0x02, 0x03, 0x81, 0x82, 0x83] {
        let sighash_type = SighashType::from_u32(t).unwrap();
        for index in 0..tx.inputs.len() {
            let ours = compute_signature_hash(&tx, index, &subscript, sighash_type).unwrap();
            let theirs = cache
                .legacy_signature_hash(index, &bscript, t)
                .unwrap()
                .to_byte_array();
            assert_eq!(ours, theirs, "type 0x{t:02x}, input {index}");
        }
    }
}

#[test]
fn signature_verifies_under_libsecp256k1() {
    let subscript = p2pkh_of(&key(1));
    let mut tx = three_in_two_out();
    sign_input(&mut tx, 1, &key(1), &subscript, SighashType::All).unwrap();

    let digest = compute_signature_hash(&tx, 1, &subscript, SighashType::All).unwrap();
    let (sig_with_type, pubkey) =
        chain_btc::script::parse_signature_script(&tx.inputs[1].script_sig).unwrap();

    let secp = Secp256k1::verification_only();
    let sig = ecdsa::Signature::from_der(&sig_with_type[..sig_with_type.len() - 1]).unwrap();
    let pk = bitcoin::secp256k1::PublicKey::from_slice(pubkey).unwrap();
    secp.verify_ecdsa(&Message::from_digest(digest), &sig, &pk)
        .unwrap();
}

#[test]
fn address_matches_rust_bitcoin() {
    for n in [1u8, 2, 3, 200] {
        let pubkey = key(n).public_key();
        let bpk = bitcoin::PublicKey::from_slice(&pubkey.serialize_compressed()).unwrap();

        let ours = derive_address(&pubkey, BtcNetwork::Mainnet).unwrap();
        let theirs = bitcoin::Address::p2pkh(bpk.pubkey_hash(), bitcoin::Network::Bitcoin);
        assert_eq!(ours.to_string(), theirs.to_string());

        let ours = derive_address(&pubkey, BtcNetwork::Testnet).unwrap();
        let theirs = bitcoin::Address::p2pkh(bpk.pubkey_hash(), bitcoin::Network::Testnet);
        assert_eq!(ours.to_string(), theirs.to_string());
    }
}

#[test]
fn decodes_rust_bitcoin_addresses() {
    let s = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";
    let theirs = bitcoin::Address::from_str(s)
        .unwrap()
        .require_network(bitcoin::Network::Bitcoin)
        .unwrap();
    let ours = decode_address(s, BtcNetwork::Mainnet).unwrap();
    assert_eq!(ours.hash160().as_slice(), &theirs.script_pubkey().as_bytes()[3..23]);
}

fn arb_script() -> impl Strategy<Value = Script> {
    prop::collection::vec(any::<u8>(), 0..80).prop_map(Script::from_bytes)
}

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    let input = (any::<[u8; 32]>(), any::<u32>(), arb_script(), any::<u32>()).prop_map(
        |(txid, vout, script_sig, sequence)| TxIn {
            previous_output: OutPoint::new(Txid::from_internal_bytes(txid), vout),
            script_sig,
            sequence,
        },
    );
    let output = (0u64..=21_000_000 * 100_000_000, arb_script())
        .prop_map(|(value, script)| TxOut::new(value, script));
    (
        1u32..=2,
        prop::collection::vec(input, 1..4),
        prop::collection::vec(output, 1..4),
        any::<u32>(),
    )
        .prop_map(|(version, inputs, outputs, lock_time)| Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn serialization_matches_rust_bitcoin(tx in arb_transaction()) {
        let btx = to_bitcoin(&tx);
        prop_assert_eq!(bitcoin::consensus::serialize(&btx), tx.serialize());
        prop_assert_eq!(btx.compute_txid().to_string(), tx.txid().to_string());
    }

    #[test]
    fn legacy_sighash_matches_rust_bitcoin(
        tx in arb_transaction(),
        index_seed in any::<usize>(),
        t in prop::sample::select(vec![0x01u32, 0x02, 0x03, 0x81, 0x82, 0x83]),
    ) {
        let index = index_seed % tx.inputs.len();
        let subscript = p2pkh_of(&key(1));
        let btx = to_bitcoin(&tx);
        let theirs = SighashCache::new(&btx)
            .legacy_signature_hash(index, &ScriptBuf::from_bytes(subscript.as_bytes().to_vec()), t)
            .unwrap()
            .to_byte_array();
        let ours = compute_signature_hash(&tx, index, &subscript, SighashType::from_u32(t).unwrap()).unwrap();
        prop_assert_eq!(ours, theirs);
    }
}
