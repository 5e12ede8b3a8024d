//! End-to-end tests over the public API:
//! key -> address -> funding output -> build -> sign -> serialize -> verify.

use chain_btc::*;

const KEY_ONE_HEX: &str = "0000000000000000000000000000000000000000000000000000000000000001";
const KEY_ONE_SCRIPT: &str = "76a914751e76e8199196d454941c45d1b3a323f1433bd688ac";
const GENESIS_ADDRESS: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";
const FUNDING_TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

struct StaticLookup(FundingTransaction);

impl FundingLookup for StaticLookup {
    fn lookup(&self, _txid: &Txid) -> Result<FundingTransaction, BtcError> {
        Ok(self.0.clone())
    }
}

fn key_one() -> PrivateKey {
    parse_private_key(KEY_ONE_HEX).unwrap()
}

fn funding_output(value: u64) -> FundingOutput {
    FundingOutput {
        outpoint: OutPoint::new(FUNDING_TXID.parse().unwrap(), 0),
        value,
        script_pubkey: Script::from_hex(KEY_ONE_SCRIPT).unwrap(),
    }
}

// ─── Example scenario: key 0x01, 50,000 in, 10,000 fee ──────────────

#[test]
fn key_one_spend_pays_forty_thousand() {
    let destination = decode_address(GENESIS_ADDRESS, BtcNetwork::Mainnet).unwrap();
    let signed = sign_spend(
        &SweepConfig::default(),
        &key_one(),
        &destination,
        &funding_output(50_000),
    )
    .unwrap();

    let tx = &signed.transaction;
    assert_eq!(tx.inputs.len(), 1);
    assert_eq!(tx.outputs.len(), 1);
    assert_eq!(tx.outputs[0].value, 40_000);
    assert_eq!(tx.outputs[0].script_pubkey, pay_to_address_script(&destination));
    assert_eq!(
        tx.outputs[0].script_pubkey.to_hex(),
        "76a91462e907b15cbf27d5425399ebf6f0fb50ebb88f1888ac"
    );
}

#[test]
fn key_one_derives_known_address_and_script() {
    let pubkey = key_one().public_key();
    let address = derive_address(&pubkey, BtcNetwork::Mainnet).unwrap();
    assert_eq!(address.to_string(), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
    assert_eq!(pay_to_address_script(&address).to_hex(), KEY_ONE_SCRIPT);
}

#[test]
fn signed_hex_layout() {
    let destination = decode_address(GENESIS_ADDRESS, BtcNetwork::Mainnet).unwrap();
    let signed = sign_spend(
        &SweepConfig::default(),
        &key_one(),
        &destination,
        &funding_output(50_000),
    )
    .unwrap();

    let hex = &signed.hex;
    assert_eq!(hex, &hex.to_lowercase());
    // version 1, one input, txid in internal byte order
    assert!(hex.starts_with("0100000001"));
    let mut internal = hex::decode(FUNDING_TXID).unwrap();
    internal.reverse();
    assert_eq!(&hex[10..74], hex::encode(internal));
    // one output of 40,000 sat to the genesis address, lock time 0
    assert!(hex.ends_with(
        "ffffffff01409c0000000000001976a91462e907b15cbf27d5425399ebf6f0fb50ebb88f1888ac00000000"
    ));
}

#[test]
fn signed_transaction_roundtrips_and_verifies() {
    let destination = decode_address(GENESIS_ADDRESS, BtcNetwork::Mainnet).unwrap();
    let funding = funding_output(50_000);
    let signed =
        sign_spend(&SweepConfig::default(), &key_one(), &destination, &funding).unwrap();

    let parsed = Transaction::from_hex(&signed.hex).unwrap();
    assert_eq!(parsed, signed.transaction);
    assert_eq!(parsed.txid(), signed.txid);
    verify_input(&parsed, 0, &funding.script_pubkey).unwrap();
}

// ─── Tamper: one flipped byte in the locking script ─────────────────

#[test]
fn tampered_locking_script_fails_verification() {
    let destination = decode_address(GENESIS_ADDRESS, BtcNetwork::Mainnet).unwrap();
    let funding = funding_output(50_000);
    let signed =
        sign_spend(&SweepConfig::default(), &key_one(), &destination, &funding).unwrap();

    // Output script starts 0x19 bytes before the final lock time.
    let mut bytes = signed.bytes.clone();
    let script_start = bytes.len() - 4 - 25;
    bytes[script_start + 5] ^= 0xFF;

    let tampered = Transaction::deserialize(&bytes).unwrap();
    assert_ne!(tampered.outputs[0].script_pubkey, signed.transaction.outputs[0].script_pubkey);
    let err = verify_input(&tampered, 0, &funding.script_pubkey).unwrap_err();
    assert!(matches!(err, BtcError::SigningError(_)));
}

#[test]
fn tampered_value_fails_verification() {
    let destination = decode_address(GENESIS_ADDRESS, BtcNetwork::Mainnet).unwrap();
    let funding = funding_output(50_000);
    let signed =
        sign_spend(&SweepConfig::default(), &key_one(), &destination, &funding).unwrap();

    let mut tampered = signed.transaction.clone();
    tampered.outputs[0].value += 1;
    assert!(verify_input(&tampered, 0, &funding.script_pubkey).is_err());
}

// ─── Entry function with a lookup backend ───────────────────────────

#[test]
fn sweep_through_lookup() {
    let funding = FundingTransaction {
        hash: FUNDING_TXID.parse().unwrap(),
        outputs: vec![
            TxOut::new(123, Script::from_hex("51").unwrap()),
            TxOut::new(75_000, Script::from_hex(KEY_ONE_SCRIPT).unwrap()),
        ],
    };
    let request = SpendRequest {
        private_key: key_one(),
        destination: GENESIS_ADDRESS.into(),
        funding_txid: FUNDING_TXID.parse().unwrap(),
        vout: 1,
    };

    let signed = sweep(&SweepConfig::default(), &request, &StaticLookup(funding)).unwrap();
    assert_eq!(signed.transaction.outputs[0].value, 65_000);
    assert_eq!(signed.transaction.inputs[0].previous_output.vout, 1);
    assert_eq!(
        signed.transaction.inputs[0].previous_output.txid.to_string(),
        FUNDING_TXID
    );
}

#[test]
fn sweep_rejects_lookup_returning_other_transaction() {
    let funding = FundingTransaction {
        hash: Txid::from_internal_bytes([0xEE; 32]),
        outputs: vec![TxOut::new(75_000, Script::from_hex(KEY_ONE_SCRIPT).unwrap())],
    };
    let request = SpendRequest {
        private_key: key_one(),
        destination: GENESIS_ADDRESS.into(),
        funding_txid: FUNDING_TXID.parse().unwrap(),
        vout: 0,
    };

    let err = sweep(&SweepConfig::default(), &request, &StaticLookup(funding)).unwrap_err();
    assert!(matches!(err, BtcError::HashMismatch { .. }));
    assert!(err.to_string().contains(FUNDING_TXID));
}

#[test]
fn testnet_spend() {
    let pair = generate_keypair();
    let own = derive_address(&pair.public_key, BtcNetwork::Testnet).unwrap();
    let funding = FundingOutput {
        outpoint: OutPoint::new(FUNDING_TXID.parse().unwrap(), 2),
        value: 20_000,
        script_pubkey: pay_to_address_script(&own),
    };
    let destination = decode_address(&own.to_string(), BtcNetwork::Testnet).unwrap();

    let config = SweepConfig::new(BtcNetwork::Testnet).with_fee(500);
    let signed = sign_spend(&config, &pair.private_key, &destination, &funding).unwrap();
    assert_eq!(signed.transaction.outputs[0].value, 19_500);
    verify_input(&signed.transaction, 0, &funding.script_pubkey).unwrap();
}
