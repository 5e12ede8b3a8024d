use std::io::Write;

use btc_sweep::{load_config, ConfigError, LogFormat};
use chain_btc::BtcNetwork;

#[test]
fn load_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "network": "signet", "fee_sat": 1500, "log": {{ "format": "json" }} }}"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.network, BtcNetwork::Signet);
    assert_eq!(config.fee_sat, 1_500);
    assert_eq!(config.log.format, LogFormat::Json);
    assert_eq!(config.log.level, "info");
    assert_eq!(config.lookup.timeout_secs, 30);
}

#[test]
fn parse_error_names_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "network = \"testnet\"").unwrap();

    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
fn invalid_values_rejected_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "lookup": {{ "max_attempts": 0 }} }}"#).unwrap();

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("lookup.max_attempts"));
}
