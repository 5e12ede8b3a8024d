//! Application configuration: JSON file, defaults, and validation.

use std::path::Path;
use std::time::Duration;

use chain_btc::{BtcNetwork, SweepConfig, DEFAULT_FEE_SAT};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logging::LogFormat;

const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 300;
const MIN_ATTEMPTS: u32 = 1;
const MAX_ATTEMPTS: u32 = 10;

/// Root configuration. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub network: BtcNetwork,

    /// Flat fee in satoshis deducted from the funding value.
    #[serde(default = "AppConfig::default_fee_sat")]
    pub fee_sat: u64,

    #[serde(default)]
    pub lookup: LookupConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: BtcNetwork::default(),
            fee_sat: Self::default_fee_sat(),
            lookup: LookupConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    const fn default_fee_sat() -> u64 {
        DEFAULT_FEE_SAT
    }

    /// Core parameters for one spend.
    pub fn sweep_config(&self) -> SweepConfig {
        SweepConfig::new(self.network).with_fee(self.fee_sat)
    }
}

/// Block explorer lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    /// Base URL; requests go to `{base_url}/rawtx/{txid}`.
    #[serde(default = "LookupConfig::default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "LookupConfig::default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts, including the first.
    #[serde(default = "LookupConfig::default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "LookupConfig::default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
            max_attempts: Self::default_max_attempts(),
            retry_delay_ms: Self::default_retry_delay_ms(),
        }
    }
}

impl LookupConfig {
    fn default_base_url() -> String {
        "https://blockchain.info".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        30
    }

    const fn default_max_attempts() -> u32 {
        3
    }

    const fn default_retry_delay_ms() -> u64 {
        1_000
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "LogConfig::default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

/// Load and validate configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path_str.clone(),
        source: e,
    })?;

    load_config_from_str(&content, &path_str)
}

/// Load and validate configuration from a JSON string.
pub fn load_config_from_str(content: &str, source_name: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content).map_err(|e| ConfigError::Parse {
        path: source_name.to_string(),
        source: e,
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Validate the whole configuration, collecting every problem.
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.fee_sat == 0 {
        errors.push("fee_sat must be greater than 0".to_string());
    }
    validate_lookup_config(&config.lookup, &mut errors);
    if config.log.level.trim().is_empty() {
        errors.push("log.level cannot be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed(errors))
    }
}

fn validate_lookup_config(config: &LookupConfig, errors: &mut Vec<String>) {
    if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
        errors.push(format!(
            "lookup.base_url must start with http:// or https://, got '{}'",
            config.base_url
        ));
    }

    if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&config.timeout_secs) {
        errors.push(format!(
            "lookup.timeout_secs must be between {MIN_TIMEOUT_SECS} and {MAX_TIMEOUT_SECS}"
        ));
    }

    if !(MIN_ATTEMPTS..=MAX_ATTEMPTS).contains(&config.max_attempts) {
        errors.push(format!(
            "lookup.max_attempts must be between {MIN_ATTEMPTS} and {MAX_ATTEMPTS}"
        ));
    }
}
