//! External collaborators for the `chain-btc` core: configuration, the
//! blockchain.info lookup, logging setup, and the `btc-sweep` CLI.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;

pub use config::{load_config, load_config_from_str, AppConfig, LogConfig, LookupConfig};
pub use error::{ConfigError, LookupError};
pub use logging::{init_logging, LogFormat};
pub use lookup::BlockchainInfoClient;
