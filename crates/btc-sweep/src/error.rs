use chain_btc::BtcError;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    /// Validation failed with one or more errors.
    #[error("config validation failed:\n{}", .0.join("\n"))]
    ValidationFailed(Vec<String>),
}

/// Errors from the block explorer lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport failure: connect, timeout, or reading the body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-2xx response.
    #[error("server error ({status_code}) from {url}")]
    ServerError { status_code: u16, url: String },

    /// The body was not a usable transaction.
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("unsupported transaction version {0} in response")]
    UnsupportedVersion(u32),

    #[error("lookup gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<LookupError>,
    },
}

impl LookupError {
    /// Transport errors and 5xx responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            LookupError::Http(e) => !e.is_builder(),
            LookupError::ServerError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

impl From<LookupError> for BtcError {
    fn from(err: LookupError) -> Self {
        BtcError::LookupFailure(err.to_string())
    }
}
