//! blockchain.info `rawtx` client.

use std::thread;
use std::time::Duration;

use chain_btc::{BtcError, FundingLookup, FundingTransaction, Script, TxOut, Txid};
use serde::Deserialize;

use crate::config::LookupConfig;
use crate::error::LookupError;

/// The fields of a `rawtx` response this tool needs. Others are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTx {
    pub ver: u32,
    pub hash: String,
    pub out: Vec<RawOutput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOutput {
    /// Satoshis.
    pub value: u64,
    /// Locking script hex.
    pub script: String,
}

/// Parse a `rawtx` JSON body into a funding transaction.
pub fn parse_raw_tx(body: &str) -> Result<FundingTransaction, LookupError> {
    let raw: RawTx =
        serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()))?;

    if !(1..=2).contains(&raw.ver) {
        return Err(LookupError::UnsupportedVersion(raw.ver));
    }

    let hash: Txid = raw
        .hash
        .parse()
        .map_err(|e: BtcError| LookupError::Malformed(format!("hash: {e}")))?;

    let outputs = raw
        .out
        .iter()
        .enumerate()
        .map(|(i, out)| {
            Script::from_hex(&out.script)
                .map(|script| TxOut::new(out.value, script))
                .map_err(|e| LookupError::Malformed(format!("out[{i}].script: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FundingTransaction { hash, outputs })
}

/// Run `op` up to `max_attempts` times, sleeping `delay` between attempts.
///
/// Only errors for which [`LookupError::is_retryable`] holds are retried.
/// `op` receives the 1-based attempt number.
pub fn with_retry<T, F>(max_attempts: u32, delay: Duration, mut op: F) -> Result<T, LookupError>
where
    F: FnMut(u32) -> Result<T, LookupError>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) if attempt >= max_attempts => {
                return Err(LookupError::Exhausted {
                    attempts: attempt,
                    last: Box::new(e),
                })
            }
            Err(e) => {
                tracing::warn!(attempt, max_attempts, error = %e, "lookup attempt failed, retrying");
                thread::sleep(delay);
                attempt += 1;
            }
        }
    }
}

/// Blocking HTTP client for `{base_url}/rawtx/{txid}`.
#[derive(Debug, Clone)]
pub struct BlockchainInfoClient {
    base_url: String,
    max_attempts: u32,
    retry_delay: Duration,
    client: reqwest::blocking::Client,
}

impl BlockchainInfoClient {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("btc-sweep/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_attempts: config.max_attempts,
            retry_delay: config.retry_delay(),
            client,
        })
    }

    pub fn rawtx_url(&self, txid: &Txid) -> String {
        format!("{}/rawtx/{}", self.base_url, txid)
    }

    /// Fetch and parse a transaction, retrying transient failures.
    pub fn fetch(&self, txid: &Txid) -> Result<FundingTransaction, LookupError> {
        let url = self.rawtx_url(txid);
        with_retry(self.max_attempts, self.retry_delay, |attempt| {
            tracing::debug!(%url, attempt, "fetching funding transaction");
            self.fetch_once(&url)
        })
    }

    fn fetch_once(&self, url: &str) -> Result<FundingTransaction, LookupError> {
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::ServerError {
                status_code: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = resp.text()?;
        parse_raw_tx(&body)
    }
}

impl FundingLookup for BlockchainInfoClient {
    fn lookup(&self, txid: &Txid) -> Result<FundingTransaction, BtcError> {
        Ok(self.fetch(txid)?)
    }
}
