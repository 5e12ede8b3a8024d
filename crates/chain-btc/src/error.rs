use thiserror::Error;

/// Errors raised while building, signing, or encoding a P2PKH spend.
#[derive(Debug, Error)]
pub enum BtcError {
    #[error("invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("address encoding failed: {0}")]
    EncodingError(String),

    #[error("insufficient funds: funding value {value} sat does not cover fee {fee} sat")]
    InsufficientFunds { value: u64, fee: u64 },

    #[error("output index {index} out of range: funding transaction has {count} outputs")]
    OutOfRangeOutputIndex { index: u32, count: usize },

    #[error("funding transaction hash mismatch: requested {requested}, lookup returned {returned}")]
    HashMismatch { requested: String, returned: String },

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("funding lookup failed: {0}")]
    LookupFailure(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),
}
