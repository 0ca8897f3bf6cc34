//! Error types for wasmswap

use thiserror::Error;

/// Core errors that can occur in wasmswap
#[derive(Debug, Error)]
pub enum Error {
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TxError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Chain endpoint connection and query errors
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Chain endpoint unreachable at {url}")]
    Unreachable { url: String },

    #[error("Chain endpoint returned error: {message}")]
    ApiError { message: String },

    #[error("Contract query failed on {contract}: {message}")]
    QueryFailed { contract: String, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Transaction not found: {tx_hash}")]
    TxNotFound { tx_hash: String },

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Protocol-specific errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Protocol state unavailable: {reason}")]
    StateUnavailable { reason: String },
}

/// Transaction building errors
#[derive(Debug, Error)]
pub enum TxError {
    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },
}

/// Result type alias for wasmswap operations
pub type Result<T> = std::result::Result<T, Error>;

impl ProtocolError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::StateUnavailable { .. } => "state_unavailable",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::StateUnavailable { .. } => 503,
        }
    }
}

impl TxError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAddress { .. } => "invalid_address",
        }
    }
}

impl ChainError {
    /// A timeout leaves the outcome of a submitted request unknown
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_codes() {
        let err = ProtocolError::StateUnavailable {
            reason: "no pools loaded".into(),
        };
        assert_eq!(err.error_code(), "state_unavailable");
        assert_eq!(err.status_code(), 503);
    }

    #[test]
    fn test_chain_error_wraps_into_core_error() {
        let err: Error = ChainError::Timeout { secs: 30 }.into();
        assert!(matches!(err, Error::Chain(ChainError::Timeout { secs: 30 })));
        assert_eq!(err.to_string(), "Chain error: Request timed out after 30s");
    }
}
