//! Error types for the receipt API.

use ledger_receipt_core::{DecodeError, ReceiptError};
use thiserror::Error;

/// Errors that can occur during receipt operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Receipt error (decode, malformed log entry, broken invariant).
    #[error("receipt error: {0}")]
    Receipt(#[from] ReceiptError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Receipt(ReceiptError::Decode(err))
    }
}

impl Error {
    /// The decode failure behind this error, if any.
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Error::Receipt(ReceiptError::Decode(err)) => Some(err),
            _ => None,
        }
    }
}

/// Result type for receipt API operations.
pub type Result<T> = std::result::Result<T, Error>;
