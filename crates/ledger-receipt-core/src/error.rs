//! Error types for the receipt core.

use thiserror::Error;

/// Reasons a byte stream is rejected by [`crate::codec::decode`].
///
/// Decoding is deterministic, so every variant is final for the given input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid CBOR: {0}")]
    Cbor(String),

    #[error("input of {len} bytes exceeds maximum of {max}")]
    TooLarge { len: usize, max: usize },

    #[error("expected schema tag {expected}, found {found}")]
    SchemaTag { expected: u64, found: u64 },

    #[error("receipt is not wrapped in a schema tag")]
    NotTagged,

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("field {0} has the wrong type")]
    FieldType(&'static str),

    #[error("field {0} is out of range")]
    IntegerRange(&'static str),

    #[error("field {field} must be {expected} bytes, got {actual}")]
    FixedLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{0} trailing bytes after receipt")]
    TrailingBytes(usize),

    #[error("receipt bytes are not in canonical form")]
    NonCanonical,
}

/// Core errors that can occur during receipt operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("malformed log entry at index {index}: {reason}")]
    MalformedLogEntry { index: usize, reason: String },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl ReceiptError {
    /// Whether the error was caused by bad external input rather than a logic bug.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, ReceiptError::InvariantViolation(_))
    }
}

/// Result type for receipt operations.
pub type Result<T> = std::result::Result<T, ReceiptError>;
