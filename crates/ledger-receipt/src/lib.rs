//! # Ledger Receipt
//!
//! The unified API for transaction receipts: the record a ledger node produces
//! after executing a transaction, its canonical wire form, and its content hash.
//!
//! ## Overview
//!
//! - **Records**: Compact, canonical receipt data (status, gas, output, logs)
//! - **Encoding**: Deterministic CBOR with a full form and a hash projection
//! - **Hashing**: Pluggable digest over the hash projection (Keccak-256 by default)
//! - **Handles**: Views over shared record storage with a lazily built log projection
//!
//! ## Key Concepts
//!
//! - **Full encoding**: What goes on the wire and to disk. Strictly decoded.
//! - **Hash projection**: The byte sequence the content hash is taken over.
//!   It has its own schema tag so the two forms can never be confused.
//! - **Shared storage**: Several handles (and an owning block) may observe one
//!   record. A replacement through any of them is seen by all of them.
//!
//! ## Usage
//!
//! ```rust
//! use ledger_receipt::{EncodeMode, ReceiptConfig, ReceiptFactory, ReceiptRecord, U256};
//!
//! let factory = ReceiptFactory::new(ReceiptConfig::default()).unwrap();
//!
//! let record = ReceiptRecord::builder()
//!     .gas_used(U256::from(21000u64))
//!     .block_number(100)
//!     .build();
//! let handle = factory.create(record);
//!
//! // Ship the canonical bytes and rebuild the receipt elsewhere.
//! let bytes = handle.encode(EncodeMode::Full);
//! let received = factory.decode(&bytes).unwrap();
//! assert_eq!(received.hash(), handle.hash());
//! ```
//!
//! ## Re-exports
//!
//! - `ledger_receipt::core` - Records, codec, hashing, and handles

pub mod config;
pub mod error;
pub mod factory;

// Re-export component crates
pub use ledger_receipt_core as core;

// Re-export main types for convenience
pub use config::ReceiptConfig;
pub use error::{Error, Result};
pub use factory::ReceiptFactory;

// Re-export commonly used core types
pub use ledger_receipt_core::{
    Address, CompactLogEntry, DecodeError, EncodeMode, HashAlgorithm, HashFunction, HashValue,
    LogEntry, ReceiptError, ReceiptHandle, ReceiptRecord, ReceiptRecordBuilder, RecordProvider,
    U256,
};
