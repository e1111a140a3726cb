//! # Ledger Receipt Core
//!
//! Pure primitives for transaction receipts: the canonical record, its wire
//! codec, the logical log-entry projection, and content hashing.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over the receipt data that every node must agree on byte for byte.
//!
//! ## Key Types
//!
//! - [`ReceiptRecord`] - The canonical, compact data holder
//! - [`ReceiptHandle`] - The externally used view over shared record storage
//! - [`RecordProvider`] - Shared storage slot a handle resolves its record through
//! - [`LogEntry`] - Logical log entry served by the handle's lazy projection
//! - [`HashFunction`] - Pluggable digest used to compute the receipt hash
//!
//! ## Canonicalization
//!
//! Receipts are encoded using deterministic CBOR. See the [`codec`] module.

pub mod codec;
pub mod error;
pub mod handle;
pub mod hash;
pub mod log_entry;
pub mod record;
pub mod types;

pub use codec::{decode, encode, encode_into, EncodeMode, FULL_TAG, HASH_PROJECTION_TAG_V0};
pub use error::{DecodeError, ReceiptError, Result};
pub use handle::{ReceiptHandle, RecordProvider};
pub use hash::{receipt_hash, Blake3, HashAlgorithm, HashFunction, Keccak256, Sha256};
pub use log_entry::{LogCache, LogEntry};
pub use record::{CompactLogEntry, ReceiptRecord, ReceiptRecordBuilder, U256};
pub use types::{Address, HashValue};
