//! # Ledger Receipt Testkit
//!
//! Testing utilities for ledger receipts.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known records with their expected encodings and hashes
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Ready-made records, log entries, and handles
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the wire format and hash projection across releases and
//! across independent implementations:
//!
//! ```rust
//! use ledger_receipt_testkit::vectors::{all_vectors, verify_all_vectors};
//!
//! for (name, ok, detail) in verify_all_vectors() {
//!     assert!(ok, "{}: {}", name, detail);
//! }
//! assert!(!all_vectors().is_empty());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ledger_receipt_core::{decode, encode, EncodeMode};
//! use ledger_receipt_testkit::generators::receipt_record;
//!
//! proptest! {
//!     #[test]
//!     fn full_roundtrip(record in receipt_record()) {
//!         let bytes = encode(&record, EncodeMode::Full);
//!         prop_assert_eq!(decode(&bytes).unwrap(), record);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{logical_entry, reverted_deploy_record, scenario_record, ReceiptFixture};
pub use generators::{compact_log_entry, logical_log_entry, receipt_record};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
