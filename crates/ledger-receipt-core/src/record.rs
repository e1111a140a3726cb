//! ReceiptRecord: the canonical outcome of executing one transaction.
//!
//! The record is plain data. Field shape is enforced by the types (fixed-size
//! address and topics) and by the codec on decode; nothing else is checked here.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::{Address, HashValue};

pub use ruint::aliases::U256;

/// The current receipt schema version.
pub const RECEIPT_VERSION: i32 = 0;

/// A log entry in wire-oriented form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompactLogEntry {
    /// Emitting contract address.
    pub address: Address,
    /// Indexed topics, in emission order.
    pub topics: Vec<HashValue>,
    /// Unindexed payload.
    pub data: Bytes,
}

impl CompactLogEntry {
    pub fn new(address: Address, topics: Vec<HashValue>, data: impl Into<Bytes>) -> Self {
        Self {
            address,
            topics,
            data: data.into(),
        }
    }
}

/// The canonical receipt content every node must agree on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// Schema version of the receipt content.
    pub version: i32,

    /// Gas consumed by the transaction.
    pub gas_used: U256,

    /// Address of the created contract, empty if none was created.
    pub contract_address: String,

    /// Execution status: 0 is success, anything else a failure code.
    pub status: i32,

    /// Return or revert data.
    pub output: Bytes,

    /// Number of the block the transaction was executed in.
    pub block_number: i64,

    /// Emitted logs in compact form.
    pub log_entries: Vec<CompactLogEntry>,
}

impl ReceiptRecord {
    /// Start building a record.
    pub fn builder() -> ReceiptRecordBuilder {
        ReceiptRecordBuilder::default()
    }

    /// Check if the transaction succeeded.
    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// Get the created contract address, if any.
    pub fn created_contract(&self) -> Option<&str> {
        if self.contract_address.is_empty() {
            None
        } else {
            Some(&self.contract_address)
        }
    }
}

/// Builder for assembling a fresh record from execution results.
#[derive(Debug, Clone)]
pub struct ReceiptRecordBuilder {
    record: ReceiptRecord,
}

impl Default for ReceiptRecordBuilder {
    fn default() -> Self {
        Self {
            record: ReceiptRecord {
                version: RECEIPT_VERSION,
                ..ReceiptRecord::default()
            },
        }
    }
}

impl ReceiptRecordBuilder {
    pub fn version(mut self, version: i32) -> Self {
        self.record.version = version;
        self
    }

    pub fn status(mut self, status: i32) -> Self {
        self.record.status = status;
        self
    }

    pub fn gas_used(mut self, gas: impl Into<U256>) -> Self {
        self.record.gas_used = gas.into();
        self
    }

    pub fn contract_address(mut self, address: impl Into<String>) -> Self {
        self.record.contract_address = address.into();
        self
    }

    pub fn output(mut self, output: impl Into<Bytes>) -> Self {
        self.record.output = output.into();
        self
    }

    pub fn block_number(mut self, number: i64) -> Self {
        self.record.block_number = number;
        self
    }

    /// Append a compact log entry.
    pub fn log(mut self, entry: CompactLogEntry) -> Self {
        self.record.log_entries.push(entry);
        self
    }

    pub fn build(self) -> ReceiptRecord {
        self.record
    }
}
