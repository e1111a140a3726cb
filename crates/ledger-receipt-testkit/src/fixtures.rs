//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use bytes::Bytes;
use ledger_receipt_core::{
    Address, CompactLogEntry, HashAlgorithm, HashFunction, HashValue, LogEntry, ReceiptHandle,
    ReceiptRecord, RecordProvider, U256,
};

/// The reference scenario: one successful transfer with a single two-topic log.
pub fn scenario_record() -> ReceiptRecord {
    ReceiptRecord::builder()
        .version(0)
        .status(0)
        .gas_used(U256::from(21000u64))
        .contract_address("")
        .output(Bytes::new())
        .block_number(100)
        .log(CompactLogEntry::new(
            Address::ZERO,
            vec![HashValue::ZERO, HashValue::from_bytes([0x01; 32])],
            vec![0xAA, 0xBB],
        ))
        .build()
}

/// A failed contract deployment with revert data and no logs.
pub fn reverted_deploy_record() -> ReceiptRecord {
    ReceiptRecord::builder()
        .version(1)
        .status(16)
        .gas_used(U256::from(53000u64))
        .contract_address("0x6849f21d1e455e9f0712b1e99fa4fcd23758e8f1")
        .output(vec![0x08, 0xc3, 0x79, 0xa0])
        .block_number(-1)
        .build()
}

/// A well-formed logical log entry whose bytes are all `tag`.
pub fn logical_entry(tag: u8) -> LogEntry {
    LogEntry::new(
        vec![tag; Address::LEN],
        vec![Bytes::from(vec![tag; HashValue::LEN])],
        vec![tag; 4],
    )
}

/// A hasher and one shared storage slot, for multi-handle scenarios.
pub struct ReceiptFixture {
    pub hasher: Arc<dyn HashFunction>,
    pub provider: RecordProvider,
}

impl ReceiptFixture {
    /// Create a fixture holding the reference scenario, hashed with Keccak-256.
    pub fn new() -> Self {
        Self::with_record(scenario_record())
    }

    pub fn with_record(record: ReceiptRecord) -> Self {
        Self {
            hasher: HashAlgorithm::Keccak256.hasher(),
            provider: RecordProvider::new(record),
        }
    }

    /// A new handle over the fixture's storage.
    pub fn handle(&self) -> ReceiptHandle {
        ReceiptHandle::new(Arc::clone(&self.hasher), self.provider.clone())
    }

    /// `count` handles observing the same storage.
    pub fn handles(&self, count: usize) -> Vec<ReceiptHandle> {
        (0..count).map(|_| self.handle()).collect()
    }
}

impl Default for ReceiptFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_handles_share_storage() {
        let fixture = ReceiptFixture::new();
        let handles = fixture.handles(3);

        handles[0].set_log_entries(&[logical_entry(9)]).unwrap();
        for handle in &handles {
            assert_eq!(handle.log_entries().unwrap().len(), 1);
            assert_eq!(handle.log_entries().unwrap()[0], logical_entry(9));
        }
        assert_eq!(fixture.provider.read().log_entries[0].address, Address::from_bytes([9; 20]));
    }

    #[test]
    fn test_logical_entry_is_well_formed() {
        for tag in [0u8, 1, 0xff] {
            assert!(logical_entry(tag).to_compact(0).is_ok());
        }
    }

    #[test]
    fn test_records_differ() {
        assert_ne!(scenario_record(), reverted_deploy_record());
        assert!(scenario_record().is_success());
        assert!(!reverted_deploy_record().is_success());
    }
}
