//! Proptest generators for property-based testing.

use bytes::Bytes;
use proptest::prelude::*;

use ledger_receipt_core::{Address, CompactLogEntry, HashValue, LogEntry, ReceiptRecord, U256};

/// Generate a random 20-byte address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from_bytes)
}

/// Generate a random 32-byte hash value.
pub fn hash_value() -> impl Strategy<Value = HashValue> {
    any::<[u8; 32]>().prop_map(HashValue::from_bytes)
}

/// Generate a gas amount, biased towards small values but covering the full range.
pub fn gas() -> impl Strategy<Value = U256> {
    prop_oneof![
        3 => any::<u64>().prop_map(U256::from),
        1 => any::<[u8; 32]>().prop_map(U256::from_be_bytes),
    ]
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..=max_len).prop_map(Bytes::from)
}

/// Generate a contract address string: empty, hex, or arbitrary text.
pub fn contract_address() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "0x[0-9a-f]{40}",
        ".{0,24}",
    ]
}

/// Generate a compact log entry with up to four topics.
pub fn compact_log_entry() -> impl Strategy<Value = CompactLogEntry> {
    (address(), prop::collection::vec(hash_value(), 0..=4), payload(64))
        .prop_map(|(address, topics, data)| CompactLogEntry { address, topics, data })
}

/// Generate a logical log entry that converts cleanly to compact form.
pub fn logical_log_entry() -> impl Strategy<Value = LogEntry> {
    compact_log_entry().prop_map(|entry| LogEntry::from_compact(&entry))
}

/// Generate an arbitrary record.
pub fn receipt_record() -> impl Strategy<Value = ReceiptRecord> {
    (
        any::<i32>(),
        gas(),
        contract_address(),
        any::<i32>(),
        payload(128),
        any::<i64>(),
        prop::collection::vec(compact_log_entry(), 0..=4),
    )
        .prop_map(
            |(version, gas_used, contract_address, status, output, block_number, log_entries)| {
                ReceiptRecord {
                    version,
                    gas_used,
                    contract_address,
                    status,
                    output,
                    block_number,
                    log_entries,
                }
            },
        )
}
