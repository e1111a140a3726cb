//! Handles observing one storage slot: visibility, cache invalidation, and
//! failure atomicity across handles.

use std::sync::Arc;
use std::thread;

use anyhow::Result;
use bytes::Bytes;
use ledger_receipt::{
    EncodeMode, LogEntry, ReceiptConfig, ReceiptError, ReceiptFactory, ReceiptRecord,
    RecordProvider, U256,
};
use ledger_receipt_testkit::{logical_entry, reverted_deploy_record, scenario_record, ReceiptFixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

#[test]
fn test_replacement_visible_to_every_handle() -> Result<()> {
    init_tracing();
    let fixture = ReceiptFixture::new();
    let handles = fixture.handles(4);

    for handle in &handles {
        assert_eq!(handle.log_entries()?.len(), 1);
        assert!(handle.is_log_cache_populated());
    }

    handles[2].set_inner(reverted_deploy_record());

    for handle in &handles {
        assert_eq!(handle.status(), 16);
        assert_eq!(handle.inner(), reverted_deploy_record());
        assert!(handle.log_entries()?.is_empty());
    }
    Ok(())
}

#[test]
fn test_owner_replacement_invalidates_handle_cache() -> Result<()> {
    init_tracing();
    let factory = ReceiptFactory::new(ReceiptConfig::default())?;
    let owner = RecordProvider::new(scenario_record());
    let handle = factory.create_shared(owner.clone());

    let before = handle.log_entries()?;
    assert_eq!(before.len(), 1);

    let mut record = scenario_record();
    record.log_entries.clear();
    let generation = owner.replace(record);
    assert_eq!(owner.generation(), generation);

    // The stale projection must not be served after the owner replaced the record.
    assert!(!handle.is_log_cache_populated());
    assert!(handle.log_entries()?.is_empty());
    assert!(handle.is_log_cache_populated());
    // Previously returned projections stay intact.
    assert_eq!(before.len(), 1);
    Ok(())
}

#[test]
fn test_set_log_entries_through_one_handle() -> Result<()> {
    init_tracing();
    let fixture = ReceiptFixture::new();
    let writer = fixture.handle();
    let reader = fixture.handle();
    let hash_before = reader.hash();

    reader.log_entries()?;
    let entries = vec![logical_entry(1), logical_entry(2), logical_entry(3)];
    writer.set_log_entries(&entries)?;

    assert_eq!(&reader.log_entries()?[..], &entries[..]);
    assert_eq!(fixture.provider.read().log_entries.len(), 3);
    assert_ne!(reader.hash(), hash_before);
    assert_eq!(reader.hash(), writer.hash());
    Ok(())
}

#[test]
fn test_malformed_entry_leaves_state_unchanged() -> Result<()> {
    init_tracing();
    let fixture = ReceiptFixture::new();
    let handle = fixture.handle();
    let other = fixture.handle();

    let cached = handle.log_entries()?;
    let generation = fixture.provider.generation();
    let hash = handle.hash();

    let short_topic = LogEntry::new(vec![0u8; 20], vec![Bytes::from(vec![0u8; 31])], Bytes::new());
    let err = other
        .set_log_entries(&[logical_entry(1), short_topic])
        .unwrap_err();
    assert!(matches!(err, ReceiptError::MalformedLogEntry { index: 1, .. }));

    let long_address = LogEntry::new(vec![0u8; 21], vec![], Bytes::new());
    assert!(other.set_log_entries(&[long_address]).is_err());

    assert_eq!(fixture.provider.generation(), generation);
    assert_eq!(handle.inner(), scenario_record());
    assert_eq!(handle.hash(), hash);
    assert!(Arc::ptr_eq(&cached, &handle.log_entries()?));
    Ok(())
}

#[test]
fn test_failed_decode_leaves_state_unchanged() -> Result<()> {
    init_tracing();
    let fixture = ReceiptFixture::new();
    let handle = fixture.handle();
    let generation = fixture.provider.generation();

    let mut bytes = handle.encode(EncodeMode::Full);
    bytes.truncate(bytes.len() - 1);
    let err = handle.decode(&bytes).unwrap_err();
    assert!(err.is_input_error());

    assert_eq!(fixture.provider.generation(), generation);
    assert_eq!(handle.inner(), scenario_record());
    Ok(())
}

#[test]
fn test_decode_replaces_shared_record() -> Result<()> {
    init_tracing();
    let fixture = ReceiptFixture::new();
    let handles = fixture.handles(2);

    let bytes = ledger_receipt::core::encode(&reverted_deploy_record(), EncodeMode::Full);
    handles[0].decode(&bytes)?;

    assert_eq!(handles[1].inner(), reverted_deploy_record());
    assert_eq!(handles[1].contract_address(), "0x6849f21d1e455e9f0712b1e99fa4fcd23758e8f1");
    Ok(())
}

#[test]
fn test_rebind_moves_to_new_storage() -> Result<()> {
    let fixture = ReceiptFixture::new();
    let mut handle = fixture.handle();
    handle.log_entries()?;

    let other = RecordProvider::new(ReceiptRecord::default());
    handle.rebind(other.clone());

    assert!(!handle.is_log_cache_populated());
    assert!(handle.inner_getter().ptr_eq(&other));
    assert!(handle.log_entries()?.is_empty());

    // Mutations now land in the new storage only.
    handle.set_inner(reverted_deploy_record());
    assert_eq!(other.snapshot(), reverted_deploy_record());
    assert_eq!(fixture.provider.snapshot(), scenario_record());
    Ok(())
}

#[test]
fn test_concurrent_readers_and_writer() -> Result<()> {
    init_tracing();
    let fixture = ReceiptFixture::new();
    let writer = fixture.handle();
    let readers = fixture.handles(4);

    let workers: Vec<_> = readers
        .into_iter()
        .map(|reader| {
            thread::spawn(move || -> ledger_receipt::core::Result<()> {
                for _ in 0..200 {
                    let logs = reader.log_entries()?;
                    // Every observed projection matches a whole record, never a mix.
                    assert!(logs.len() == 1 || logs.len() == 3, "saw {} entries", logs.len());
                }
                Ok(())
            })
        })
        .collect();

    for i in 0..50u64 {
        let entries = if i % 2 == 0 {
            vec![logical_entry(1), logical_entry(2), logical_entry(3)]
        } else {
            vec![logical_entry(9)]
        };
        writer.set_log_entries(&entries)?;
        let mut record = writer.inner();
        record.gas_used = U256::from(i);
        writer.set_inner(record);
    }

    for worker in workers {
        worker
            .join()
            .map_err(|_| anyhow::anyhow!("reader thread panicked"))??;
    }
    Ok(())
}
