//! ReceiptHandle: the externally visible view over receipt storage.
//!
//! A handle does not own its record. It resolves it through a
//! [`RecordProvider`], a reference-counted storage slot that may be shared by
//! several handles and by an external owner such as a containing block.
//!
//! ## Aliasing contract
//!
//! - Any holder of a provider may read the record.
//! - Every replacement bumps the slot's generation. A handle serves its cached
//!   log projection only while the generation it was built from is current, so
//!   a mutation through one handle invalidates the caches of all handles that
//!   observe the same storage.
//! - Storage and cache are each behind a lock, so handles are `Send + Sync`.
//!   Locks are always taken storage first, cache second.
//! - [`RecordProvider::read`] returns a guard over the storage lock. While a
//!   thread holds it, any mutation of the same storage from that thread
//!   (`set_inner`, `set_log_entries`, `decode`, [`RecordProvider::replace`])
//!   deadlocks. Drop the guard first, or use [`RecordProvider::snapshot`].

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

use crate::codec::{self, EncodeMode, DEFAULT_MAX_ENCODED_LEN};
use crate::error::Result;
use crate::hash::{receipt_hash, HashFunction};
use crate::log_entry::{to_compact_entries, LogCache, LogEntry};
use crate::record::{ReceiptRecord, U256};
use crate::types::HashValue;

#[derive(Debug, Default)]
struct Slot {
    record: ReceiptRecord,
    generation: u64,
}

/// Shared storage slot for one receipt record.
///
/// Cloning a provider shares the storage; it never copies the record.
#[derive(Clone, Default)]
pub struct RecordProvider {
    slot: Arc<RwLock<Slot>>,
}

impl RecordProvider {
    pub fn new(record: ReceiptRecord) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Slot {
                record,
                generation: 0,
            })),
        }
    }

    /// Borrow the current record. Writers block while the guard is held, so
    /// it must be dropped before mutating the same storage.
    pub fn read(&self) -> MappedRwLockReadGuard<'_, ReceiptRecord> {
        RwLockReadGuard::map(self.slot.read(), |slot| &slot.record)
    }

    /// Clone the current record.
    pub fn snapshot(&self) -> ReceiptRecord {
        self.slot.read().record.clone()
    }

    /// Number of replacements made so far.
    pub fn generation(&self) -> u64 {
        self.slot.read().generation
    }

    /// Replace the whole record. Returns the new generation.
    pub fn replace(&self, record: ReceiptRecord) -> u64 {
        self.update(|current| *current = record)
    }

    /// Whether two providers resolve to the same storage.
    pub fn ptr_eq(&self, other: &RecordProvider) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }

    fn update(&self, f: impl FnOnce(&mut ReceiptRecord)) -> u64 {
        let mut slot = self.slot.write();
        f(&mut slot.record);
        slot.generation = slot.generation.wrapping_add(1);
        slot.generation
    }
}

impl fmt::Debug for RecordProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordProvider")
            .field("generation", &self.generation())
            .field("holders", &Arc::strong_count(&self.slot))
            .finish()
    }
}

/// Accessor and mutator surface for one receipt.
pub struct ReceiptHandle {
    hasher: Arc<dyn HashFunction>,
    provider: RecordProvider,
    logs: LogCache,
    max_encoded_len: usize,
}

impl ReceiptHandle {
    /// Create a handle over existing storage.
    pub fn new(hasher: Arc<dyn HashFunction>, provider: RecordProvider) -> Self {
        Self {
            hasher,
            provider,
            logs: LogCache::new(),
            max_encoded_len: DEFAULT_MAX_ENCODED_LEN,
        }
    }

    /// Limit the size of inputs accepted by [`ReceiptHandle::decode`].
    pub fn with_max_encoded_len(mut self, max: usize) -> Self {
        self.max_encoded_len = max;
        self
    }

    /// Create a handle that exclusively owns fresh storage for `record`.
    pub fn from_record(hasher: Arc<dyn HashFunction>, record: ReceiptRecord) -> Self {
        Self::new(hasher, RecordProvider::new(record))
    }

    /// Create a handle from received bytes.
    pub fn from_bytes(hasher: Arc<dyn HashFunction>, bytes: &[u8]) -> Result<Self> {
        let record = codec::decode(bytes)?;
        Ok(Self::from_record(hasher, record))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn version(&self) -> i32 {
        self.provider.read().version
    }

    pub fn gas_used(&self) -> U256 {
        self.provider.read().gas_used
    }

    pub fn contract_address(&self) -> String {
        self.provider.read().contract_address.clone()
    }

    pub fn status(&self) -> i32 {
        self.provider.read().status
    }

    pub fn output(&self) -> Bytes {
        self.provider.read().output.clone()
    }

    pub fn block_number(&self) -> i64 {
        self.provider.read().block_number
    }

    /// The logical log entries.
    ///
    /// The projection is built on the first call after construction or after
    /// the last replacement, then served from the cache.
    pub fn log_entries(&self) -> Result<Arc<[LogEntry]>> {
        let slot = self.provider.slot.read();
        self.logs.get_or_populate(slot.generation, &slot.record)
    }

    /// Content hash of the current record. Recomputed on every call.
    pub fn hash(&self) -> HashValue {
        receipt_hash(&self.provider.read(), self.hasher.as_ref())
    }

    pub fn encode(&self, mode: EncodeMode) -> Vec<u8> {
        codec::encode(&self.provider.read(), mode)
    }

    pub fn encode_into(&self, mode: EncodeMode, buf: &mut Vec<u8>) {
        codec::encode_into(&self.provider.read(), mode, buf)
    }

    /// Clone of the underlying record.
    pub fn inner(&self) -> ReceiptRecord {
        self.provider.snapshot()
    }

    /// The provider this handle resolves its record through.
    pub fn inner_getter(&self) -> &RecordProvider {
        &self.provider
    }

    pub fn hasher(&self) -> &Arc<dyn HashFunction> {
        &self.hasher
    }

    pub fn max_encoded_len(&self) -> usize {
        self.max_encoded_len
    }

    /// Whether the next [`ReceiptHandle::log_entries`] call is served from the
    /// cache. A projection built before the storage was last replaced does not count.
    pub fn is_log_cache_populated(&self) -> bool {
        let slot = self.provider.slot.read();
        self.logs.is_current(slot.generation)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutators
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the entire underlying record.
    pub fn set_inner(&self, record: ReceiptRecord) {
        let generation = self.provider.replace(record);
        self.logs.clear();
        tracing::debug!(generation, "replaced receipt record");
    }

    /// Replace the record with one decoded from `bytes`.
    ///
    /// Inputs larger than [`ReceiptHandle::max_encoded_len`] are rejected before
    /// parsing. On failure the current record is left untouched.
    pub fn decode(&self, bytes: &[u8]) -> Result<()> {
        let record = codec::decode_with_limit(bytes, self.max_encoded_len)?;
        self.set_inner(record);
        Ok(())
    }

    /// Replace the log entries, rewriting the compact form immediately.
    ///
    /// Every entry is checked before anything is written, so a malformed entry
    /// leaves both the record and the cache as they were.
    pub fn set_log_entries(&self, entries: &[LogEntry]) -> Result<()> {
        let compact = to_compact_entries(entries)?;
        let count = compact.len();
        let generation = self.provider.update(|record| record.log_entries = compact);
        self.logs.clear();
        tracing::debug!(generation, count, "rewrote receipt log entries");
        Ok(())
    }

    /// Point this handle at different storage.
    pub fn rebind(&mut self, provider: RecordProvider) {
        self.provider = provider;
        self.logs.clear();
    }
}

impl Clone for ReceiptHandle {
    /// A new handle over the same storage, with its own empty cache.
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.hasher), self.provider.clone())
            .with_max_encoded_len(self.max_encoded_len)
    }
}

impl fmt::Debug for ReceiptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiptHandle")
            .field("hasher", &self.hasher.name())
            .field("provider", &self.provider)
            .field("logs", &self.logs)
            .field("max_encoded_len", &self.max_encoded_len)
            .finish()
    }
}
