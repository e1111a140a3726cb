//! Logical log entries and the per-handle projection cache.
//!
//! A [`CompactLogEntry`] is the wire-oriented form stored in the record. A
//! [`LogEntry`] is what the rest of the system works with: the address and
//! topics as plain byte sequences. Converting to the compact form checks the
//! fixed sizes, so a caller can never corrupt the canonical record.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{ReceiptError, Result};
use crate::record::{CompactLogEntry, ReceiptRecord};
use crate::types::{Address, HashValue};

/// An event emitted during execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogEntry {
    address: Bytes,
    topics: Vec<Bytes>,
    data: Bytes,
}

impl LogEntry {
    pub fn new(address: impl Into<Bytes>, topics: Vec<Bytes>, data: impl Into<Bytes>) -> Self {
        Self {
            address: address.into(),
            topics,
            data: data.into(),
        }
    }

    /// Build an entry from already fixed-size parts.
    pub fn from_parts(address: Address, topics: &[HashValue], data: impl Into<Bytes>) -> Self {
        Self {
            address: Bytes::copy_from_slice(address.as_bytes()),
            topics: topics
                .iter()
                .map(|t| Bytes::copy_from_slice(t.as_bytes()))
                .collect(),
            data: data.into(),
        }
    }

    pub fn address(&self) -> &Bytes {
        &self.address
    }

    pub fn topics(&self) -> &[Bytes] {
        &self.topics
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Project a compact entry. Always succeeds: compact fields are fixed-size.
    pub fn from_compact(entry: &CompactLogEntry) -> Self {
        Self::from_parts(entry.address, &entry.topics, entry.data.clone())
    }

    /// Convert back to the compact form.
    ///
    /// `index` is the entry's position in the list being written and is only
    /// used for error reporting.
    pub fn to_compact(&self, index: usize) -> Result<CompactLogEntry> {
        let address = Address::try_from(self.address.as_ref()).map_err(|_| {
            ReceiptError::MalformedLogEntry {
                index,
                reason: format!(
                    "address must be {} bytes, got {}",
                    Address::LEN,
                    self.address.len()
                ),
            }
        })?;

        let topics = self
            .topics
            .iter()
            .enumerate()
            .map(|(i, topic)| {
                HashValue::try_from(topic.as_ref()).map_err(|_| ReceiptError::MalformedLogEntry {
                    index,
                    reason: format!(
                        "topic {} must be {} bytes, got {}",
                        i,
                        HashValue::LEN,
                        topic.len()
                    ),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CompactLogEntry {
            address,
            topics,
            data: self.data.clone(),
        })
    }
}

/// Convert a whole list to compact form. All-or-nothing.
pub fn to_compact_entries(entries: &[LogEntry]) -> Result<Vec<CompactLogEntry>> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| entry.to_compact(i))
        .collect()
}

struct Populated {
    /// Storage generation the projection was built from.
    generation: u64,
    entries: Arc<[LogEntry]>,
}

/// Memoized projection of a record's compact log entries.
///
/// The cache is either empty or populated for one storage generation. A
/// populated cache is served only while the generation still matches, so a
/// replacement made through any handle sharing the storage makes it stale.
#[derive(Default)]
pub struct LogCache {
    slot: Mutex<Option<Populated>>,
}

impl LogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the projection for `record`, building it if the cache is empty
    /// or was built for another generation.
    pub fn get_or_populate(&self, generation: u64, record: &ReceiptRecord) -> Result<Arc<[LogEntry]>> {
        let mut slot = self.slot.lock();

        if let Some(populated) = slot.as_ref() {
            if populated.generation == generation {
                if populated.entries.len() != record.log_entries.len() {
                    return Err(ReceiptError::InvariantViolation(format!(
                        "cached {} log entries for generation {}, record holds {}",
                        populated.entries.len(),
                        generation,
                        record.log_entries.len()
                    )));
                }
                return Ok(Arc::clone(&populated.entries));
            }
        }

        let entries: Arc<[LogEntry]> = record.log_entries.iter().map(LogEntry::from_compact).collect();
        tracing::trace!(generation, count = entries.len(), "populated log entry cache");

        *slot = Some(Populated {
            generation,
            entries: Arc::clone(&entries),
        });
        Ok(entries)
    }

    /// Drop any cached projection.
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    pub fn is_populated(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Whether the cache holds a projection built for `generation`.
    pub fn is_current(&self, generation: u64) -> bool {
        matches!(self.slot.lock().as_ref(), Some(p) if p.generation == generation)
    }
}

impl std::fmt::Debug for LogCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.lock();
        match slot.as_ref() {
            Some(p) => f
                .debug_struct("LogCache")
                .field("generation", &p.generation)
                .field("entries", &p.entries.len())
                .finish(),
            None => f.write_str("LogCache(empty)"),
        }
    }
}
