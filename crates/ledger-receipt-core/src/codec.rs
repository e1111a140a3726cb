//! Canonical CBOR wire codec for receipts.
//!
//! Encoding follows RFC 8949 Core Deterministic Encoding:
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - Map keys are small integers, written in ascending order
//! - No floats
//!
//! Two encodings exist. [`EncodeMode::Full`] is the lossless on-wire form,
//! a tagged map. [`EncodeMode::HashProjection`] is the hashing input, a tagged
//! array with a fixed field order. The tags differ, so the two byte spaces never
//! overlap, and the projection layout can only change by introducing a new tag.
//!
//! **CRITICAL**: Both layouts are FROZEN. Changing either changes every receipt hash.

use ciborium::value::Value;

use crate::error::DecodeError;
use crate::record::{CompactLogEntry, ReceiptRecord, U256};
use crate::types::{Address, HashValue};

/// CBOR tag wrapping the full receipt encoding.
pub const FULL_TAG: u64 = 0x5250;

/// CBOR tag wrapping version 0 of the hash projection.
pub const HASH_PROJECTION_TAG_V0: u64 = 0x5251;

/// Default upper bound on the size of an encoded receipt accepted by [`decode`].
pub const DEFAULT_MAX_ENCODED_LEN: usize = 4 * 1024 * 1024;

/// Byte width of the big-endian gas field.
const GAS_LEN: usize = 32;

/// Full-encoding map keys.
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const VERSION: u64 = 0;
    pub const STATUS: u64 = 1;
    pub const GAS_USED: u64 = 2;
    pub const CONTRACT_ADDRESS: u64 = 3;
    pub const OUTPUT: u64 = 4;
    pub const BLOCK_NUMBER: u64 = 5;
    pub const LOG_ENTRIES: u64 = 6;

    pub const COUNT: u64 = 7;
}

/// Which encoding to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodeMode {
    /// Every field, losslessly. Inverse of [`decode`].
    Full,
    /// The canonical hashing input. Never persisted or transmitted on its own.
    HashProjection,
}

/// Encode a record to canonical bytes.
pub fn encode(record: &ReceiptRecord, mode: EncodeMode) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_into(record, mode, &mut buf);
    buf
}

/// Append the encoding of a record to `buf`.
pub fn encode_into(record: &ReceiptRecord, mode: EncodeMode, buf: &mut Vec<u8>) {
    match mode {
        EncodeMode::Full => encode_full(buf, record),
        EncodeMode::HashProjection => encode_hash_projection(buf, record),
    }
}

fn encode_full(buf: &mut Vec<u8>, record: &ReceiptRecord) {
    encode_uint(buf, 6, FULL_TAG);
    encode_uint(buf, 5, keys::COUNT);

    encode_uint(buf, 0, keys::VERSION);
    encode_int(buf, record.version.into());

    encode_uint(buf, 0, keys::STATUS);
    encode_int(buf, record.status.into());

    encode_uint(buf, 0, keys::GAS_USED);
    encode_gas(buf, &record.gas_used);

    encode_uint(buf, 0, keys::CONTRACT_ADDRESS);
    encode_text(buf, &record.contract_address);

    encode_uint(buf, 0, keys::OUTPUT);
    encode_bytes(buf, &record.output);

    encode_uint(buf, 0, keys::BLOCK_NUMBER);
    encode_int(buf, record.block_number);

    encode_uint(buf, 0, keys::LOG_ENTRIES);
    encode_log_entries(buf, &record.log_entries);
}

/// Version 0 projection: every field participates, in a fixed order.
fn encode_hash_projection(buf: &mut Vec<u8>, record: &ReceiptRecord) {
    encode_uint(buf, 6, HASH_PROJECTION_TAG_V0);
    encode_uint(buf, 4, 7);
    encode_int(buf, record.version.into());
    encode_int(buf, record.status.into());
    encode_gas(buf, &record.gas_used);
    encode_text(buf, &record.contract_address);
    encode_bytes(buf, &record.output);
    encode_int(buf, record.block_number);
    encode_log_entries(buf, &record.log_entries);
}

fn encode_log_entries(buf: &mut Vec<u8>, entries: &[CompactLogEntry]) {
    encode_uint(buf, 4, entries.len() as u64);
    for entry in entries {
        // [address, [topic...], data]
        encode_uint(buf, 4, 3);
        encode_bytes(buf, entry.address.as_bytes());
        encode_uint(buf, 4, entry.topics.len() as u64);
        for topic in &entry.topics {
            encode_bytes(buf, topic.as_bytes());
        }
        encode_bytes(buf, &entry.data);
    }
}

fn encode_gas(buf: &mut Vec<u8>, gas: &U256) {
    encode_bytes(buf, &gas.to_be_bytes::<GAS_LEN>());
}

/// Encode a signed integer (major types 0 and 1).
fn encode_int(buf: &mut Vec<u8>, n: i64) {
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Decode a record from its full encoding.
pub fn decode(bytes: &[u8]) -> Result<ReceiptRecord, DecodeError> {
    decode_with_limit(bytes, DEFAULT_MAX_ENCODED_LEN)
}

/// Decode a record, rejecting inputs longer than `max_len` before parsing.
///
/// Only the exact canonical encoding of a record is accepted: the decoded
/// record is re-encoded and must reproduce `bytes`.
pub fn decode_with_limit(bytes: &[u8], max_len: usize) -> Result<ReceiptRecord, DecodeError> {
    if bytes.len() > max_len {
        return Err(DecodeError::TooLarge {
            len: bytes.len(),
            max: max_len,
        });
    }

    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| DecodeError::Cbor(e.to_string()))?;
    let record = value_to_record(&value)?;

    let canonical = encode(&record, EncodeMode::Full);
    if canonical.as_slice() != bytes {
        if bytes.len() > canonical.len() && bytes.starts_with(&canonical) {
            return Err(DecodeError::TrailingBytes(bytes.len() - canonical.len()));
        }
        return Err(DecodeError::NonCanonical);
    }

    Ok(record)
}

/// Convert a tagged CBOR map back to a record.
fn value_to_record(value: &Value) -> Result<ReceiptRecord, DecodeError> {
    let inner = match value {
        Value::Tag(FULL_TAG, inner) => inner.as_ref(),
        Value::Tag(found, _) => {
            return Err(DecodeError::SchemaTag {
                expected: FULL_TAG,
                found: *found,
            })
        }
        _ => return Err(DecodeError::NotTagged),
    };

    let map = match inner {
        Value::Map(m) => m,
        _ => return Err(DecodeError::FieldType("receipt")),
    };

    let get = |key: u64, name: &'static str| -> Result<&Value, DecodeError> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == i128::from(key)))
            .map(|(_, v)| v)
            .ok_or(DecodeError::MissingField(name))
    };

    let version = read_i32(get(keys::VERSION, "version")?, "version")?;
    let status = read_i32(get(keys::STATUS, "status")?, "status")?;

    let gas_bytes: [u8; GAS_LEN] = read_fixed(get(keys::GAS_USED, "gas_used")?, "gas_used")?;
    let gas_used = U256::from_be_bytes(gas_bytes);

    let contract_address = match get(keys::CONTRACT_ADDRESS, "contract_address")? {
        Value::Text(s) => s.clone(),
        _ => return Err(DecodeError::FieldType("contract_address")),
    };

    let output = match get(keys::OUTPUT, "output")? {
        Value::Bytes(b) => b.clone().into(),
        _ => return Err(DecodeError::FieldType("output")),
    };

    let block_number = match get(keys::BLOCK_NUMBER, "block_number")? {
        Value::Integer(i) => i64::try_from(i128::from(*i))
            .map_err(|_| DecodeError::IntegerRange("block_number"))?,
        _ => return Err(DecodeError::FieldType("block_number")),
    };

    let log_entries = match get(keys::LOG_ENTRIES, "log_entries")? {
        Value::Array(arr) => arr
            .iter()
            .map(value_to_log_entry)
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(DecodeError::FieldType("log_entries")),
    };

    Ok(ReceiptRecord {
        version,
        gas_used,
        contract_address,
        status,
        output,
        block_number,
        log_entries,
    })
}

fn value_to_log_entry(value: &Value) -> Result<CompactLogEntry, DecodeError> {
    let fields = match value {
        Value::Array(fields) if fields.len() == 3 => fields,
        _ => return Err(DecodeError::FieldType("log_entry")),
    };

    let address = Address::from_bytes(read_fixed(&fields[0], "log_entry.address")?);

    let topics = match &fields[1] {
        Value::Array(items) => items
            .iter()
            .map(|t| read_fixed(t, "log_entry.topic").map(HashValue::from_bytes))
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(DecodeError::FieldType("log_entry.topics")),
    };

    let data = match &fields[2] {
        Value::Bytes(b) => b.clone().into(),
        _ => return Err(DecodeError::FieldType("log_entry.data")),
    };

    Ok(CompactLogEntry {
        address,
        topics,
        data,
    })
}

fn read_i32(value: &Value, field: &'static str) -> Result<i32, DecodeError> {
    match value {
        Value::Integer(i) => {
            i32::try_from(i128::from(*i)).map_err(|_| DecodeError::IntegerRange(field))
        }
        _ => Err(DecodeError::FieldType(field)),
    }
}

/// Read a byte string that must be exactly `N` bytes.
fn read_fixed<const N: usize>(value: &Value, field: &'static str) -> Result<[u8; N], DecodeError> {
    match value {
        Value::Bytes(b) => b.as_slice().try_into().map_err(|_| DecodeError::FixedLength {
            field,
            expected: N,
            actual: b.len(),
        }),
        _ => Err(DecodeError::FieldType(field)),
    }
}
