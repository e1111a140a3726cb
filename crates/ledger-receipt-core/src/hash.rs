//! Pluggable hash functions and the receipt content hash.
//!
//! The receipt core does not pick a digest. The surrounding system injects a
//! [`HashFunction`], and the receipt hash is `H(encode(record, HashProjection))`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::codec::{encode, EncodeMode};
use crate::record::ReceiptRecord;
use crate::types::HashValue;

/// A 256-bit cryptographic hash function.
pub trait HashFunction: Send + Sync {
    /// Get the name of the hash function.
    fn name(&self) -> &'static str;

    /// Hash input data.
    fn digest(&self, data: &[u8]) -> HashValue;
}

/// Keccak-256 (the pre-standard SHA-3 padding used by Ethereum-style chains).
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256;

impl HashFunction for Keccak256 {
    fn name(&self) -> &'static str {
        "keccak256"
    }

    fn digest(&self, data: &[u8]) -> HashValue {
        HashValue(sha3::Keccak256::digest(data).into())
    }
}

/// SHA-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256;

impl HashFunction for Sha256 {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn digest(&self, data: &[u8]) -> HashValue {
        HashValue(sha2::Sha256::digest(data).into())
    }
}

/// BLAKE3 with 32-byte output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3;

impl HashFunction for Blake3 {
    fn name(&self) -> &'static str {
        "blake3"
    }

    fn digest(&self, data: &[u8]) -> HashValue {
        HashValue(*blake3::hash(data).as_bytes())
    }
}

/// Selector for the built-in hash functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Keccak256,
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    /// Instantiate the selected hash function.
    pub fn hasher(self) -> Arc<dyn HashFunction> {
        match self {
            HashAlgorithm::Keccak256 => Arc::new(Keccak256),
            HashAlgorithm::Sha256 => Arc::new(Sha256),
            HashAlgorithm::Blake3 => Arc::new(Blake3),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Keccak256 => "keccak256",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keccak256" => Ok(HashAlgorithm::Keccak256),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(format!("unknown hash algorithm: {}", other)),
        }
    }
}

/// Compute the content hash of a record.
///
/// Always recomputed from the record as given; there is no hash cache.
pub fn receipt_hash(record: &ReceiptRecord, hasher: &dyn HashFunction) -> HashValue {
    hasher.digest(&encode(record, EncodeMode::HashProjection))
}
