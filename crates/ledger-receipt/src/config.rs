//! Configuration for receipt handling.

use ledger_receipt_core::codec::DEFAULT_MAX_ENCODED_LEN;
use ledger_receipt_core::HashAlgorithm;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a [`crate::ReceiptFactory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    /// Digest used for receipt hashes.
    pub hash_algorithm: HashAlgorithm,
    /// Largest encoded receipt accepted by decode, in bytes.
    pub max_encoded_len: usize,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::Keccak256,
            max_encoded_len: DEFAULT_MAX_ENCODED_LEN,
        }
    }
}

impl ReceiptConfig {
    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    pub fn with_max_encoded_len(mut self, max: usize) -> Self {
        self.max_encoded_len = max;
        self
    }

    /// Check the configuration for values no factory can work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_encoded_len == 0 {
            return Err(Error::Config("max_encoded_len must be greater than zero".into()));
        }
        Ok(())
    }
}
