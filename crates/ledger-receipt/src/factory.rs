//! ReceiptFactory: builds handles bound to one configured hash function.
//!
//! The execution engine and the network layer both create receipts; going
//! through a factory keeps every handle in a node on the same digest and the
//! same decode limit.

use std::sync::Arc;

use ledger_receipt_core::{codec, HashFunction, ReceiptHandle, ReceiptRecord, RecordProvider};

use crate::config::ReceiptConfig;
use crate::error::Result;

/// Creates [`ReceiptHandle`]s for a given configuration.
#[derive(Clone)]
pub struct ReceiptFactory {
    config: ReceiptConfig,
    hasher: Arc<dyn HashFunction>,
}

impl ReceiptFactory {
    /// Create a factory. Fails if the configuration does not validate.
    pub fn new(config: ReceiptConfig) -> Result<Self> {
        config.validate()?;
        let hasher = config.hash_algorithm.hasher();
        Ok(Self { config, hasher })
    }

    pub fn config(&self) -> &ReceiptConfig {
        &self.config
    }

    pub fn hasher(&self) -> &Arc<dyn HashFunction> {
        &self.hasher
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Handle Construction
    // ─────────────────────────────────────────────────────────────────────────

    /// A handle owning fresh storage for `record`.
    pub fn create(&self, record: ReceiptRecord) -> ReceiptHandle {
        self.create_shared(RecordProvider::new(record))
    }

    /// A handle over storage owned elsewhere, such as a containing block.
    ///
    /// The handle's own `decode` applies the configured size limit.
    pub fn create_shared(&self, provider: RecordProvider) -> ReceiptHandle {
        ReceiptHandle::new(Arc::clone(&self.hasher), provider)
            .with_max_encoded_len(self.config.max_encoded_len)
    }

    /// Decode received bytes into a new handle.
    ///
    /// Inputs larger than the configured limit are rejected before parsing.
    pub fn decode(&self, bytes: &[u8]) -> Result<ReceiptHandle> {
        match codec::decode_with_limit(bytes, self.config.max_encoded_len) {
            Ok(record) => Ok(self.create(record)),
            Err(err) => {
                tracing::warn!(len = bytes.len(), error = %err, "rejected receipt bytes");
                Err(err.into())
            }
        }
    }
}

impl std::fmt::Debug for ReceiptFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptFactory")
            .field("hash_algorithm", &self.config.hash_algorithm)
            .field("max_encoded_len", &self.config.max_encoded_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ledger_receipt_core::{DecodeError, EncodeMode, HashAlgorithm, ReceiptError, U256};

    fn record() -> ReceiptRecord {
        ReceiptRecord::builder()
            .gas_used(U256::from(21000u64))
            .block_number(7)
            .build()
    }

    #[test]
    fn test_factory_uses_configured_hasher() {
        for algorithm in [HashAlgorithm::Keccak256, HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
            let factory =
                ReceiptFactory::new(ReceiptConfig::default().with_hash_algorithm(algorithm)).unwrap();
            assert_eq!(factory.hasher().name(), algorithm.name());
            assert_eq!(factory.create(record()).hasher().name(), algorithm.name());
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = ReceiptFactory::new(ReceiptConfig::default().with_max_encoded_len(0));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_decode_roundtrip() {
        let factory = ReceiptFactory::new(ReceiptConfig::default()).unwrap();
        let handle = factory.create(record());
        let decoded = factory.decode(&handle.encode(EncodeMode::Full)).unwrap();
        assert_eq!(decoded.inner(), record());
        assert_eq!(decoded.hash(), handle.hash());
    }

    #[test]
    fn test_decode_respects_limit() {
        let bytes = ledger_receipt_core::encode(&record(), EncodeMode::Full);
        let factory =
            ReceiptFactory::new(ReceiptConfig::default().with_max_encoded_len(bytes.len() - 1))
                .unwrap();

        let err = factory.decode(&bytes).unwrap_err();
        assert_eq!(
            err.as_decode(),
            Some(&DecodeError::TooLarge {
                len: bytes.len(),
                max: bytes.len() - 1
            })
        );
    }

    #[test]
    fn test_created_handles_respect_limit() {
        let large = ReceiptRecord::builder().output(vec![0x42u8; 1024]).build();
        let bytes = ledger_receipt_core::encode(&large, EncodeMode::Full);
        let factory =
            ReceiptFactory::new(ReceiptConfig::default().with_max_encoded_len(64)).unwrap();

        let owned = factory.create(record());
        let shared = factory.create_shared(RecordProvider::new(record()));
        for handle in [&owned, &shared] {
            assert_eq!(handle.max_encoded_len(), 64);
            let err = handle.decode(&bytes).unwrap_err();
            assert!(matches!(
                err,
                ReceiptError::Decode(DecodeError::TooLarge { len, max: 64 }) if len == bytes.len()
            ));
            assert_eq!(handle.inner(), record());
            assert!(handle.output().is_empty());
        }
    }

    #[test]
    fn test_create_shared_observes_owner() {
        let factory = ReceiptFactory::new(ReceiptConfig::default()).unwrap();
        let provider = RecordProvider::new(record());
        let handle = factory.create_shared(provider.clone());

        let mut replacement = record();
        replacement.status = 3;
        provider.replace(replacement);
        assert_eq!(handle.status(), 3);
        assert!(handle.inner_getter().ptr_eq(&provider));
    }
}
