//! Golden test vectors for deterministic verification.
//!
//! Every implementation must produce these exact bytes and digests. A change
//! here means a wire-format or hash-projection change and needs a new schema tag.

use serde::Serialize;

use ledger_receipt_core::{
    decode, encode, receipt_hash, EncodeMode, HashFunction, Keccak256, ReceiptRecord, Sha256,
};

use crate::fixtures::{reverted_deploy_record, scenario_record};

/// A golden test vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub description: &'static str,
    pub record: ReceiptRecord,
    /// Expected `encode(record, Full)` (hex).
    pub full: &'static str,
    /// Expected `encode(record, HashProjection)` (hex).
    pub hash_projection: &'static str,
    /// Expected Keccak-256 receipt hash (hex).
    pub keccak256: &'static str,
    /// Expected SHA-256 receipt hash (hex).
    pub sha256: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "transfer_with_log",
            description: "Successful call at block 100 emitting one log with two topics",
            record: scenario_record(),
            full: "d95250a7000001000258200000000000000000000000000000000000000000000000000000000000\
                   00520803600440051864068183540000000000000000000000000000000000000000825820000000\
                   00000000000000000000000000000000000000000000000000000000005820010101010101010101\
                   010101010101010101010101010101010101010101010142aabb",
            hash_projection: "d9525187000058200000000000000000000000000000000000000000000000000000000000005208\
                              60401864818354000000000000000000000000000000000000000082582000000000000000000000\
                              00000000000000000000000000000000000000000000582001010101010101010101010101010101\
                              0101010101010101010101010101010142aabb",
            keccak256: "1adbc77248493ad7b0bb1bad7481c0f4f0c9b867ab3991a1a15cfb9263ea6146",
            sha256: "632b47b9cc876c95f9115779faf156b17d09ad476dcb03ca85069d1fb598af6e",
        },
        GoldenVector {
            name: "empty",
            description: "All-default record",
            record: ReceiptRecord::default(),
            full: "d95250a7000001000258200000000000000000000000000000000000000000000000000000000000\
                   0000000360044005000680",
            hash_projection: "d9525187000058200000000000000000000000000000000000000000000000000000000000000000\
                              60400080",
            keccak256: "9e4c729a2074059e8e96a706cc18e24fe27ad69cd377be58704392172fcfe8cd",
            sha256: "bf5eb73a49969b314f36287dfaad5919300e19699b4c8894df9a738c0f7e3438",
        },
        GoldenVector {
            name: "reverted_deploy",
            description: "Failed deployment: nonzero status, contract address, revert data, negative block",
            record: reverted_deploy_record(),
            full: "d95250a7000101100258200000000000000000000000000000000000000000000000000000000000\
                   00cf0803782a30783638343966323164316534353565396630373132623165393966613466636432\
                   3337353865386631044408c379a005200680",
            hash_projection: "d952518701105820000000000000000000000000000000000000000000000000000000000000cf08\
                              782a3078363834396632316431653435356539663037313262316539396661346663643233373538\
                              653866314408c379a02080",
            keccak256: "5d1844a3123b00e6a086840b8f6dec72668a8ab422ca8edf26f172624e6506f2",
            sha256: "814211bf7f28862ed3ec038f8bddfc5e032ebae568026ab214ad159bd90632d8",
        },
    ]
}

/// Strip the whitespace used to wrap long hex literals.
pub fn normalize_hex(hex: &str) -> String {
    hex.chars().filter(|c| !c.is_whitespace()).collect()
}

fn check_vector(v: &GoldenVector) -> Result<(), String> {
    let full = hex::encode(encode(&v.record, EncodeMode::Full));
    if full != normalize_hex(v.full) {
        return Err(format!("full encoding mismatch: got {}", full));
    }

    let projection = hex::encode(encode(&v.record, EncodeMode::HashProjection));
    if projection != normalize_hex(v.hash_projection) {
        return Err(format!("hash projection mismatch: got {}", projection));
    }

    let decoded = decode(&hex::decode(&full).map_err(|e| e.to_string())?)
        .map_err(|e| format!("decode failed: {}", e))?;
    if decoded != v.record {
        return Err("decoded record differs".into());
    }

    let checks: [(&dyn HashFunction, &str); 2] = [(&Keccak256, v.keccak256), (&Sha256, v.sha256)];
    for (hasher, expected) in checks {
        let got = receipt_hash(&v.record, hasher).to_hex();
        if got != expected {
            return Err(format!("{} mismatch: got {}", hasher.name(), got));
        }
    }

    Ok(())
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, detail)` per vector; `detail` explains a mismatch.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| match check_vector(v) {
            Ok(()) => (v.name.to_string(), true, String::new()),
            Err(detail) => (v.name.to_string(), false, detail),
        })
        .collect()
}

/// Render all vectors as pretty JSON for other implementations.
pub fn vectors_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&all_vectors())
}
