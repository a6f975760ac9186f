//! Content identity for enriched batches. Uploads carrying the same records
//! hash to the same value no matter how the rows are ordered, which is what
//! lets downstream consumers dedupe re-uploads of the same export.

use sha2::{Digest, Sha256};

use crate::pipeline::enrich::EnrichedRecord;

/// Hex SHA-256 over the sorted per-record digests of the batch. Sorting
/// before the final hash makes the fingerprint order-invariant.
pub fn batch_fingerprint(records: &[EnrichedRecord]) -> String {
    let mut digests: Vec<String> = records.iter().map(record_digest).collect();
    digests.sort_unstable();

    let mut hasher = Sha256::new();
    for digest in &digests {
        hasher.update(digest.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

/// Digest of one record's canonical JSON form. Struct field order is fixed
/// by the type, so serialization is canonical without extra work.
fn record_digest(record: &EnrichedRecord) -> String {
    let json = serde_json::to_string(record).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    hex::encode(hasher.finalize())
}
