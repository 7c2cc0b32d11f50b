//! SHA-256 fingerprints via `ring::digest`.

use ring::digest::{digest, SHA256};

/// Lowercase hex SHA-256 of `data`.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(digest(&SHA256, data).as_ref())
}
