// src/backend/utils/crypto.rs
use sha2::{Digest, Sha256};

/// SHA-256 of byte data as a hex string. Used for content checksums and
/// for deriving mock ciphertext handles in native builds.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
