use sha2::{Digest, Sha256};

/// Truncated hex sha256 over `input`. The truncation width is part of the
/// identity: two callers hashing the same content with different widths do
/// not produce interchangeable keys.
pub fn content_hash(input: &str, len: usize) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(len);
    hash
}
