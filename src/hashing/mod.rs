//! BLAKE3 keys for memoized query vectors.
//!
//! Keys are computed over the exact query bytes. No trimming or case folding is
//! applied, so `"Knee"` and `"knee "` are distinct entries.

/// Returns the 32-byte BLAKE3 digest of `text`.
#[inline]
pub fn hash_query(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Returns a short hex prefix of a key, for log fields.
pub fn key_prefix(key: &[u8; 32]) -> String {
    key[..4].iter().map(|b| format!("{:02x}", b)).collect()
}
