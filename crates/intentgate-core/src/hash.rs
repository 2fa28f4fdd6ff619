//! Content hashing — canonical `sha256:<hex>` digests
//!
//! Hashes are the spatial coordinates of the provenance ledger: a region of
//! source is addressed by its digest rather than by line numbers, so edits
//! elsewhere in a file do not invalidate prior references. UTF-8 bytes are
//! hashed as-is, no normalization: byte equality is the contract.

use sha2::{Digest, Sha256};

/// Prefix of every canonical content hash.
pub const HASH_PREFIX: &str = "sha256:";

/// Digest a block of text into its canonical `sha256:<64 hex>` form.
pub fn hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("{}{:x}", HASH_PREFIX, digest)
}

/// Digest a run of lines, joined with `\n`.
pub fn hash_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let joined = lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    hash(&joined)
}

/// Check text against an expected canonical hash.
pub fn verify(text: &str, expected: &str) -> bool {
    hash(text) == expected
}
