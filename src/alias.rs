//! Storage aliases for field keys.
//!
//! `friends.orderby(importance).first(10)` becomes `_friends_<digest>` where
//! the digest covers the whole input, so keys that differ only in their
//! arguments land in different slots.
use sha2::{Digest, Sha256};

/// Digest bytes kept in the alias (128 bits).
const DIGEST_BYTES: usize = 16;

/// Alias for a serialized field key. Deterministic, matches `^[\w-]+$`, and is
/// never equal to its input.
pub fn generate_alias(input: &str) -> String {
    let name: String = input
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();

    let alias = format!("_{name}_{}", hex::encode(&digest[..DIGEST_BYTES]));
    tracing::trace!(input, alias = %alias, "generated field alias");
    alias
}

// ------------------------------- Tests ------------------------------------ //
