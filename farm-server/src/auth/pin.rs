//! PIN hashing
//!
//! Login works by PIN alone, with no username, so the stored value must be
//! a deterministic lookup key: `sha256(pepper || pin)`, hex-encoded. A
//! salted hash would make the lookup impossible; the server-side pepper
//! keeps the tiny 4-digit space from being trivially reversible from a
//! leaked table alone.

use sha2::{Digest, Sha256};

/// Deterministic peppered digest of a login PIN.
pub fn pin_index(pepper: &str, pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pepper.as_bytes());
    hasher.update(pin.as_bytes());
    hex::encode(hasher.finalize())
}
