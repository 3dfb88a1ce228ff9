//! Password Hashing
//! Mission: One-way credential hashing with per-hash salts

use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

/// Raised only when the underlying hasher cannot produce a digest at all
/// (RNG or resource exhaustion). Treated as an infrastructure fault, never
/// as a user-facing validation failure.
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashingError(#[from] bcrypt::BcryptError);

/// Hash a plaintext password with a fresh random salt.
///
/// Two calls with the same plaintext produce different credentials; the salt
/// and cost factor are embedded in the output string.
pub fn hash_password(plaintext: &str) -> Result<String, HashingError> {
    Ok(hash(plaintext, DEFAULT_COST)?)
}

/// Check a plaintext password against a stored credential.
///
/// Returns false for a wrong password and for a credential that does not
/// parse as a bcrypt hash; malformed stored state must not admit anyone.
pub fn verify_password(credential: &str, plaintext: &str) -> bool {
    verify(plaintext, credential).unwrap_or(false)
}
