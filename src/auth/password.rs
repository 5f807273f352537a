//! bcrypt hashes for user passwords and client secrets (`$2b$<cost>$...`).

use bcrypt::{hash, verify, DEFAULT_COST};

use super::AuthError;

/// Hash a password or client secret for storage
pub fn hash_secret(secret: &str) -> Result<String, AuthError> {
    hash_secret_with_cost(secret, DEFAULT_COST)
}

fn hash_secret_with_cost(secret: &str, cost: u32) -> Result<String, AuthError> {
    Ok(hash(secret, cost)?)
}

/// Compare `secret` against a stored hash. Malformed hashes never match.
pub fn verify_secret(secret: &str, stored: &str) -> bool {
    match verify(secret, stored) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::debug!("Unusable stored hash: {}", e);
            false
        }
    }
}
