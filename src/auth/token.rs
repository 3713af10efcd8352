//! Session tokens

use rand::distr::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "sessionid";

/// Characters in a session token
pub const SESSION_TOKEN_LENGTH: usize = 32;

/// Generates a new random alphanumeric session token
pub fn generate_session_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Hashes a session token for storage and lookup (hex SHA-256)
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
