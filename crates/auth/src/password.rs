//! Password digests (Argon2id, PHC string format).

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use thiserror::Error;

use paddock_core::DomainError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("salt generation failed: {0}")]
    Salt(String),

    #[error("hashing failed: {0}")]
    Hash(String),
}

impl From<HashError> for DomainError {
    fn from(value: HashError) -> Self {
        DomainError::storage(value.to_string())
    }
}

/// Black-box `hash(password) -> digest` / `verify(digest, password) -> bool`.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// Returns `false` for a wrong password *and* for an unparseable digest.
    fn verify(&self, digest: &str, password: &str) -> bool;
}

/// Argon2 with the crate's default parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes).map_err(|e| HashError::Salt(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| HashError::Salt(e.to_string()))?;
        let phc = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashError::Hash(e.to_string()))?
            .to_string();
        Ok(phc)
    }

    fn verify(&self, digest: &str, password: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_never_contains_plaintext() {
        let hasher = Argon2Hasher::new();
        let digest = hasher.hash("correct horse battery").unwrap();
        assert!(digest.starts_with("$argon2"));
        assert!(!digest.contains("correct horse battery"));
    }

    #[test]
    fn verify_accepts_only_the_original_password() {
        let hasher = Argon2Hasher::new();
        let digest = hasher.hash("s3cret-pass").unwrap();
        assert!(hasher.verify(&digest, "s3cret-pass"));
        assert!(!hasher.verify(&digest, "s3cret-pasS"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = Argon2Hasher::new();
        assert_ne!(hasher.hash("same-password").unwrap(), hasher.hash("same-password").unwrap());
    }

    #[test]
    fn garbage_digest_does_not_verify() {
        assert!(!Argon2Hasher::new().verify("plaintext-in-db", "plaintext-in-db"));
    }
}
