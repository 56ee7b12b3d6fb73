//! Password hashing for stored user credentials
//!
//! Plain passwords arrive wrapped in `SecretString` and only leave that
//! wrapper inside the blocking hash task. The resulting argon2 PHC string
//! is what lands in `users.password_hash`; nothing ever serializes it back.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use secrecy::{ExposeSecret, SecretString};

/// Argon2id hashing with a fresh random salt per call
pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash on the blocking pool so request workers stay responsive
    pub async fn hash_async(password: SecretString) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(password.expose_secret()))
            .await
            .map_err(|e| anyhow!("Task join error: {}", e))?
    }

    /// Check a plain password against a stored PHC string
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| anyhow!("Invalid hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = PasswordService::hash("hunter2hunter2").unwrap();

        assert_ne!(hash, "hunter2hunter2");
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify("hunter2hunter2", &hash).unwrap());
        assert!(!PasswordService::verify("hunter3", &hash).unwrap());
    }

    #[test]
    fn test_salt_differs_between_hashes() {
        let first = PasswordService::hash("same_password").unwrap();
        let second = PasswordService::hash("same_password").unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_hash_async_from_secret() {
        let secret = SecretString::new("pa55word!".to_string());
        let hash = PasswordService::hash_async(secret).await.unwrap();

        assert!(PasswordService::verify("pa55word!", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(PasswordService::verify("anything", "not-a-phc-string").is_err());
    }
}
