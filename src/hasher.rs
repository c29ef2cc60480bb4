use argon2::Config as ArgonConfig;
#[cfg(test)]
use mockall::automock;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed")]
pub struct HashError(#[from] argon2::Error);

#[cfg_attr(test, automock)]
pub trait PasswordHasher: Send + Sync {
    fn encode(&self, plaintext: &str) -> Result<String, HashError>;

    /// False for a wrong password and for a malformed hash alike.
    fn verify(&self, hash: &str, plaintext: &str) -> bool;
}

/// Argon2 with a random per-password salt, stored in the encoded string.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn encode(&self, plaintext: &str) -> Result<String, HashError> {
        let salt: [u8; 16] = rand::thread_rng().gen();
        let config = ArgonConfig::default();

        Ok(argon2::hash_encoded(plaintext.as_bytes(), &salt, &config)?)
    }

    fn verify(&self, hash: &str, plaintext: &str) -> bool {
        argon2::verify_encoded(hash, plaintext.as_bytes()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_hash_differs_from_plaintext_and_verifies() {
        let hasher = Argon2Hasher;

        let hash = hasher.encode("1234567").unwrap();

        assert_ne!(hash, "1234567");
        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify(&hash, "1234567"));
        assert!(!hasher.verify(&hash, "7654321"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = Argon2Hasher;

        let first = hasher.encode("1234567").unwrap();
        let second = hasher.encode("1234567").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!Argon2Hasher.verify("not-a-hash", "1234567"));
    }
}
