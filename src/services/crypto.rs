use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use rand_core::OsRng;

use crate::errors::InternalError;

/// Hash a plaintext password with Argon2id. Only the hash is ever stored;
/// the plaintext never leaves this function.
pub fn hash_password(plain: &str) -> Result<String, InternalError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| InternalError::crypto("argon2_hash", e.to_string()))?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_phc_string() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("correct horse"));
    }

    #[test]
    fn test_hash_password_is_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }
}
