/// Account password hashing (Argon2id)
///
/// Stored hashes are PHC strings, so the algorithm, parameters and salt travel
/// with the hash and `verify_password` needs nothing else.
///
/// # Parameters
///
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// # Example
///
/// ```
/// use coronablog_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Secret123")?;
/// assert!(verify_password("Secret123", &hash)?);
/// assert!(!verify_password("secret123", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, ParamsBuilder, Version,
};

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// The stored value is not a parseable PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = ParamsBuilder::new()
        .m_cost(65536)
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with a fresh random salt
///
/// # Returns
///
/// A PHC string such as:
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>
/// ```
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Checks a candidate password against a stored hash
///
/// Returns `Ok(false)` on mismatch. Errors are reserved for hashes that cannot
/// be parsed or verified at all.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Registration password rules
///
/// At least 8 characters with an uppercase letter, a lowercase letter and a
/// digit. Returns the first rule the password breaks.
///
/// ```
/// use coronablog_shared::auth::password::validate_password_strength;
///
/// assert!(validate_password_strength("Corona2020").is_ok());
/// assert!(validate_password_strength("corona2020").is_err());
/// ```
pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 8 characters long");
    }

    if !password.chars().any(char::is_uppercase) {
        return Err("Password must contain at least one uppercase letter");
    }

    if !password.chars().any(char::is_lowercase) {
        return Err("Password must contain at least one lowercase letter");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_format() {
        let hash = hash_password("Secret123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let hash1 = hash_password("Secret123").expect("Hash 1 should succeed");
        let hash2 = hash_password("Secret123").expect("Hash 2 should succeed");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("Secret123").expect("Hash should succeed");

        assert!(verify_password("Secret123", &hash).unwrap());
        assert!(!verify_password("Secret124", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_unparseable_hash() {
        assert!(matches!(
            verify_password("Secret123", "plaintext"),
            Err(PasswordError::InvalidHash(_))
        ));
        assert!(verify_password("Secret123", "$argon2id$invalid").is_err());
    }

    #[test]
    fn test_unicode_password_roundtrip() {
        let hash = hash_password("Şifre2020ğü").expect("Hash should succeed");
        assert!(verify_password("Şifre2020ğü", &hash).unwrap());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password_strength("Corona2020").is_ok());
        assert!(validate_password_strength("Abcdefg1").is_ok());

        assert_eq!(
            validate_password_strength("Abc1"),
            Err("Password must be at least 8 characters long")
        );
        assert!(validate_password_strength("lowercase1")
            .unwrap_err()
            .contains("uppercase"));
        assert!(validate_password_strength("UPPERCASE1")
            .unwrap_err()
            .contains("lowercase"));
        assert!(validate_password_strength("NoDigitsHere")
            .unwrap_err()
            .contains("digit"));
    }

    #[test]
    fn test_special_characters_are_optional() {
        assert!(validate_password_strength("NoSpecial123").is_ok());
    }
}
