/// Password hashing and registration rules
///
/// Passwords are stored as Argon2id PHC strings. The parameters follow the
/// OWASP minimum for Argon2id (19 MiB memory, 2 passes, 1 lane); they are
/// embedded in every hash, so verification works across parameter changes.
///
/// # Example
///
/// ```
/// use teamtrack_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("sunflower")?;
/// assert!(verify_password("sunflower", &hash)?);
/// assert!(!verify_password("sunflowers", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Shortest accepted password, in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Registration rule violations, with user-facing messages
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordRuleError {
    #[error("Passwords do not match")]
    Mismatch,

    #[error("Password must be at least 6 characters long")]
    TooShort,
}

/// Hashes a password with Argon2id and a random 16-byte salt
///
/// Returns the PHC string, e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(19456)
        .t_cost(2)
        .p_cost(1)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash in constant time
///
/// `Ok(false)` means the password is wrong; `Err` means the stored hash is
/// unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Checks the registration rules: confirmation matches, length at least
/// [`MIN_PASSWORD_LENGTH`] characters
///
/// The match is checked first, so a short mismatching pair reports
/// `Mismatch`.
pub fn validate_password(password: &str, confirm_password: &str) -> Result<(), PasswordRuleError> {
    if password != confirm_password {
        return Err(PasswordRuleError::Mismatch);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordRuleError::TooShort);
    }

    Ok(())
}
