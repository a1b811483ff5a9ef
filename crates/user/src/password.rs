use argon2::{
    Argon2, Params,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{UserError, UserResult};

/// Hash a password using Argon2id with OWASP-recommended parameters
/// - Memory: 19456 KB (19 MB)
/// - Iterations: 2
/// - Parallelism: 1
pub fn hash_password(password: &str) -> UserResult<String> {
    let params =
        Params::new(19456, 2, 1, None).map_err(|e| UserError::HashingError(e.to_string()))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| UserError::HashingError(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against an Argon2 hash
pub fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| UserError::HashingError(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
