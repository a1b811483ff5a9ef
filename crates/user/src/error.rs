use thiserror::Error;

/// Domain-specific errors for user operations
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result type for user operations that may fail with UserError
pub type UserResult<T> = Result<T, UserError>;
