//! Authentication and authorization errors.

use thiserror::Error;

use crate::BlogError;

/// Failures of the authentication core.
///
/// Every variant is scoped to a single request; none is fatal to the process.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown username or wrong password. The two are never distinguished.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("username already exists")]
    DuplicateUsername,

    #[error("email already exists")]
    DuplicateEmail,

    /// Missing, malformed, forged or expired session token.
    #[error("unauthorized")]
    Unauthorized,

    /// Authenticated, but not the owner of the resource.
    #[error("forbidden")]
    Forbidden,

    /// Rejected registration input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Hashing or signing failure. The message is for logs only.
    #[error("internal error: {0}")]
    Internal(String),

    /// Storage failure during lookup or insert.
    #[error(transparent)]
    Store(#[from] BlogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_is_opaque() {
        let msg = AuthError::InvalidCredentials.to_string();
        assert_eq!(msg, "invalid username or password");
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: AuthError = BlogError::Database("disk I/O error".to_string()).into();
        assert_eq!(err.to_string(), "database error: disk I/O error");
    }
}
