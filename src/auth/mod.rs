//! Authentication core for blogd.
//!
//! Password hashing, account registration and credential checks, session
//! token issuance/verification, and resource ownership checks.

mod credentials;
mod error;
mod ownership;
pub mod password;
pub mod token;
pub mod validation;

pub use credentials::{register, verify_credentials, RegistrationRequest};
pub use error::AuthError;
pub use ownership::ensure_owner;
pub use password::{hash_password, validate_password, verify_password, PasswordError};
pub use token::{bearer_token, AuthenticatedIdentity, SessionClaims, TokenAuthority, TokenError};
pub use validation::ValidationError;
