//! User model for blogd.

/// A registered account, as stored.
///
/// Deliberately not `Serialize`: the password hash must not reach a response.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login username (unique).
    pub username: String,
    /// Password hash (Argon2 PHC string).
    pub password: String,
    /// Email address (unique).
    pub email: String,
    /// Account creation timestamp.
    pub created_at: String,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login username.
    pub username: String,
    /// Password hash, already produced by `auth::hash_password`.
    pub password: String,
    /// Email address.
    pub email: String,
}

impl NewUser {
    /// Create a new user record from a username, password hash and email.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password_hash.into(),
            email: email.into(),
        }
    }
}
