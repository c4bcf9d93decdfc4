//! User repository for blogd.
//!
//! `CredentialStore` is the narrow contract the authentication core needs;
//! `UserRepository` implements it over SQLite.

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;

use super::user::{NewUser, User};
use crate::{BlogError, Result};

/// Column whose UNIQUE constraint rejected an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

/// Errors from credential store writes.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A concurrent insert won the race on a unique column.
    #[error("unique constraint violated on {0:?}")]
    ConstraintViolation(UniqueField),

    /// Any other storage failure.
    #[error(transparent)]
    Database(#[from] BlogError),
}

/// Credential lookups and inserts used by registration and login.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Find a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert a user, returning its new ID.
    async fn create(&self, new_user: &NewUser) -> std::result::Result<i64, StoreError>;
}

const USER_COLUMNS: &str = "id, username, password, email, created_at";

/// Map an insert error to a constraint violation when SQLite reports one.
fn classify_insert_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            if message.contains("users.username") {
                return StoreError::ConstraintViolation(UniqueField::Username);
            }
            if message.contains("users.email") {
                return StoreError::ConstraintViolation(UniqueField::Email);
            }
        }
    }
    StoreError::Database(e.into())
}

/// Repository for user records.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl CredentialStore for UserRepository<'_> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, new_user: &NewUser) -> std::result::Result<i64, StoreError> {
        let result = sqlx::query("INSERT INTO users (username, password, email) VALUES (?, ?, ?)")
            .bind(&new_user.username)
            .bind(&new_user.password)
            .bind(&new_user.email)
            .execute(self.pool)
            .await
            .map_err(classify_insert_error)?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let id = repo
            .create(&NewUser::new("alice", "hash", "alice@x.com"))
            .await
            .unwrap();
        assert_eq!(id, 1);

        let by_name = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, id);
        assert_eq!(by_name.email, "alice@x.com");

        let by_email = repo.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.username, "alice");

        let by_id = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
    }

    #[tokio::test]
    async fn test_find_missing() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
        assert!(repo.find_by_email("nobody@x.com").await.unwrap().is_none());
        assert!(repo.get_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_constraint_violation() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("alice", "hash", "alice@x.com"))
            .await
            .unwrap();
        let result = repo
            .create(&NewUser::new("alice", "hash2", "other@x.com"))
            .await;

        assert!(matches!(
            result,
            Err(StoreError::ConstraintViolation(UniqueField::Username))
        ));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_constraint_violation() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("alice", "hash", "shared@x.com"))
            .await
            .unwrap();
        let result = repo
            .create(&NewUser::new("bob", "hash", "shared@x.com"))
            .await;

        assert!(matches!(
            result,
            Err(StoreError::ConstraintViolation(UniqueField::Email))
        ));
    }
}
