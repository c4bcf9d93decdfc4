//! Credential verification and account registration.
//!
//! Both operations talk to storage only through [`CredentialStore`], and run
//! the Argon2 work on tokio's blocking pool so request threads stay free.

use tracing::{debug, info, warn};

use crate::auth::password::{dummy_hash, hash_password, validate_password, verify_password};
use crate::auth::validation::{validate_email, validate_username};
use crate::auth::{AuthError, PasswordError};
use crate::db::{CredentialStore, NewUser, StoreError, UniqueField, User};

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Desired username (3-32 alphanumeric + underscore).
    pub username: String,
    /// Plaintext password (8-128 characters). Dropped after hashing.
    pub password: String,
    /// Email address, unique across accounts.
    pub email: String,
}

impl RegistrationRequest {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
        }
    }

    fn validate(&self) -> Result<(), AuthError> {
        validate_username(&self.username).map_err(|e| AuthError::Validation(e.to_string()))?;
        validate_password(&self.password).map_err(|e| AuthError::Validation(e.to_string()))?;
        validate_email(&self.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        Ok(())
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Internal(format!("blocking task failed: {e}")))
}

/// Register a new account and return its ID.
///
/// 1. Validate the input
/// 2. Reject a taken username or email
/// 3. Hash the password
/// 4. Insert, mapping a lost uniqueness race to the same duplicate error
pub async fn register<S>(store: &S, request: RegistrationRequest) -> Result<i64, AuthError>
where
    S: CredentialStore + ?Sized,
{
    request.validate()?;

    if store.find_by_username(&request.username).await?.is_some() {
        return Err(AuthError::DuplicateUsername);
    }
    if store.find_by_email(&request.email).await?.is_some() {
        return Err(AuthError::DuplicateEmail);
    }

    let RegistrationRequest {
        username,
        password,
        email,
    } = request;
    let password_hash = run_blocking(move || hash_password(&password))
        .await?
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    let new_user = NewUser::new(username, password_hash, email);
    let id = match store.create(&new_user).await {
        Ok(id) => id,
        Err(StoreError::ConstraintViolation(field)) => {
            debug!(username = %new_user.username, ?field, "Registration lost a uniqueness race");
            return Err(match field {
                UniqueField::Username => AuthError::DuplicateUsername,
                UniqueField::Email => AuthError::DuplicateEmail,
            });
        }
        Err(StoreError::Database(e)) => return Err(AuthError::Store(e)),
    };

    info!(username = %new_user.username, user_id = id, "New user registered");
    Ok(id)
}

/// Check a username/password pair and return the stored user.
///
/// An unknown username and a wrong password both yield
/// [`AuthError::InvalidCredentials`], and both pay for one Argon2 verification.
pub async fn verify_credentials<S>(
    store: &S,
    username: &str,
    password: &str,
) -> Result<User, AuthError>
where
    S: CredentialStore + ?Sized,
{
    let user = store.find_by_username(username).await?;
    let candidate = password.to_string();

    let Some(user) = user else {
        run_blocking(move || {
            if let Some(hash) = dummy_hash() {
                let _ = verify_password(&candidate, hash);
            }
        })
        .await?;
        debug!(username = %username, "Login failed");
        return Err(AuthError::InvalidCredentials);
    };

    let stored = user.password.clone();
    match run_blocking(move || verify_password(&candidate, &stored)).await? {
        Ok(true) => Ok(user),
        Ok(false) => {
            debug!(username = %username, "Login failed");
            Err(AuthError::InvalidCredentials)
        }
        Err(PasswordError::InvalidHash) => {
            warn!(user_id = user.id, "Stored password hash is unreadable");
            Err(AuthError::InvalidCredentials)
        }
        Err(e) => Err(AuthError::Internal(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::UserRepository;
    use crate::{BlogError, Database};
    use async_trait::async_trait;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_register_then_verify() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let id = register(&repo, RegistrationRequest::new("alice", "password1", "alice@x.com"))
            .await
            .unwrap();

        let user = verify_credentials(&repo, "alice", "password1").await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert!(user.password.starts_with("$argon2id$"));
        assert_ne!(user.password, "password1");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());
        register(&repo, RegistrationRequest::new("alice", "password1", "alice@x.com"))
            .await
            .unwrap();

        let wrong = verify_credentials(&repo, "alice", "password2").await;
        let unknown = verify_credentials(&repo, "mallory", "password1").await;

        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
        assert_eq!(
            wrong.unwrap_err().to_string(),
            unknown.unwrap_err().to_string()
        );
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());
        register(&repo, RegistrationRequest::new("alice", "password1", "alice@x.com"))
            .await
            .unwrap();

        let result =
            register(&repo, RegistrationRequest::new("alice", "password2", "other@x.com")).await;
        assert!(matches!(result, Err(AuthError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());
        register(&repo, RegistrationRequest::new("alice", "password1", "alice@x.com"))
            .await
            .unwrap();

        let result =
            register(&repo, RegistrationRequest::new("bob", "password2", "alice@x.com")).await;
        assert!(matches!(result, Err(AuthError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_lookup() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        for request in [
            RegistrationRequest::new("a", "password1", "a@x.com"),
            RegistrationRequest::new("alice", "short", "alice@x.com"),
            RegistrationRequest::new("alice", "password1", "not-an-email"),
        ] {
            let result = register(&repo, request).await;
            assert!(matches!(result, Err(AuthError::Validation(_))));
        }
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_registration_one_winner() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let (a, b) = tokio::join!(
            register(&repo, RegistrationRequest::new("alice", "password1", "a1@x.com")),
            register(&repo, RegistrationRequest::new("alice", "password2", "a2@x.com")),
        );

        let outcomes = [a, b];
        let wins = outcomes.iter().filter(|r| r.is_ok()).count();
        let dupes = outcomes
            .iter()
            .filter(|r| matches!(r, Err(AuthError::DuplicateUsername)))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(dupes, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    /// Store whose lookups never see existing rows, forcing every duplicate
    /// through the insert-time constraint.
    struct RacyStore<'a>(UserRepository<'a>);

    #[async_trait]
    impl CredentialStore for RacyStore<'_> {
        async fn find_by_username(&self, _username: &str) -> crate::Result<Option<User>> {
            Ok(None)
        }

        async fn find_by_email(&self, _email: &str) -> crate::Result<Option<User>> {
            Ok(None)
        }

        async fn create(&self, new_user: &NewUser) -> Result<i64, StoreError> {
            self.0.create(new_user).await
        }
    }

    #[tokio::test]
    async fn test_late_constraint_violation_maps_to_duplicate() {
        let db = setup_db().await;
        let store = RacyStore(UserRepository::new(db.pool()));

        register(&store, RegistrationRequest::new("alice", "password1", "alice@x.com"))
            .await
            .unwrap();

        let same_name =
            register(&store, RegistrationRequest::new("alice", "password2", "b@x.com")).await;
        assert!(matches!(same_name, Err(AuthError::DuplicateUsername)));

        let same_email =
            register(&store, RegistrationRequest::new("bob", "password2", "alice@x.com")).await;
        assert!(matches!(same_email, Err(AuthError::DuplicateEmail)));
    }

    struct BrokenStore;

    #[async_trait]
    impl CredentialStore for BrokenStore {
        async fn find_by_username(&self, _username: &str) -> crate::Result<Option<User>> {
            Err(BlogError::Database("connection reset".to_string()))
        }

        async fn find_by_email(&self, _email: &str) -> crate::Result<Option<User>> {
            Err(BlogError::Database("connection reset".to_string()))
        }

        async fn create(&self, _new_user: &NewUser) -> Result<i64, StoreError> {
            Err(StoreError::Database(BlogError::Database(
                "connection reset".to_string(),
            )))
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_not_invalid_credentials() {
        let result = verify_credentials(&BrokenStore, "alice", "password1").await;
        assert!(matches!(result, Err(AuthError::Store(_))));
    }
}
