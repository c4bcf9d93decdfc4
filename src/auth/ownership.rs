//! Ownership checks for mutating operations.
//!
//! A post or comment may only be updated or deleted by the user who created
//! it. The check compares integer IDs; usernames are never trusted for it.

use crate::auth::{AuthError, AuthenticatedIdentity};

/// Require that the authenticated caller owns the resource.
///
/// # Examples
///
/// ```
/// use blogd::auth::{ensure_owner, AuthError, AuthenticatedIdentity};
///
/// let alice = AuthenticatedIdentity { user_id: 1, username: "alice".to_string() };
/// assert!(ensure_owner(&alice, 1).is_ok());
/// assert!(matches!(ensure_owner(&alice, 2), Err(AuthError::Forbidden)));
/// ```
pub fn ensure_owner(identity: &AuthenticatedIdentity, owner_id: i64) -> Result<(), AuthError> {
    if identity.user_id == owner_id {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
