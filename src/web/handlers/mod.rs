//! API handlers for the blog.

pub mod comment;
pub mod post;
pub mod user;

pub use comment::*;
pub use post::*;
pub use user::*;

use std::sync::Arc;

use crate::auth::TokenAuthority;
use crate::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database pool handle.
    pub db: Database,
    /// Issues session tokens on login.
    pub tokens: Arc<TokenAuthority>,
}

impl AppState {
    pub fn new(db: Database, tokens: Arc<TokenAuthority>) -> Self {
        Self { db, tokens }
    }
}
