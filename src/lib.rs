//! blogd - a small blog backend.
//!
//! Users sign up and log in with a username and password, receive a signed
//! session token, and use it to create and manage posts and comments.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{
    ensure_owner, hash_password, register, validate_password, verify_credentials,
    verify_password, AuthError, AuthenticatedIdentity, PasswordError, RegistrationRequest,
    TokenAuthority, TokenError, ValidationError,
};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{BlogError, Result};
