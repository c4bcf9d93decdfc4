//! Middleware for the blog API.

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::{gatekeeper, AuthUser, Gatekeeper};
pub use cors::create_cors_layer;
pub use rate_limit::{credential_rate_limit, RateLimitState};
