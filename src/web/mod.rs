//! HTTP surface for blogd.
//!
//! A flat JSON API over users, posts and comments. All routes pass through the
//! gatekeeper middleware; only the configured exempt paths are reachable
//! without a session token.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::{build_app, create_app, create_router, App};
pub use server::WebServer;
