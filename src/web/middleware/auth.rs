//! Gatekeeper middleware: session token enforcement for every request.
//!
//! Requests to an exempt path pass straight through. Every other request must
//! carry `Authorization: Bearer <token>` with a token the [`TokenAuthority`]
//! accepts; the resulting [`AuthenticatedIdentity`] is placed in the request
//! extensions for handlers to pick up through [`AuthUser`].

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::auth::{bearer_token, AuthenticatedIdentity, TokenAuthority, TokenError};
use crate::config::AuthConfig;
use crate::web::error::ApiError;

/// Token authority plus the set of paths that skip it.
#[derive(Debug)]
pub struct Gatekeeper {
    authority: Arc<TokenAuthority>,
    exempt: HashSet<String>,
}

impl Gatekeeper {
    pub fn new<I, P>(authority: Arc<TokenAuthority>, exempt_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            authority,
            exempt: exempt_paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(authority: Arc<TokenAuthority>, config: &AuthConfig) -> Self {
        Self::new(authority, config.exempt_paths.iter().cloned())
    }

    /// Exact, case-sensitive path match.
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt.contains(path)
    }

    /// Resolve the caller from the raw `Authorization` header value.
    pub fn authenticate(
        &self,
        header_value: Option<&str>,
    ) -> Result<AuthenticatedIdentity, TokenError> {
        let header_value = header_value.ok_or(TokenError::Missing)?;
        let token = bearer_token(header_value)?;
        self.authority.verify(token)
    }
}

/// Middleware enforcing a valid session token outside the exempt set.
pub async fn gatekeeper(
    State(gatekeeper): State<Arc<Gatekeeper>>,
    mut request: Request,
    next: Next,
) -> Response {
    if gatekeeper.is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let header_value = match request.headers().get(AUTHORIZATION) {
        Some(value) => match value.to_str() {
            Ok(s) => Some(s),
            Err(_) => return ApiError::from(TokenError::Malformed).into_response(),
        },
        None => None,
    };

    match gatekeeper.authenticate(header_value) {
        Ok(identity) => {
            tracing::trace!(
                user_id = identity.user_id,
                path = %request.uri().path(),
                "Authenticated"
            );
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Extractor for the authenticated caller.
///
/// Only succeeds behind the [`gatekeeper`] middleware on a non-exempt path.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("Missing authorization"))
    }
}
