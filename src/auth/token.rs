//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the user ID as an exact JSON integer, the
//! username, and issue/expiry times in unix seconds. Nothing is stored server
//! side: a token is valid while its signature checks out and it has not
//! expired. Changing the secret invalidates every outstanding token.

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthError;
use crate::config::AuthConfig;

/// Scheme literal expected in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject user ID.
    pub sub: i64,
    /// Subject username.
    pub username: String,
    /// Issued at, unix seconds.
    pub iat: u64,
    /// Expiry, unix seconds. Valid while `now < exp`.
    pub exp: u64,
    /// Unique token ID.
    pub jti: String,
}

/// The caller's identity, established by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: i64,
    pub username: String,
}

impl From<SessionClaims> for AuthenticatedIdentity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
        }
    }
}

/// Why a token was rejected. All kinds surface to clients as `Unauthorized`;
/// the distinction is kept for logs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("missing authorization header")]
    Missing,

    #[error("malformed authorization header or token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    /// Well-formed and signed, but the claims are unusable.
    #[error("invalid token claims")]
    Invalid,
}

impl From<TokenError> for AuthError {
    fn from(_: TokenError) -> Self {
        AuthError::Unauthorized
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The value must be exactly two space-separated segments, the first being
/// the `Bearer` scheme (ASCII case-insensitive).
pub fn bearer_token(header_value: &str) -> Result<&str, TokenError> {
    let (scheme, token) = header_value
        .split_once(' ')
        .ok_or(TokenError::Malformed)?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() || token.contains(' ') {
        return Err(TokenError::Malformed);
    }
    Ok(token)
}

fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Issues and verifies session tokens with one process-wide secret.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl TokenAuthority {
    /// Create an authority from a secret and a token lifetime.
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` against an explicit clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_secs)
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Issue a token for a user, valid from now for the configured lifetime.
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, username, unix_now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        user_id: i64,
        username: &str,
        issued_at: u64,
    ) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sub: user_id,
            username: username.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl_secs),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("failed to sign session token: {e}")))
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedIdentity, TokenError> {
        self.verify_at(token, unix_now())
    }

    /// Verify signature and structure, then require `now < exp`.
    pub fn verify_at(&self, token: &str, now: u64) -> Result<AuthenticatedIdentity, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => TokenError::Malformed,
                _ => TokenError::Invalid,
            },
        )?;

        if now >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.into())
    }
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
