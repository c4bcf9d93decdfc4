//! Account handlers: signup, login and the current user.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::auth::{self, token::BEARER_SCHEME, RegistrationRequest};
use crate::db::UserRepository;
use crate::web::dto::{
    ApiResponse, IdResponse, LoginRequest, LoginResponse, SignupRequest, UserInfo, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /user/signup - Create an account.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<IdResponse>>), ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let id = auth::register(
        &repo,
        RegistrationRequest::new(req.username, req.password, req.email),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(IdResponse { id }))))
}

/// POST /user/login - Exchange credentials for a session token.
///
/// The token is returned both in the body and as an `Authorization` response
/// header.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let user = auth::verify_credentials(&repo, &req.username, &req.password).await?;

    let token = state.tokens.issue(user.id, &user.username)?;
    let header = HeaderValue::from_str(&format!("{BEARER_SCHEME} {token}")).map_err(|e| {
        tracing::error!("Failed to build authorization header: {}", e);
        ApiError::internal("Failed to generate token")
    })?;

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    let body = LoginResponse::new(token, state.tokens.ttl_secs(), UserInfo::from(&user));
    Ok(([(AUTHORIZATION, header)], Json(ApiResponse::new(body))))
}

/// GET /user/me - The authenticated user's profile.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = UserRepository::new(state.db.pool())
        .get_by_id(identity.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::new(UserInfo::from(&user))))
}
