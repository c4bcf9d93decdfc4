//! Router configuration for the blog API.

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_comment, delete_post, edit_comment, edit_post, list_comments, list_posts, login, me,
    post_detail, signup, AppState,
};
use super::middleware::{
    create_cors_layer, credential_rate_limit, gatekeeper, Gatekeeper, RateLimitState,
};
use crate::auth::TokenAuthority;
use crate::{Config, Database};

/// Create the API router.
///
/// Every route, `/health` included, sits behind the gatekeeper; which ones
/// need a token is decided by its exemption set alone.
pub fn create_router(
    app_state: Arc<AppState>,
    gate: Arc<Gatekeeper>,
    rate_limit: Arc<RateLimitState>,
    cors_origins: &[String],
) -> Router {
    let credential_routes = Router::new()
        .route("/user/signup", post(signup))
        .route("/user/login", post(login))
        .route_layer(from_fn_with_state(rate_limit, credential_rate_limit));

    let user_routes = Router::new().route("/user/me", get(me));

    let post_routes = Router::new()
        .route("/posts/edit", post(edit_post))
        .route("/posts/delete/:id", delete(delete_post))
        .route("/posts/detail/:id", get(post_detail))
        .route("/posts/list", post(list_posts));

    let comment_routes = Router::new()
        .route("/comments/edit", post(edit_comment))
        .route("/comments/delete/:id", delete(delete_comment))
        .route("/comments/list", post(list_comments));

    Router::new()
        .merge(credential_routes)
        .merge(user_routes)
        .merge(post_routes)
        .merge(comment_routes)
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(from_fn_with_state(gate, gatekeeper)),
        )
        .with_state(app_state)
}

/// The assembled application and the state its server has to maintain.
pub struct App {
    pub router: Router,
    pub rate_limit: Arc<RateLimitState>,
}

/// Wire the whole application from configuration and an open database.
pub fn build_app(config: &Config, db: Database) -> App {
    let tokens = Arc::new(TokenAuthority::from_config(&config.auth));
    let gate = Arc::new(Gatekeeper::from_config(tokens.clone(), &config.auth));
    let rate_limit = Arc::new(RateLimitState::new(
        config.auth.login_rate_limit,
        config.server.trust_proxy_headers,
    ));
    let app_state = Arc::new(AppState::new(db, tokens));

    let router = create_router(
        app_state,
        gate,
        rate_limit.clone(),
        &config.server.cors_origins,
    );
    App { router, rate_limit }
}

/// [`build_app`] for callers that only need the router.
pub fn create_app(config: &Config, db: Database) -> Router {
    build_app(config, db).router
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
