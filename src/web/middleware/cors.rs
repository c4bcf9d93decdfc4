//! CORS layer configuration.

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Create a CORS layer from the configured origins.
///
/// The `Authorization` header is always exposed so browser clients can read
/// the session token set on login.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let parsed_origins: Vec<HeaderValue> =
        origins.iter().filter_map(|o| o.parse().ok()).collect();

    if parsed_origins.is_empty() {
        if !origins.is_empty() {
            tracing::warn!(?origins, "No valid CORS origins, allowing any origin");
        }
        // Any origin, without credentials
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(Any)
            .allow_origin(Any)
            .expose_headers([AUTHORIZATION])
    } else {
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
            .allow_credentials(true)
            .allow_origin(parsed_origins)
            .expose_headers([AUTHORIZATION])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    async fn exposed_headers(origins: &[String], origin: &str) -> Option<String> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(create_cors_layer(origins));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("Origin", origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        response
            .headers()
            .get("access-control-expose-headers")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase())
    }

    #[tokio::test]
    async fn test_any_origin_exposes_authorization() {
        let exposed = exposed_headers(&[], "http://example.com").await;
        assert_eq!(exposed.as_deref(), Some("authorization"));
    }

    #[tokio::test]
    async fn test_listed_origin_exposes_authorization() {
        let origins = vec!["http://localhost:5173".to_string()];
        let exposed = exposed_headers(&origins, "http://localhost:5173").await;
        assert_eq!(exposed.as_deref(), Some("authorization"));
    }
}
