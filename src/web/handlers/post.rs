//! Post handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::auth::ensure_owner;
use crate::db::{NewPost, PostRepository, PostUpdate};
use crate::web::dto::{
    clamp_limit, ApiResponse, IdResponse, PaginatedResponse, PostEditRequest, PostListRequest,
    PostResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// POST /posts/edit - Create a post, or update one the caller owns.
pub async fn edit_post(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ValidatedJson(req): ValidatedJson<PostEditRequest>,
) -> Result<Json<ApiResponse<IdResponse>>, ApiError> {
    let repo = PostRepository::new(state.db.pool());

    let id = match req.target() {
        None => {
            let id = repo
                .create(&NewPost {
                    title: req.title,
                    content: req.content,
                    author_id: identity.user_id,
                })
                .await?;
            tracing::info!(post_id = id, user_id = identity.user_id, "Post created");
            id
        }
        Some(id) => {
            let post = repo
                .get_by_id(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Post not found"))?;
            ensure_owner(&identity, post.author_id)?;

            let update = PostUpdate {
                title: req.title,
                content: req.content,
            };
            if !repo.update(id, &update).await? {
                return Err(ApiError::not_found("Post not found"));
            }
            id
        }
    };

    Ok(Json(ApiResponse::new(IdResponse { id })))
}

/// DELETE /posts/delete/:id - Delete a post the caller owns, with its comments.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let repo = PostRepository::new(state.db.pool());

    let post = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    if let Err(e) = ensure_owner(&identity, post.author_id) {
        tracing::info!(
            post_id = id,
            user_id = identity.user_id,
            "Rejected delete of another user's post"
        );
        return Err(e.into());
    }

    if !repo.delete(id).await? {
        return Err(ApiError::not_found("Post not found"));
    }
    tracing::info!(post_id = id, user_id = identity.user_id, "Post deleted");

    Ok(Json(ApiResponse::new(())))
}

/// GET /posts/detail/:id - One post with its author's name.
pub async fn post_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let post = PostRepository::new(state.db.pool())
        .get_with_author(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(Json(ApiResponse::new(post.into())))
}

/// POST /posts/list - Posts, most recently updated first.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<PostListRequest>,
) -> Result<Json<PaginatedResponse<PostResponse>>, ApiError> {
    let limit = clamp_limit(req.limit);
    let posts = PostRepository::new(state.db.pool())
        .list(req.offset, limit)
        .await?;

    Ok(Json(PaginatedResponse::new(
        posts.into_iter().map(PostResponse::from).collect(),
        req.offset,
        limit,
    )))
}
