//! Comment handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::AppState;
use crate::auth::ensure_owner;
use crate::db::{CommentRepository, NewComment, PostRepository};
use crate::web::dto::{
    clamp_limit, ApiResponse, CommentEditRequest, CommentListRequest, CommentResponse,
    IdResponse, PaginatedResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

async fn require_post(state: &AppState, post_id: i64) -> Result<(), ApiError> {
    PostRepository::new(state.db.pool())
        .get_by_id(post_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::not_found("Post not found"))
}

/// POST /comments/edit - Comment on a post, or edit a comment the caller owns.
pub async fn edit_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ValidatedJson(req): ValidatedJson<CommentEditRequest>,
) -> Result<Json<ApiResponse<IdResponse>>, ApiError> {
    let repo = CommentRepository::new(state.db.pool());

    let id = match req.target() {
        None => {
            require_post(&state, req.post_id).await?;
            let id = repo
                .create(&NewComment {
                    post_id: req.post_id,
                    author_id: identity.user_id,
                    content: req.content,
                })
                .await?;
            tracing::info!(
                comment_id = id,
                post_id = req.post_id,
                user_id = identity.user_id,
                "Comment created"
            );
            id
        }
        Some(id) => {
            let comment = repo
                .get_by_id(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Comment not found"))?;
            ensure_owner(&identity, comment.author_id)?;

            if !repo.update(id, &req.content).await? {
                return Err(ApiError::not_found("Comment not found"));
            }
            id
        }
    };

    Ok(Json(ApiResponse::new(IdResponse { id })))
}

/// DELETE /comments/delete/:id - Delete a comment the caller owns.
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let repo = CommentRepository::new(state.db.pool());

    let comment = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;
    ensure_owner(&identity, comment.author_id)?;

    if !repo.delete(id).await? {
        return Err(ApiError::not_found("Comment not found"));
    }

    Ok(Json(ApiResponse::new(())))
}

/// POST /comments/list - A post's comments, oldest first.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CommentListRequest>,
) -> Result<Json<PaginatedResponse<CommentResponse>>, ApiError> {
    require_post(&state, req.post_id).await?;

    let limit = clamp_limit(req.limit);
    let comments = CommentRepository::new(state.db.pool())
        .list_by_post(req.post_id, req.offset, limit)
        .await?;

    Ok(Json(PaginatedResponse::new(
        comments.into_iter().map(CommentResponse::from).collect(),
        req.offset,
        limit,
    )))
}
