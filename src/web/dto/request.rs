//! Request DTOs for the blog API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{no_control_chars, non_blank_text};

/// Page size used when a list request omits `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page size a list request may ask for.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Maximum post title length.
pub const MAX_TITLE_LENGTH: u64 = 200;

/// Maximum post body length.
pub const MAX_POST_CONTENT_LENGTH: u64 = 50_000;

/// Maximum comment length.
pub const MAX_COMMENT_LENGTH: u64 = 10_000;

/// Clamp a requested page size into `1..=MAX_PAGE_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT)
}

/// Signup request. Field rules are enforced by the registration core.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create or update a post.
///
/// A missing or zero `id` creates a new post owned by the caller.
#[derive(Debug, Deserialize, Validate)]
pub struct PostEditRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "non_blank_text")
    )]
    pub title: String,
    #[validate(
        length(min = 1, max = 50000, message = "Content must be 1-50000 characters"),
        custom(function = "no_control_chars")
    )]
    pub content: String,
}

impl PostEditRequest {
    /// The ID of the post to update, or `None` to create.
    pub fn target(&self) -> Option<i64> {
        self.id.filter(|&id| id != 0)
    }
}

/// Page through posts.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PostListRequest {
    #[serde(default)]
    #[validate(range(min = 0, message = "Offset must not be negative"))]
    pub offset: i64,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Create or update a comment.
///
/// A missing or zero `id` creates a comment on `post_id`; otherwise only the
/// content of the existing comment is replaced.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentEditRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(alias = "postId")]
    pub post_id: i64,
    #[validate(
        length(min = 1, max = 10000, message = "Comment must be 1-10000 characters"),
        custom(function = "non_blank_text")
    )]
    pub content: String,
}

impl CommentEditRequest {
    pub fn target(&self) -> Option<i64> {
        self.id.filter(|&id| id != 0)
    }
}

/// Page through the comments of one post.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentListRequest {
    #[serde(alias = "postId")]
    pub post_id: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Offset must not be negative"))]
    pub offset: i64,
    #[serde(default)]
    pub limit: Option<i64>,
}
