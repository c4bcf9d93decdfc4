//! Response DTOs for the blog API.

use serde::Serialize;

use crate::auth::token::BEARER_SCHEME;
use crate::db::{CommentWithAuthor, PostWithAuthor, User};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// List response with the window that produced it.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, offset: i64, limit: i64) -> Self {
        Self {
            data,
            meta: PaginationMeta { offset, limit },
        }
    }
}

/// Pagination window.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub offset: i64,
    pub limit: i64,
}

/// ID of a newly created or updated resource.
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: i64,
}

/// Public view of an account. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token (JWT).
    pub access_token: String,
    /// Always `"Bearer"`.
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    pub user: UserInfo,
}

impl LoginResponse {
    pub fn new(access_token: String, expires_in: u64, user: UserInfo) -> Self {
        Self {
            access_token,
            token_type: BEARER_SCHEME,
            expires_in,
            user,
        }
    }
}

/// Post with its author's username. Times are unix milliseconds.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub author_name: String,
    pub ctime: i64,
    pub utime: i64,
}

impl From<PostWithAuthor> for PostResponse {
    fn from(post: PostWithAuthor) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            author_name: post.author_name,
            ctime: post.ctime,
            utime: post.utime,
        }
    }
}

/// Comment with its author's username.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub content: String,
    pub ctime: i64,
    pub utime: i64,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(comment: CommentWithAuthor) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_name: comment.author_name,
            content: comment.content,
            ctime: comment.ctime,
            utime: comment.utime,
        }
    }
}
