//! Comment model and repository.

use sqlx::SqlitePool;

use super::now_millis;
use crate::{BlogError, Result};

/// A stored comment.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    /// Owner of the comment.
    pub author_id: i64,
    pub content: String,
    pub ctime: i64,
    pub utime: i64,
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub content: String,
    pub ctime: i64,
    pub utime: i64,
}

/// Data for creating a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
}

/// Repository for comments.
pub struct CommentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a comment and return its ID.
    ///
    /// Fails with `NotFound("post")` or `NotFound("user")` when the post or
    /// the author no longer exists.
    pub async fn create(&self, new_comment: &NewComment) -> Result<i64> {
        let now = now_millis();
        let result = sqlx::query(
            "INSERT INTO comments (post_id, author_id, content, ctime, utime)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(new_comment.post_id)
        .bind(new_comment.author_id)
        .bind(&new_comment.content)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(ref db_err)) if db_err.is_foreign_key_violation() => {
                let post: Option<i64> = sqlx::query_scalar("SELECT id FROM posts WHERE id = ?")
                    .bind(new_comment.post_id)
                    .fetch_optional(self.pool)
                    .await?;
                let parent = if post.is_some() { "user" } else { "post" };
                Err(BlogError::NotFound(parent.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, author_id, content, ctime, utime FROM comments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(comment)
    }

    /// Replace the content, bumping `utime`. Returns false if the comment is gone.
    pub async fn update(&self, id: i64, content: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE comments SET content = ?, utime = ? WHERE id = ?")
            .bind(content)
            .bind(now_millis())
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a post's comments, oldest first.
    pub async fn list_by_post(
        &self,
        post_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.post_id, c.author_id, u.username AS author_name,
                    c.content, c.ctime, c.utime
             FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.post_id = ?
             ORDER BY c.ctime ASC, c.id ASC
             LIMIT ? OFFSET ?",
        )
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;
        Ok(comments)
    }
}
