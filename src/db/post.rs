//! Post model and repository.

use sqlx::SqlitePool;

use super::{missing_parent, now_millis};
use crate::Result;

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Owner of the post.
    pub author_id: i64,
    /// Creation time, unix millis.
    pub ctime: i64,
    /// Last update time, unix millis.
    pub utime: i64,
}

/// A post joined with its author's username.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthor {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub author_name: String,
    pub ctime: i64,
    pub utime: i64,
}

/// Data for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: i64,
}

/// Editable post fields.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
}

const POST_WITH_AUTHOR: &str =
    "SELECT p.id, p.title, p.content, p.author_id, u.username AS author_name, p.ctime, p.utime
     FROM posts p JOIN users u ON u.id = p.author_id";

/// Repository for posts.
pub struct PostRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a post and return its ID.
    pub async fn create(&self, new_post: &NewPost) -> Result<i64> {
        let now = now_millis();
        let result = sqlx::query(
            "INSERT INTO posts (title, content, author_id, ctime, utime) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new_post.title)
        .bind(&new_post.content)
        .bind(new_post.author_id)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .map_err(|e| missing_parent(e, "user"))?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, title, content, author_id, ctime, utime FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(post)
    }

    pub async fn get_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>> {
        let sql = format!("{POST_WITH_AUTHOR} WHERE p.id = ?");
        let post = sqlx::query_as::<_, PostWithAuthor>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(post)
    }

    /// Update title and content, bumping `utime`. Returns false if the post is gone.
    pub async fn update(&self, id: i64, update: &PostUpdate) -> Result<bool> {
        let result = sqlx::query("UPDATE posts SET title = ?, content = ?, utime = ? WHERE id = ?")
            .bind(&update.title)
            .bind(&update.content)
            .bind(now_millis())
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a post; its comments go with it.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List posts, most recently updated first.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<PostWithAuthor>> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(&format!(
            "{POST_WITH_AUTHOR} ORDER BY p.utime DESC, p.id DESC LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;
        Ok(posts)
    }
}
