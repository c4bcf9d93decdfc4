//! Database schema and migrations for blogd.
//!
//! Migrations are applied in order; `schema_version` records how many have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE,
    password    TEXT NOT NULL,           -- Argon2 PHC string
    email       TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: posts
    r#"
CREATE TABLE posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    author_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    ctime       INTEGER NOT NULL,        -- unix millis
    utime       INTEGER NOT NULL
);

CREATE INDEX idx_posts_author_ctime ON posts(author_id, ctime);
CREATE INDEX idx_posts_utime ON posts(utime);
"#,
    // v3: comments
    r#"
CREATE TABLE comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    author_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    content     TEXT NOT NULL,
    ctime       INTEGER NOT NULL,
    utime       INTEGER NOT NULL
);

CREATE INDEX idx_comments_post_id ON comments(post_id, ctime);
"#,
];
