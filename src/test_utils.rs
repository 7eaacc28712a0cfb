use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::models::User;

/// A fresh in-memory database with every migration applied.
///
/// A single connection that is never recycled, otherwise each connection
/// would see its own empty database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

/// A database file in a fresh temp dir, opened through `init_db` with a
/// multi-connection pool. Keep the `TempDir` alive for the test's duration.
pub async fn file_pool(max_connections: u32) -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("inkpost.db").display()),
        max_connections,
    };
    let pool = crate::init_db(&config).await.unwrap();
    (dir, pool)
}

pub async fn seed_user(pool: &SqlitePool, username: &str) -> User {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password, disabled, created_at)
        VALUES (?, ?, 'not-a-real-hash', FALSE, ?)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(format!("{}@example.com", username))
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_blog(pool: &SqlitePool, author_id: i64, title: &str) -> i64 {
    let now = Utc::now();
    sqlx::query_scalar(
        r#"
        INSERT INTO blogs (title, body, author_id, created_at, updated_at)
        VALUES (?, 'body', ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(author_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .unwrap()
}
