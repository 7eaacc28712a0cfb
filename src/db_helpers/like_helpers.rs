use chrono::Utc;
use sqlx::SqlitePool;

use crate::counters::{self, Counter, CounterPolicy};
use crate::errors::{conflict_on_unique, RequestError};
use crate::models::{Like, User};

use super::{begin_write, require_blog_exists};

/// `absent -> present`; a second like by the same user is a conflict.
pub async fn add_like_in_db(
    pool: &SqlitePool,
    user: &User,
    blog_id: i64,
) -> Result<Like, RequestError> {
    let mut tx = begin_write(pool).await?;
    require_blog_exists(&mut tx, blog_id).await?;

    let like = sqlx::query_as::<_, Like>(
        r#"
        INSERT INTO likes (user_id, blog_id, liked_at)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(blog_id)
    .bind(Utc::now())
    .fetch_one(&mut tx)
    .await
    .map_err(|e| conflict_on_unique(e, "Blog already liked"))?;
    counters::apply_delta(&mut tx, blog_id, Counter::Likes, 1).await?;
    tx.commit().await?;

    Ok(like)
}

/// `present -> absent`; unliking a blog the user never liked is not found.
pub async fn remove_like_in_db(
    pool: &SqlitePool,
    policy: &CounterPolicy,
    user: &User,
    blog_id: i64,
) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;
    require_blog_exists(&mut tx, blog_id).await?;

    let removed = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND blog_id = $2")
        .bind(user.id)
        .bind(blog_id)
        .execute(&mut tx)
        .await?;
    if removed.rows_affected() == 0 {
        return Err(RequestError::NotFound("Blog is not liked"));
    }
    counters::apply_delta(&mut tx, blog_id, Counter::Likes, -1).await?;
    policy.after_removal(&mut tx, blog_id, Counter::Likes).await?;
    tx.commit().await?;

    Ok(())
}

pub async fn get_likes_for_blog_in_db(
    pool: &SqlitePool,
    blog_id: i64,
) -> Result<Vec<Like>, RequestError> {
    let mut conn = pool.acquire().await?;
    require_blog_exists(&mut conn, blog_id).await?;
    let result =
        sqlx::query_as::<_, Like>("SELECT * FROM likes WHERE blog_id = ? ORDER BY liked_at, id")
            .bind(blog_id)
            .fetch_all(&mut *conn)
            .await?;
    Ok(result)
}

pub async fn get_likes_by_user_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<Like>, RequestError> {
    let result = sqlx::query_as::<_, Like>(
        "SELECT * FROM likes WHERE user_id = ? ORDER BY liked_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(result)
}
