use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::counters::{self, Counter, CounterPolicy};
use crate::data_formats::CommentRequest;
use crate::errors::RequestError;
use crate::models::{Blog, Comment, User};
use crate::ownership::ensure_can_modify;

use super::blog_helpers::require_blog;
use super::{begin_write, require_blog_exists};

async fn require_comment(conn: &mut SqliteConnection, id: i64) -> Result<Comment, RequestError> {
    let result = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    result.ok_or(RequestError::NotFound("Comment not found"))
}

pub async fn add_comment_in_db(
    pool: &SqlitePool,
    commenter: &User,
    blog_id: i64,
    request: CommentRequest,
) -> Result<Comment, RequestError> {
    let mut tx = begin_write(pool).await?;
    require_blog_exists(&mut tx, blog_id).await?;
    request.validate()?;

    let now = Utc::now();
    let result = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (body, blog_id, commenter_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING *
        "#,
    )
    .bind(request.body)
    .bind(blog_id)
    .bind(commenter.id)
    .bind(now)
    .fetch_one(&mut tx)
    .await?;
    counters::apply_delta(&mut tx, blog_id, Counter::Comments, 1).await?;
    tx.commit().await?;

    Ok(result)
}

pub async fn get_comment_in_db(pool: &SqlitePool, id: i64) -> Result<Comment, RequestError> {
    let mut conn = pool.acquire().await?;
    require_comment(&mut conn, id).await
}

pub async fn get_blog_of_comment_in_db(
    pool: &SqlitePool,
    viewer: Option<i64>,
    comment_id: i64,
) -> Result<Blog, RequestError> {
    let mut conn = pool.acquire().await?;
    let comment = require_comment(&mut conn, comment_id).await?;
    require_blog(&mut conn, comment.blog_id, viewer).await
}

pub async fn get_comments_for_blog_in_db(
    pool: &SqlitePool,
    blog_id: i64,
) -> Result<Vec<Comment>, RequestError> {
    let mut conn = pool.acquire().await?;
    require_blog_exists(&mut conn, blog_id).await?;
    let result = sqlx::query_as::<_, Comment>(
        "SELECT * FROM comments WHERE blog_id = ? ORDER BY created_at, id",
    )
    .bind(blog_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(result)
}

pub async fn get_comments_by_user_in_db(
    pool: &SqlitePool,
    commenter_id: i64,
) -> Result<Vec<Comment>, RequestError> {
    let result = sqlx::query_as::<_, Comment>(
        "SELECT * FROM comments WHERE commenter_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(commenter_id)
    .fetch_all(pool)
    .await?;
    Ok(result)
}

pub async fn update_comment_in_db(
    pool: &SqlitePool,
    actor: &User,
    id: i64,
    request: CommentRequest,
) -> Result<Comment, RequestError> {
    let mut tx = begin_write(pool).await?;
    let comment = require_comment(&mut tx, id).await?;
    ensure_can_modify(actor, &comment)?;
    request.validate()?;

    let result = sqlx::query_as::<_, Comment>(
        "UPDATE comments SET body = $1, updated_at = $2 WHERE id = $3 RETURNING *",
    )
    .bind(request.body)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn delete_comment_in_db(
    pool: &SqlitePool,
    policy: &CounterPolicy,
    actor: &User,
    id: i64,
) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;
    let comment = require_comment(&mut tx, id).await?;
    ensure_can_modify(actor, &comment)?;

    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(&mut tx)
        .await?;
    counters::apply_delta(&mut tx, comment.blog_id, Counter::Comments, -1).await?;
    policy
        .after_removal(&mut tx, comment.blog_id, Counter::Comments)
        .await?;
    tx.commit().await?;
    Ok(())
}
