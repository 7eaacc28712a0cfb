use chrono::Utc;
use sqlx::SqlitePool;

use crate::counters::{self, Counter, CounterPolicy};
use crate::errors::{conflict_on_unique, RequestError};
use crate::models::{Favourite, User};

use super::{begin_write, require_blog_exists};

pub async fn add_favourite_in_db(
    pool: &SqlitePool,
    user: &User,
    blog_id: i64,
) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;
    require_blog_exists(&mut tx, blog_id).await?;

    sqlx::query("INSERT INTO favourites (user_id, blog_id, added_at) VALUES ($1, $2, $3)")
        .bind(user.id)
        .bind(blog_id)
        .bind(Utc::now())
        .execute(&mut tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Blog already in favourites"))?;
    counters::apply_delta(&mut tx, blog_id, Counter::Favourites, 1).await?;
    tx.commit().await?;
    Ok(())
}

pub async fn remove_favourite_in_db(
    pool: &SqlitePool,
    policy: &CounterPolicy,
    user: &User,
    blog_id: i64,
) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;
    require_blog_exists(&mut tx, blog_id).await?;

    let removed = sqlx::query("DELETE FROM favourites WHERE user_id = $1 AND blog_id = $2")
        .bind(user.id)
        .bind(blog_id)
        .execute(&mut tx)
        .await?;
    if removed.rows_affected() == 0 {
        return Err(RequestError::NotFound("Blog is not in favourites"));
    }
    counters::apply_delta(&mut tx, blog_id, Counter::Favourites, -1).await?;
    policy
        .after_removal(&mut tx, blog_id, Counter::Favourites)
        .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn get_favourites_by_user_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<Favourite>, RequestError> {
    let result = sqlx::query_as::<_, Favourite>(
        r#"
        SELECT favourites.user_id  AS "user_id",
               favourites.blog_id  AS "blog_id",
               blogs.title         AS "blog_title",
               favourites.added_at AS "added_at"
        FROM   favourites
               JOIN blogs
                 ON blogs.id = favourites.blog_id
        WHERE  favourites.user_id = ?
        ORDER  BY favourites.added_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(result)
}
