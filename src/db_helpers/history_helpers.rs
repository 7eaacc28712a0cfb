use sqlx::SqlitePool;

use crate::errors::RequestError;
use crate::models::History;

/// Most recently viewed first; one row per blog.
pub async fn get_history_for_user_in_db(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<History>, RequestError> {
    let result = sqlx::query_as::<_, History>(
        r#"
        SELECT history.user_id   AS "user_id",
               history.blog_id   AS "blog_id",
               blogs.title       AS "blog_title",
               history.viewed_at AS "viewed_at"
        FROM   history
               JOIN blogs
                 ON blogs.id = history.blog_id
        WHERE  history.user_id = ?
        ORDER  BY history.viewed_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(result)
}
