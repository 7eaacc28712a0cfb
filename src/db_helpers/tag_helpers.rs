use sqlx::SqlitePool;

use crate::data_formats::normalize_tag;
use crate::errors::{conflict_on_unique, RequestError};
use crate::models::Tag;

use super::begin_write;

pub async fn create_tag_in_db(pool: &SqlitePool, name: &str) -> Result<Tag, RequestError> {
    let name = normalize_tag(name)?;
    let mut tx = begin_write(pool).await?;
    let result = sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES (?) RETURNING *")
        .bind(name)
        .fetch_one(&mut tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Tag already exists"))?;
    tx.commit().await?;
    Ok(result)
}

pub async fn get_tags_in_db(pool: &SqlitePool) -> Result<Vec<Tag>, RequestError> {
    let result = sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(result)
}

/// Unlinks the tag from every blog; the blogs themselves are untouched.
pub async fn delete_tag_in_db(pool: &SqlitePool, name: &str) -> Result<(), RequestError> {
    let name = normalize_tag(name)?;
    let mut tx = begin_write(pool).await?;
    let deleted = sqlx::query("DELETE FROM tags WHERE name = ?")
        .bind(name)
        .execute(&mut tx)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(RequestError::NotFound("Tag not found"));
    }
    tx.commit().await?;
    Ok(())
}
