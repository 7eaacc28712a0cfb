use sqlx::SqlitePool;

use crate::errors::{conflict_on_unique, RequestError};
use crate::models::Category;

use super::begin_write;

pub async fn create_category_in_db(
    pool: &SqlitePool,
    name: &str,
) -> Result<Category, RequestError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RequestError::Validation("name must not be empty".to_owned()));
    }
    let mut tx = begin_write(pool).await?;
    let result =
        sqlx::query_as::<_, Category>("INSERT INTO categories (name) VALUES (?) RETURNING *")
            .bind(name)
            .fetch_one(&mut tx)
            .await
            .map_err(|e| conflict_on_unique(e, "Category already exists"))?;
    tx.commit().await?;
    Ok(result)
}

pub async fn get_categories_in_db(pool: &SqlitePool) -> Result<Vec<Category>, RequestError> {
    let result = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(result)
}

/// Blogs in the category stay, uncategorised.
pub async fn delete_category_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;
    let deleted = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&mut tx)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(RequestError::NotFound("Category not found"));
    }
    tx.commit().await?;
    Ok(())
}
