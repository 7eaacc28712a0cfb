use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    authentication::hash_password_argon2,
    counters,
    errors::{conflict_on_unique, RequestError},
    models::User,
    ownership::ensure_can_modify,
    RegisterRequest, UpdateUserRequest,
};

use super::{begin_write, fetch_user, QueryBuilder};

/// `user.password` must already be hashed.
pub async fn insert_user(pool: &SqlitePool, user: &RegisterRequest) -> Result<User, RequestError> {
    let mut tx = begin_write(pool).await?;
    let result = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password, disabled, created_at)
        VALUES ($1, $2, $3, FALSE, $4)
        RETURNING *
        "#,
    )
    .bind(user.username.trim())
    .bind(&user.email)
    .bind(&user.password)
    .bind(Utc::now())
    .fetch_one(&mut tx)
    .await
    .map_err(|e| conflict_on_unique(e, "Username already taken"))?;
    tx.commit().await?;
    Ok(result)
}

pub async fn list_users_in_db(pool: &SqlitePool) -> Result<Vec<User>, RequestError> {
    let result = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(result)
}

async fn require_own_user(
    conn: &mut SqliteConnection,
    actor: &User,
    id: i64,
) -> Result<User, RequestError> {
    let target = fetch_user(conn, id)
        .await?
        .ok_or(RequestError::NotFound("User not found"))?;
    ensure_can_modify(actor, &target)?;
    Ok(target)
}

pub async fn update_user_in_db(
    pool: &SqlitePool,
    actor: &User,
    id: i64,
    request: UpdateUserRequest,
) -> Result<User, RequestError> {
    {
        let mut tx = pool.begin().await?;
        require_own_user(&mut tx, actor, id).await?;
        request.validate()?;
        tx.commit().await?;
    }

    let UpdateUserRequest {
        email,
        firstname,
        lastname,
        location,
        password,
    } = request;
    // hashed before the write lock is taken
    let password = match password {
        Some(password) => Some(hash_password_argon2(password).await?),
        None => None,
    };

    let builder = QueryBuilder::new("UPDATE users SET ", ", ")
        .add_param("email = ?", email)
        .add_param("firstname = ?", firstname)
        .add_param("lastname = ?", lastname)
        .add_param("location = ?", location)
        .add_param("password = ?", password);

    let mut tx = begin_write(pool).await?;
    // the user may have been deleted while the password was hashed
    require_own_user(&mut tx, actor, id).await?;
    if !builder.is_empty() {
        let (query, params) = builder.build();
        let query = format!("{} WHERE id = ?", query);
        let mut query = sqlx::query(&query);
        for param in params {
            query = query.bind(param);
        }
        query.bind(id).execute(&mut tx).await?;
    }
    let result = fetch_user(&mut tx, id)
        .await?
        .ok_or(RequestError::NotFound("User not found"))?;
    tx.commit().await?;

    Ok(result)
}

/// Deletes the user and everything cascading from them, then recomputes the
/// counters of surviving blogs that lost likes, comments or favourites.
pub async fn delete_user_in_db(
    pool: &SqlitePool,
    actor: &User,
    id: i64,
) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;
    require_own_user(&mut tx, actor, id).await?;

    let affected: Vec<i64> = sqlx::query_scalar(
        r#"
        SELECT blog_id FROM likes WHERE user_id = $1
        UNION
        SELECT blog_id FROM comments WHERE commenter_id = $1
        UNION
        SELECT blog_id FROM favourites WHERE user_id = $1
        "#,
    )
    .bind(id)
    .fetch_all(&mut tx)
    .await?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut tx)
        .await?;

    for blog_id in affected {
        // blogs the user authored are already gone and reconcile to nothing
        counters::reconcile_blog(&mut tx, blog_id).await?;
    }
    tx.commit().await?;
    tracing::info!(user_id = id, "deleted user");
    Ok(())
}

pub async fn deactivate_user_in_db(pool: &SqlitePool, actor: &User) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;
    sqlx::query("UPDATE users SET disabled = TRUE WHERE id = ?")
        .bind(actor.id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    tracing::info!(user_id = actor.id, "deactivated user");
    Ok(())
}
