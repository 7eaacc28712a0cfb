use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::counters::{self, Correction};
use crate::data_formats::{BlogQueryParams, CreateBlogRequest, UpdateBlogRequest};
use crate::errors::RequestError;
use crate::models::{Blog, User};
use crate::ownership::ensure_can_modify;

use super::{begin_write, require_blog_exists, QueryBuilder};

/// `?1` is the viewer's user id, or NULL for anonymous reads.
const BLOG_QUERY: &str = r#"
            SELECT blogs.id                                         AS "id",
                   blogs.title                                      AS "title",
                   blogs.body                                       AS "body",
                   blogs.author_id                                  AS "author_id",
                   users.username                                   AS "author_username",
                   blogs.category_id                                AS "category_id",
                   categories.name                                  AS "category_name",
                   (SELECT Group_concat(tags.name, ',')
                    FROM   tags
                           JOIN blog_tags
                             ON blog_tags.tag_id = tags.id
                    WHERE  blog_tags.blog_id = blogs.id)            AS "tag_list",
                   blogs.created_at                                 AS "created_at",
                   blogs.updated_at                                 AS "updated_at",
                   blogs.likes_count                                AS "likes_count",
                   blogs.comments_count                             AS "comments_count",
                   blogs.favourite_count                            AS "favourite_count",
                   blogs.view_count                                 AS "view_count",
                   EXISTS (SELECT 1
                           FROM   likes
                           WHERE  likes.blog_id = blogs.id
                                  AND likes.user_id = ?1)           AS "liked",
                   EXISTS (SELECT 1
                           FROM   favourites
                           WHERE  favourites.blog_id = blogs.id
                                  AND favourites.user_id = ?1)      AS "favourited"
            FROM   blogs
                   JOIN users
                     ON users.id = blogs.author_id
                   LEFT JOIN categories
                          ON categories.id = blogs.category_id
"#;

pub(super) async fn fetch_blog(
    conn: &mut SqliteConnection,
    blog_id: i64,
    viewer: Option<i64>,
) -> Result<Option<Blog>, RequestError> {
    let query = format!("{} WHERE blogs.id = ?2", BLOG_QUERY);
    let result = sqlx::query_as::<_, Blog>(&query)
        .bind(viewer)
        .bind(blog_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(result)
}

pub(super) async fn require_blog(
    conn: &mut SqliteConnection,
    blog_id: i64,
    viewer: Option<i64>,
) -> Result<Blog, RequestError> {
    fetch_blog(conn, blog_id, viewer)
        .await?
        .ok_or(RequestError::NotFound("Blog not found"))
}

async fn require_category(
    conn: &mut SqliteConnection,
    category_id: i64,
) -> Result<(), RequestError> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ?")
        .bind(category_id)
        .fetch_optional(&mut *conn)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(RequestError::NotFound("Category not found")),
    }
}

/// Links `tags` to the blog, creating tag rows that do not exist yet.
async fn attach_tags(
    conn: &mut SqliteConnection,
    blog_id: i64,
    tags: &[String],
) -> Result<(), RequestError> {
    for name in tags {
        sqlx::query("INSERT INTO tags (name) VALUES (?) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&mut *conn)
            .await?;
        let tag_id: i64 = sqlx::query_scalar("SELECT id FROM tags WHERE name = ?")
            .bind(name)
            .fetch_one(&mut *conn)
            .await?;
        sqlx::query("INSERT OR IGNORE INTO blog_tags (blog_id, tag_id) VALUES (?, ?)")
            .bind(blog_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn create_blog_in_db(
    pool: &SqlitePool,
    author: &User,
    request: CreateBlogRequest,
) -> Result<Blog, RequestError> {
    // nothing is written when validation fails
    let tags = request.validate()?;

    let mut tx = begin_write(pool).await?;
    if let Some(category_id) = request.category_id {
        require_category(&mut tx, category_id).await?;
    }
    let now = Utc::now();
    let blog_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO blogs (title, body, author_id, category_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id
        "#,
    )
    .bind(request.title.trim())
    .bind(&request.body)
    .bind(author.id)
    .bind(request.category_id)
    .bind(now)
    .fetch_one(&mut tx)
    .await?;
    attach_tags(&mut tx, blog_id, &tags).await?;
    let blog = require_blog(&mut tx, blog_id, Some(author.id)).await?;
    tx.commit().await?;

    tracing::info!(blog_id, author_id = author.id, "created blog");
    Ok(blog)
}

/// Fetch-by-id counts as a view by `viewer`.
pub async fn view_blog_in_db(
    pool: &SqlitePool,
    viewer: &User,
    blog_id: i64,
) -> Result<Blog, RequestError> {
    let mut tx = begin_write(pool).await?;
    require_blog_exists(&mut tx, blog_id).await?;
    counters::record_view(&mut tx, viewer.id, blog_id).await?;
    let blog = require_blog(&mut tx, blog_id, Some(viewer.id)).await?;
    tx.commit().await?;
    Ok(blog)
}

/// Makes `%`, `_` and `\` match themselves in a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub async fn search_blogs_in_db(
    pool: &SqlitePool,
    viewer: Option<i64>,
    params: &BlogQueryParams,
) -> Result<Vec<Blog>, RequestError> {
    let text = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", escape_like(q)));
    let tag = params.tag.as_deref().map(|t| t.trim().to_lowercase());

    let (filters, values) = QueryBuilder::new(" WHERE ", " AND ")
        .add_param(
            r"(blogs.title LIKE ? ESCAPE '\' OR blogs.body LIKE ? ESCAPE '\')",
            text,
        )
        .add_param("categories.name = ?", params.category.clone())
        .add_param(
            r#"EXISTS (SELECT 1
                       FROM   blog_tags
                              JOIN tags
                                ON tags.id = blog_tags.tag_id
                       WHERE  blog_tags.blog_id = blogs.id
                              AND tags.name = ?)"#,
            tag,
        )
        .build_numbered(2);
    let limit = values.len() + 2;
    let query = format!(
        "{}{} ORDER BY blogs.created_at DESC, blogs.id DESC LIMIT ?{} OFFSET ?{}",
        BLOG_QUERY,
        filters,
        limit,
        limit + 1
    );

    let mut query = sqlx::query_as::<_, Blog>(&query).bind(viewer);
    for value in values {
        query = query.bind(value);
    }
    let result = query
        .bind(i64::from(params.page_size()))
        .bind(i64::from(params.skip))
        .fetch_all(pool)
        .await?;
    Ok(result)
}

pub async fn list_blogs_by_author_in_db(
    pool: &SqlitePool,
    author_id: i64,
) -> Result<Vec<Blog>, RequestError> {
    let query = format!(
        "{} WHERE blogs.author_id = ?2 ORDER BY blogs.created_at DESC, blogs.id DESC",
        BLOG_QUERY
    );
    let result = sqlx::query_as::<_, Blog>(&query)
        .bind(author_id)
        .bind(author_id)
        .fetch_all(pool)
        .await?;
    Ok(result)
}

pub async fn update_blog_in_db(
    pool: &SqlitePool,
    actor: &User,
    blog_id: i64,
    request: UpdateBlogRequest,
) -> Result<Blog, RequestError> {
    let mut tx = begin_write(pool).await?;
    let current = require_blog(&mut tx, blog_id, Some(actor.id)).await?;
    ensure_can_modify(actor, &current)?;
    let tags = request.validate()?;

    let category_id = match request.category_id {
        Some(category_id) => {
            require_category(&mut tx, category_id).await?;
            Some(category_id)
        }
        None => current.category_id,
    };
    let title = request.title.map(|t| t.trim().to_owned()).unwrap_or(current.title);
    let body = request.body.unwrap_or(current.body);

    sqlx::query(
        r#"
        UPDATE blogs SET title = $1, body = $2, category_id = $3, updated_at = $4
        WHERE id = $5
        "#,
    )
    .bind(title)
    .bind(body)
    .bind(category_id)
    .bind(Utc::now())
    .bind(blog_id)
    .execute(&mut tx)
    .await?;

    if let Some(tags) = tags {
        sqlx::query("DELETE FROM blog_tags WHERE blog_id = ?")
            .bind(blog_id)
            .execute(&mut tx)
            .await?;
        attach_tags(&mut tx, blog_id, &tags).await?;
    }

    let blog = require_blog(&mut tx, blog_id, Some(actor.id)).await?;
    tx.commit().await?;
    Ok(blog)
}

/// Comments, likes, favourites, history and tag links go with the blog.
pub async fn delete_blog_in_db(
    pool: &SqlitePool,
    actor: &User,
    blog_id: i64,
) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;
    let blog = require_blog(&mut tx, blog_id, None).await?;
    ensure_can_modify(actor, &blog)?;
    sqlx::query("DELETE FROM blogs WHERE id = ?")
        .bind(blog_id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    tracing::info!(blog_id, "deleted blog");
    Ok(())
}

/// Author-triggered full recount of every reconcilable counter.
pub async fn reconcile_blog_counters_in_db(
    pool: &SqlitePool,
    actor: &User,
    blog_id: i64,
) -> Result<(Blog, Vec<Correction>), RequestError> {
    let mut tx = begin_write(pool).await?;
    let blog = require_blog(&mut tx, blog_id, None).await?;
    ensure_can_modify(actor, &blog)?;
    let corrections = counters::reconcile_blog(&mut tx, blog_id).await?;
    let blog = require_blog(&mut tx, blog_id, Some(actor.id)).await?;
    tx.commit().await?;
    Ok((blog, corrections))
}
