use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub location: Option<String>,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

/// A blog row joined with its author, category and tag names.
///
/// `liked` and `favourited` are relative to the caller of the query and are
/// `false` for anonymous reads.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
    pub author_username: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub tag_list: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub favourite_count: i64,
    pub view_count: i64,
    pub liked: bool,
    pub favourited: bool,
}

impl Blog {
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = match &self.tag_list {
            Some(list) if !list.is_empty() => list.split(',').map(str::to_owned).collect(),
            _ => vec![],
        };
        // GROUP_CONCAT order is unspecified
        tags.sort();
        tags
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub blog_id: i64,
    pub commenter_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub blog_id: i64,
    pub liked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Favourite {
    pub user_id: i64,
    pub blog_id: i64,
    pub blog_title: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct History {
    pub user_id: i64,
    pub blog_id: i64,
    pub blog_title: String,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}
