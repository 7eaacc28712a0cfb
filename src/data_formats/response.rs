use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::counters::Correction;
use crate::models::{Blog, Category, Comment, Favourite, History, Like, Tag, User};

#[derive(Deserialize, Serialize, Debug)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuthorResponse {
    pub id: i64,
    pub username: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct BlogResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author: AuthorResponse,
    pub category: Option<CategoryResponse>,
    pub tags: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub favourite_count: i64,
    pub view_count: i64,
    pub liked: bool,
    pub favourited: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CommentResponse {
    pub id: i64,
    pub body: String,
    pub blog_id: i64,
    pub commenter_id: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LikeResponse {
    pub id: i64,
    pub user_id: i64,
    pub blog_id: i64,
    #[serde(rename = "likedAt")]
    pub liked_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct FavouriteResponse {
    pub blog_id: i64,
    pub blog_title: String,
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct HistoryResponse {
    pub blog_id: i64,
    pub blog_title: String,
    #[serde(rename = "viewedAt")]
    pub viewed_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CorrectionResponse {
    pub counter: String,
    pub cached: i64,
    pub actual: i64,
}

impl UserResponse {
    pub fn new(
        User {
            id,
            username,
            email,
            firstname,
            lastname,
            location,
            created_at,
            ..
        }: User,
        token: Option<String>,
    ) -> Self {
        UserResponse {
            id,
            username,
            email,
            firstname,
            lastname,
            location,
            created_at,
            token,
        }
    }
}

impl From<Blog> for BlogResponse {
    fn from(blog: Blog) -> Self {
        let tags = blog.tags();
        let category = match (blog.category_id, blog.category_name) {
            (Some(id), Some(name)) => Some(CategoryResponse { id, name }),
            _ => None,
        };
        BlogResponse {
            id: blog.id,
            title: blog.title,
            body: blog.body,
            author: AuthorResponse {
                id: blog.author_id,
                username: blog.author_username,
            },
            category,
            tags,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            likes_count: blog.likes_count,
            comments_count: blog.comments_count,
            favourite_count: blog.favourite_count,
            view_count: blog.view_count,
            liked: blog.liked,
            favourited: blog.favourited,
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(
        Comment {
            id,
            body,
            blog_id,
            commenter_id,
            created_at,
            updated_at,
        }: Comment,
    ) -> Self {
        CommentResponse {
            id,
            body,
            blog_id,
            commenter_id,
            created_at,
            updated_at,
        }
    }
}

impl From<Like> for LikeResponse {
    fn from(like: Like) -> Self {
        LikeResponse {
            id: like.id,
            user_id: like.user_id,
            blog_id: like.blog_id,
            liked_at: like.liked_at,
        }
    }
}

impl From<Favourite> for FavouriteResponse {
    fn from(favourite: Favourite) -> Self {
        FavouriteResponse {
            blog_id: favourite.blog_id,
            blog_title: favourite.blog_title,
            added_at: favourite.added_at,
        }
    }
}

impl From<History> for HistoryResponse {
    fn from(history: History) -> Self {
        HistoryResponse {
            blog_id: history.blog_id,
            blog_title: history.blog_title,
            viewed_at: history.viewed_at,
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(Category { id, name }: Category) -> Self {
        CategoryResponse { id, name }
    }
}

impl From<Tag> for TagResponse {
    fn from(Tag { id, name }: Tag) -> Self {
        TagResponse { id, name }
    }
}

impl From<Correction> for CorrectionResponse {
    fn from(correction: Correction) -> Self {
        CorrectionResponse {
            counter: correction.counter.column().to_owned(),
            cached: correction.cached,
            actual: correction.actual,
        }
    }
}
