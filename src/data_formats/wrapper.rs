use serde::{Deserialize, Serialize};

use super::response::{
    BlogResponse, CategoryResponse, CommentResponse, CorrectionResponse, FavouriteResponse,
    HistoryResponse, LikeResponse, TagResponse, UserResponse,
};

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper<T> {
    pub user: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleUsersWrapper {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BlogWrapper<T> {
    pub blog: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleBlogsWrapper {
    pub blogs: Vec<BlogResponse>,
    #[serde(rename = "blogsCount")]
    pub blogs_count: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentWrapper<T> {
    pub comment: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleCommentsWrapper {
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LikeWrapper {
    pub like: LikeResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleLikesWrapper {
    pub likes: Vec<LikeResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleFavouritesWrapper {
    pub favourites: Vec<FavouriteResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HistoryWrapper {
    pub history: Vec<HistoryResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CategoryWrapper {
    pub category: CategoryResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleCategoriesWrapper {
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TagWrapper {
    pub tag: TagResponse,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleTagsWrapper {
    pub tags: Vec<TagResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReconcileWrapper {
    pub blog: BlogResponse,
    pub corrections: Vec<CorrectionResponse>,
}

/// Plain acknowledgement for operations with nothing to return.
#[derive(Debug, Deserialize, Serialize)]
pub struct InfoWrapper {
    pub info: String,
}

impl<T> UserWrapper<T> {
    pub fn wrap_with_user_data(request: T) -> UserWrapper<T> {
        UserWrapper { user: request }
    }
}

impl InfoWrapper {
    pub fn new(info: &str) -> Self {
        InfoWrapper {
            info: info.to_owned(),
        }
    }
}

impl MultipleBlogsWrapper {
    pub fn new<B: Into<BlogResponse>>(blogs: Vec<B>) -> Self {
        let blogs: Vec<BlogResponse> = blogs.into_iter().map(Into::into).collect();
        MultipleBlogsWrapper {
            blogs_count: blogs.len(),
            blogs,
        }
    }
}
