use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    authentication::{CurrentUser, MaybeUser},
    db_helpers::{
        add_favourite_in_db, add_like_in_db, create_blog_in_db, delete_blog_in_db,
        get_likes_for_blog_in_db, reconcile_blog_counters_in_db, remove_favourite_in_db,
        remove_like_in_db, search_blogs_in_db, update_blog_in_db, view_blog_in_db,
    },
    AppState, BlogQueryParams, BlogResponse, BlogWrapper, CreateBlogRequest, InfoWrapper,
    LikeWrapper, MultipleBlogsWrapper, MultipleLikesWrapper, ReconcileWrapper,
    UpdateBlogRequest,
};

use super::{CreatedResult, JsonResult};

type BlogJson = BlogWrapper<BlogResponse>;

// ----------------- Blog Handlers -----------------
pub async fn create_blog(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(author): CurrentUser,
    Json(request): Json<CreateBlogRequest>,
) -> CreatedResult<BlogJson> {
    let blog = create_blog_in_db(&state.pool, &author, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(BlogWrapper { blog: blog.into() }),
    ))
}

pub async fn search_blogs(
    Extension(state): Extension<Arc<AppState>>,
    maybe_user: MaybeUser,
    Query(params): Query<BlogQueryParams>,
) -> JsonResult<MultipleBlogsWrapper> {
    let blogs = search_blogs_in_db(&state.pool, maybe_user.get_id(), &params).await?;
    Ok(Json(MultipleBlogsWrapper::new(blogs)))
}

pub async fn get_blog(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(viewer): CurrentUser,
    Path(id): Path<i64>,
) -> JsonResult<BlogJson> {
    let blog = view_blog_in_db(&state.pool, &viewer, id).await?;
    Ok(Json(BlogWrapper { blog: blog.into() }))
}

pub async fn update_blog(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateBlogRequest>,
) -> JsonResult<BlogJson> {
    let blog = update_blog_in_db(&state.pool, &actor, id, request).await?;
    Ok(Json(BlogWrapper { blog: blog.into() }))
}

pub async fn delete_blog(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> JsonResult<InfoWrapper> {
    delete_blog_in_db(&state.pool, &actor, id).await?;
    Ok(Json(InfoWrapper::new("deleted")))
}

pub async fn reconcile_blog_counters(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> JsonResult<ReconcileWrapper> {
    let (blog, corrections) = reconcile_blog_counters_in_db(&state.pool, &actor, id).await?;
    Ok(Json(ReconcileWrapper {
        blog: blog.into(),
        corrections: corrections.into_iter().map(Into::into).collect(),
    }))
}

// ----------------- Like Handlers -----------------
pub async fn like_blog(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> CreatedResult<LikeWrapper> {
    let like = add_like_in_db(&state.pool, &user, id).await?;
    Ok((StatusCode::CREATED, Json(LikeWrapper { like: like.into() })))
}

pub async fn unlike_blog(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> JsonResult<InfoWrapper> {
    remove_like_in_db(&state.pool, &state.counters, &user, id).await?;
    Ok(Json(InfoWrapper::new("unliked")))
}

pub async fn get_blog_likes(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<i64>,
) -> JsonResult<MultipleLikesWrapper> {
    let likes = get_likes_for_blog_in_db(&state.pool, id).await?;
    Ok(Json(MultipleLikesWrapper {
        likes: likes.into_iter().map(Into::into).collect(),
    }))
}

// ----------------- Favourite Handlers -----------------
pub async fn favourite_blog(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> CreatedResult<InfoWrapper> {
    add_favourite_in_db(&state.pool, &user, id).await?;
    Ok((StatusCode::CREATED, Json(InfoWrapper::new("favourited"))))
}

pub async fn unfavourite_blog(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> JsonResult<InfoWrapper> {
    remove_favourite_in_db(&state.pool, &state.counters, &user, id).await?;
    Ok(Json(InfoWrapper::new("unfavourited")))
}
