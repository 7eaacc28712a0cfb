use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};

use crate::{
    authentication::{CurrentUser, MaybeUser},
    db_helpers::{
        add_comment_in_db, delete_comment_in_db, get_blog_of_comment_in_db, get_comment_in_db,
        get_comments_for_blog_in_db, update_comment_in_db,
    },
    AppState, BlogResponse, BlogWrapper, CommentRequest, CommentResponse, CommentWrapper,
    InfoWrapper, MultipleCommentsWrapper,
};

use super::{CreatedResult, JsonResult};

type CommentJson = CommentWrapper<CommentResponse>;

pub async fn add_comment(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(blog_id): Path<i64>,
    Json(request): Json<CommentRequest>,
) -> CreatedResult<CommentJson> {
    let comment = add_comment_in_db(&state.pool, &user, blog_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(CommentWrapper {
            comment: comment.into(),
        }),
    ))
}

pub async fn get_blog_comments(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
    Path(blog_id): Path<i64>,
) -> JsonResult<MultipleCommentsWrapper> {
    let comments = get_comments_for_blog_in_db(&state.pool, blog_id).await?;
    Ok(Json(MultipleCommentsWrapper {
        comments: comments.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_comment(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<i64>,
) -> JsonResult<CommentJson> {
    let comment = get_comment_in_db(&state.pool, id).await?;
    Ok(Json(CommentWrapper {
        comment: comment.into(),
    }))
}

pub async fn get_comment_blog(
    Extension(state): Extension<Arc<AppState>>,
    maybe_user: MaybeUser,
    Path(id): Path<i64>,
) -> JsonResult<BlogWrapper<BlogResponse>> {
    let blog = get_blog_of_comment_in_db(&state.pool, maybe_user.get_id(), id).await?;
    Ok(Json(BlogWrapper { blog: blog.into() }))
}

pub async fn update_comment(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<CommentRequest>,
) -> JsonResult<CommentJson> {
    let comment = update_comment_in_db(&state.pool, &actor, id, request).await?;
    Ok(Json(CommentWrapper {
        comment: comment.into(),
    }))
}

pub async fn delete_comment(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> JsonResult<InfoWrapper> {
    delete_comment_in_db(&state.pool, &state.counters, &actor, id).await?;
    Ok(Json(InfoWrapper::new("deleted")))
}
