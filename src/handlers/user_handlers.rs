use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};

use crate::{
    authentication::{hash_password_argon2, verify_password_argon2, CurrentUser},
    db_helpers::{
        deactivate_user_in_db, delete_user_in_db, get_comments_by_user_in_db,
        get_favourites_by_user_in_db, get_history_for_user_in_db, get_likes_by_user_in_db,
        get_user_by_id, get_user_by_username, insert_user, list_blogs_by_author_in_db,
        list_users_in_db, update_user_in_db,
    },
    errors::RequestError,
    AppState, HistoryWrapper, InfoWrapper, LoginRequest, MultipleBlogsWrapper,
    MultipleCommentsWrapper, MultipleFavouritesWrapper, MultipleLikesWrapper,
    MultipleUsersWrapper, RegisterRequest, UpdateUserRequest, UserResponse, UserWrapper,
};

use super::{CreatedResult, JsonResult};

type UserJson = UserWrapper<UserResponse>;

// ----------------- Auth Handlers -----------------
pub async fn register_user(
    Extension(state): Extension<Arc<AppState>>,
    Json(mut request): Json<RegisterRequest>,
) -> CreatedResult<UserJson> {
    request.validate()?;
    request.password = hash_password_argon2(request.password).await?;

    let user = insert_user(&state.pool, &request).await?;
    let token = state.tokens.issue(user.id)?;
    tracing::info!(user_id = user.id, "registered user");
    Ok((
        StatusCode::CREATED,
        Json(UserWrapper::wrap_with_user_data(UserResponse::new(
            user,
            Some(token),
        ))),
    ))
}

pub async fn login_user(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> JsonResult<UserJson> {
    let user = match get_user_by_username(&state.pool, request.username.trim()).await? {
        Some(user) => user,
        None => return Err(RequestError::Unauthenticated("Invalid username or password")),
    };
    if !verify_password_argon2(request.password, &user.password).await? {
        tracing::warn!(username = %user.username, "failed login");
        return Err(RequestError::Unauthenticated("Invalid username or password"));
    }
    if user.disabled {
        return Err(RequestError::Unauthenticated("Account disabled"));
    }

    let token = state.tokens.issue(user.id)?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user,
        Some(token),
    ))))
}

// ----------------- User Handlers -----------------
pub async fn list_users(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
) -> JsonResult<MultipleUsersWrapper> {
    let users = list_users_in_db(&state.pool)
        .await?
        .into_iter()
        .map(|user| UserResponse::new(user, None))
        .collect();
    Ok(Json(MultipleUsersWrapper { users }))
}

pub async fn get_current_user(CurrentUser(user): CurrentUser) -> JsonResult<UserJson> {
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, None,
    ))))
}

pub async fn get_user(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<i64>,
) -> JsonResult<UserJson> {
    let user = get_user_by_id(&state.pool, id)
        .await?
        .ok_or(RequestError::NotFound("User not found"))?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, None,
    ))))
}

pub async fn update_user(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> JsonResult<UserJson> {
    let user = update_user_in_db(&state.pool, &actor, id, request).await?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, None,
    ))))
}

pub async fn delete_user(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<i64>,
) -> JsonResult<InfoWrapper> {
    delete_user_in_db(&state.pool, &actor, id).await?;
    Ok(Json(InfoWrapper::new("deleted")))
}

pub async fn deactivate_current_user(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(actor): CurrentUser,
) -> JsonResult<InfoWrapper> {
    deactivate_user_in_db(&state.pool, &actor).await?;
    Ok(Json(InfoWrapper::new("deactivated")))
}

// ----------------- Own Listings -----------------
pub async fn my_blogs(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> JsonResult<MultipleBlogsWrapper> {
    let blogs = list_blogs_by_author_in_db(&state.pool, user.id).await?;
    Ok(Json(MultipleBlogsWrapper::new(blogs)))
}

pub async fn my_likes(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> JsonResult<MultipleLikesWrapper> {
    let likes = get_likes_by_user_in_db(&state.pool, user.id).await?;
    Ok(Json(MultipleLikesWrapper {
        likes: likes.into_iter().map(Into::into).collect(),
    }))
}

pub async fn my_comments(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> JsonResult<MultipleCommentsWrapper> {
    let comments = get_comments_by_user_in_db(&state.pool, user.id).await?;
    Ok(Json(MultipleCommentsWrapper {
        comments: comments.into_iter().map(Into::into).collect(),
    }))
}

pub async fn my_favourites(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> JsonResult<MultipleFavouritesWrapper> {
    let favourites = get_favourites_by_user_in_db(&state.pool, user.id).await?;
    Ok(Json(MultipleFavouritesWrapper {
        favourites: favourites.into_iter().map(Into::into).collect(),
    }))
}

pub async fn my_history(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> JsonResult<HistoryWrapper> {
    let history = get_history_for_user_in_db(&state.pool, user.id).await?;
    Ok(Json(HistoryWrapper {
        history: history.into_iter().map(Into::into).collect(),
    }))
}
