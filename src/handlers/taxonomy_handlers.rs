use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};

use crate::{
    authentication::CurrentUser,
    db_helpers::{
        create_category_in_db, create_tag_in_db, delete_category_in_db, delete_tag_in_db,
        get_categories_in_db, get_tags_in_db,
    },
    AppState, CategoryRequest, CategoryWrapper, InfoWrapper, MultipleCategoriesWrapper,
    MultipleTagsWrapper, TagRequest, TagWrapper,
};

use super::{CreatedResult, JsonResult};

// ----------------- Category Handlers -----------------
pub async fn create_category(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
    Json(request): Json<CategoryRequest>,
) -> CreatedResult<CategoryWrapper> {
    let category = create_category_in_db(&state.pool, &request.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryWrapper {
            category: category.into(),
        }),
    ))
}

pub async fn list_categories(
    Extension(state): Extension<Arc<AppState>>,
) -> JsonResult<MultipleCategoriesWrapper> {
    let categories = get_categories_in_db(&state.pool).await?;
    Ok(Json(MultipleCategoriesWrapper {
        categories: categories.into_iter().map(Into::into).collect(),
    }))
}

pub async fn delete_category(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<i64>,
) -> JsonResult<InfoWrapper> {
    delete_category_in_db(&state.pool, id).await?;
    Ok(Json(InfoWrapper::new("deleted")))
}

// ----------------- Tag Handlers -----------------
pub async fn create_tag(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
    Json(request): Json<TagRequest>,
) -> CreatedResult<TagWrapper> {
    let tag = create_tag_in_db(&state.pool, &request.name).await?;
    Ok((StatusCode::CREATED, Json(TagWrapper { tag: tag.into() })))
}

pub async fn list_tags(
    Extension(state): Extension<Arc<AppState>>,
) -> JsonResult<MultipleTagsWrapper> {
    let tags = get_tags_in_db(&state.pool).await?;
    Ok(Json(MultipleTagsWrapper {
        tags: tags.into_iter().map(Into::into).collect(),
    }))
}

pub async fn delete_tag(
    Extension(state): Extension<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
    Path(name): Path<String>,
) -> JsonResult<InfoWrapper> {
    delete_tag_in_db(&state.pool, &name).await?;
    Ok(Json(InfoWrapper::new("deleted")))
}
