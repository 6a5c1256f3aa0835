use super::{found, parse_flag, parse_id};
use crate::auth::STAFF;
use crate::error::AppError;
use crate::extractors::Session;
use crate::models::{Category, CategoryInput};
use crate::response::{created, done, ok, ok_with_message, Reply};
use crate::service::validation::validate_category;
use crate::service::CategoryService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

const NOT_FOUND: &str = "Категория не найдена";

#[derive(Debug, Default, Deserialize)]
pub struct AdminCategoryQuery {
    search: Option<String>,
    active: Option<String>,
}

pub async fn list_public(State(state): State<AppState>) -> Result<Reply<Vec<Category>>, AppError> {
    Ok(ok(CategoryService::list_public(&state.pool).await?))
}

pub async fn get_public(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Reply<Category>, AppError> {
    let category = CategoryService::get_public_by_slug(&state.pool, &slug).await?;
    Ok(ok(found(category, NOT_FOUND)?))
}

pub async fn list(
    State(state): State<AppState>,
    Session(claims): Session,
    Query(q): Query<AdminCategoryQuery>,
) -> Result<Reply<Vec<Category>>, AppError> {
    claims.require(STAFF)?;
    let items = CategoryService::list(&state.pool, q.search.as_deref(), parse_flag(q.active.as_deref())).await?;
    Ok(ok(items))
}

pub async fn get(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Category>, AppError> {
    claims.require(STAFF)?;
    let category = CategoryService::get(&state.pool, parse_id(&id)?).await?;
    Ok(ok(found(category, NOT_FOUND)?))
}

pub async fn create(
    State(state): State<AppState>,
    Session(claims): Session,
    Json(input): Json<CategoryInput>,
) -> Result<Reply<Category>, AppError> {
    claims.require(STAFF)?;
    validate_category(&input, false)?;
    let category = CategoryService::create(&state.pool, &input).await?;
    Ok(created(category, "Категория создана"))
}

pub async fn update(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> Result<Reply<Category>, AppError> {
    claims.require(STAFF)?;
    validate_category(&input, true)?;
    let category = CategoryService::update(&state.pool, parse_id(&id)?, &input).await?;
    Ok(ok_with_message(found(category, NOT_FOUND)?, "Категория обновлена"))
}

pub async fn toggle(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Category>, AppError> {
    claims.require(STAFF)?;
    let category = found(CategoryService::toggle(&state.pool, parse_id(&id)?).await?, NOT_FOUND)?;
    let message = if category.is_active { "Категория включена" } else { "Категория скрыта" };
    Ok(ok_with_message(category, message))
}

pub async fn delete(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Option<()>>, AppError> {
    claims.require(STAFF)?;
    if !CategoryService::delete(&state.pool, parse_id(&id)?).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    Ok(done("Категория удалена"))
}
