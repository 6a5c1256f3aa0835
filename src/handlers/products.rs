//! Product catalog: public reads by slug and the admin CRUD.

use super::{found, parse_flag, parse_id};
use crate::auth::STAFF;
use crate::error::AppError;
use crate::extractors::Session;
use crate::models::{Product, ProductInput};
use crate::pagination::{PageQuery, Pagination};
use crate::response::{created, done, ok, ok_with_message, paginated, Reply};
use crate::service::validation::validate_product;
use crate::service::{ProductFilter, ProductService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

const NOT_FOUND: &str = "Товар не найден";

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(flatten)]
    page: PageQuery,
    /// Category slug.
    category: Option<String>,
    search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProductQuery {
    #[serde(flatten)]
    page: PageQuery,
    search: Option<String>,
    category_id: Option<String>,
    active: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

pub async fn list_public(
    State(state): State<AppState>,
    Query(q): Query<CatalogQuery>,
) -> Result<Reply<Vec<Product>>, AppError> {
    let page = q.page.normalize();
    let filter = ProductFilter {
        search: q.search,
        category_slug: q.category.filter(|c| !c.trim().is_empty()),
        active: Some(true),
        only_visible_categories: true,
        ..Default::default()
    };
    let (items, total) = ProductService::list(&state.pool, &filter, page).await?;
    Ok(paginated(items, Pagination::new(page, total)))
}

pub async fn get_public(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Reply<Product>, AppError> {
    let product = ProductService::get_public_by_slug(&state.pool, &slug).await?;
    Ok(ok(found(product, NOT_FOUND)?))
}

pub async fn list(
    State(state): State<AppState>,
    Session(claims): Session,
    Query(q): Query<AdminProductQuery>,
) -> Result<Reply<Vec<Product>>, AppError> {
    claims.require(STAFF)?;
    let page = q.page.normalize();
    let category_id = match q.category_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => Some(parse_id(id)?),
        None => None,
    };
    let filter = ProductFilter {
        search: q.search,
        category_id,
        active: parse_flag(q.active.as_deref()),
        sort_by: q.sort_by,
        sort_order: q.sort_order,
        ..Default::default()
    };
    let (items, total) = ProductService::list(&state.pool, &filter, page).await?;
    Ok(paginated(items, Pagination::new(page, total)))
}

pub async fn get(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Product>, AppError> {
    claims.require(STAFF)?;
    let product = ProductService::get(&state.pool, parse_id(&id)?).await?;
    Ok(ok(found(product, NOT_FOUND)?))
}

pub async fn create(
    State(state): State<AppState>,
    Session(claims): Session,
    Json(input): Json<ProductInput>,
) -> Result<Reply<Product>, AppError> {
    claims.require(STAFF)?;
    validate_product(&input, false)?;
    let product = ProductService::create(&state.pool, &input).await?;
    Ok(created(product, "Товар создан"))
}

pub async fn update(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Reply<Product>, AppError> {
    claims.require(STAFF)?;
    validate_product(&input, true)?;
    let product = ProductService::update(&state.pool, parse_id(&id)?, &input).await?;
    Ok(ok_with_message(found(product, NOT_FOUND)?, "Товар обновлён"))
}

pub async fn toggle(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Product>, AppError> {
    claims.require(STAFF)?;
    let product = found(ProductService::toggle(&state.pool, parse_id(&id)?).await?, NOT_FOUND)?;
    let message = if product.is_active { "Товар опубликован" } else { "Товар скрыт" };
    Ok(ok_with_message(product, message))
}

pub async fn delete(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Option<()>>, AppError> {
    claims.require(STAFF)?;
    if !ProductService::delete(&state.pool, parse_id(&id)?).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    tracing::info!(product = %id, by = %claims.sub, "product deleted");
    Ok(done("Товар удалён"))
}
