use super::{found, parse_flag, parse_id};
use crate::auth::STAFF;
use crate::error::AppError;
use crate::extractors::Session;
use crate::models::{Certificate, CertificateInput};
use crate::pagination::{PageQuery, Pagination};
use crate::response::{created, done, ok, ok_with_message, paginated, Reply};
use crate::service::validation::validate_certificate;
use crate::service::{CertificateFilter, CertificateService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

const NOT_FOUND: &str = "Сертификат не найден";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCertificateQuery {
    #[serde(flatten)]
    page: PageQuery,
    search: Option<String>,
    active: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

pub async fn list_public(State(state): State<AppState>) -> Result<Reply<Vec<Certificate>>, AppError> {
    Ok(ok(CertificateService::list_public(&state.pool).await?))
}

pub async fn list(
    State(state): State<AppState>,
    Session(claims): Session,
    Query(q): Query<AdminCertificateQuery>,
) -> Result<Reply<Vec<Certificate>>, AppError> {
    claims.require(STAFF)?;
    let page = q.page.normalize();
    let filter = CertificateFilter {
        search: q.search,
        active: parse_flag(q.active.as_deref()),
        sort_by: q.sort_by,
        sort_order: q.sort_order,
    };
    let (items, total) = CertificateService::list(&state.pool, &filter, page).await?;
    Ok(paginated(items, Pagination::new(page, total)))
}

pub async fn get(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Certificate>, AppError> {
    claims.require(STAFF)?;
    let cert = CertificateService::get(&state.pool, parse_id(&id)?).await?;
    Ok(ok(found(cert, NOT_FOUND)?))
}

pub async fn create(
    State(state): State<AppState>,
    Session(claims): Session,
    Json(input): Json<CertificateInput>,
) -> Result<Reply<Certificate>, AppError> {
    claims.require(STAFF)?;
    validate_certificate(&input, false)?;
    let cert = CertificateService::create(&state.pool, &input).await?;
    Ok(created(cert, "Сертификат добавлен"))
}

pub async fn update(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
    Json(input): Json<CertificateInput>,
) -> Result<Reply<Certificate>, AppError> {
    claims.require(STAFF)?;
    validate_certificate(&input, true)?;
    let cert = CertificateService::update(&state.pool, parse_id(&id)?, &input).await?;
    Ok(ok_with_message(found(cert, NOT_FOUND)?, "Сертификат обновлён"))
}

pub async fn toggle(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Certificate>, AppError> {
    claims.require(STAFF)?;
    let cert = found(CertificateService::toggle(&state.pool, parse_id(&id)?).await?, NOT_FOUND)?;
    let message = if cert.is_active { "Сертификат опубликован" } else { "Сертификат скрыт" };
    Ok(ok_with_message(cert, message))
}

pub async fn delete(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Option<()>>, AppError> {
    claims.require(STAFF)?;
    if !CertificateService::delete(&state.pool, parse_id(&id)?).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    Ok(done("Сертификат удалён"))
}
