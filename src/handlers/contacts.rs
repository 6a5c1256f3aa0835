//! Public order/contact forms and the admin request inbox.

use super::{found, parse_id};
use crate::auth::STAFF;
use crate::error::AppError;
use crate::extractors::{ClientIp, Session};
use crate::models::{ContactForm, ContactRequest, ContactSource, ContactStatus, NotesUpdate, StatusUpdate};
use crate::pagination::{PageQuery, Pagination};
use crate::response::{created, done, ok, ok_with_message, paginated, Reply};
use crate::service::validation::validate_contact_form;
use crate::service::{ContactFilter, ContactService, ProductService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

const NOT_FOUND: &str = "Заявка не найдена";
const THANKS: &str = "Заявка отправлена! Мы свяжемся с вами в ближайшее время.";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminContactQuery {
    #[serde(flatten)]
    page: PageQuery,
    status: Option<String>,
    source: Option<String>,
    search: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

fn parse_source(s: &str) -> Result<ContactSource, AppError> {
    match s {
        "contact" => Ok(ContactSource::Contact),
        "order" => Ok(ContactSource::Order),
        other => Err(AppError::BadRequest(format!("unknown source '{}' (expected contact or order)", other))),
    }
}

/// Validate, then count against the client's quota, then store.
/// Invalid forms never use up a submission.
async fn submit(
    state: &AppState,
    client: &str,
    form: &ContactForm,
    source: ContactSource,
) -> Result<ContactRequest, AppError> {
    let mut req = validate_contact_form(form, source)?;
    if let Some(product_id) = req.product_id {
        match ProductService::get(&state.pool, product_id).await? {
            Some(product) => {
                if req.product_name.is_none() {
                    req.product_name = Some(product.name);
                }
            }
            None => {
                tracing::debug!(product = %product_id, "order references unknown product");
                req.product_id = None;
            }
        }
    }
    let remaining = state.form_limiter.enforce(client)?;
    tracing::debug!(client = %client, remaining, "form submission accepted");
    ContactService::create(&state.pool, &req).await
}

pub async fn submit_order(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    Json(form): Json<ContactForm>,
) -> Result<Reply<ContactRequest>, AppError> {
    let row = submit(&state, &client, &form, ContactSource::Order).await?;
    Ok(created(row, THANKS))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    Json(form): Json<ContactForm>,
) -> Result<Reply<ContactRequest>, AppError> {
    let row = submit(&state, &client, &form, ContactSource::Contact).await?;
    Ok(created(row, THANKS))
}

pub async fn list(
    State(state): State<AppState>,
    Session(claims): Session,
    Query(q): Query<AdminContactQuery>,
) -> Result<Reply<Vec<ContactRequest>>, AppError> {
    claims.require(STAFF)?;
    let page = q.page.normalize();
    let status = match q.status.as_deref().map(str::trim).filter(|s| !s.is_empty() && *s != "all") {
        Some(s) => Some(s.parse::<ContactStatus>().map_err(AppError::BadRequest)?),
        None => None,
    };
    let source = match q.source.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Some(parse_source(s)?),
        None => None,
    };
    let filter = ContactFilter {
        status,
        source,
        search: q.search,
        sort_by: q.sort_by,
        sort_order: q.sort_order,
    };
    let (items, total) = ContactService::list(&state.pool, &filter, page).await?;
    Ok(paginated(items, Pagination::new(page, total)))
}

pub async fn get(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<ContactRequest>, AppError> {
    claims.require(STAFF)?;
    let row = ContactService::get(&state.pool, parse_id(&id)?).await?;
    Ok(ok(found(row, NOT_FOUND)?))
}

pub async fn set_status(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<Reply<ContactRequest>, AppError> {
    claims.require(STAFF)?;
    let row = ContactService::set_status(&state.pool, parse_id(&id)?, body.status).await?;
    Ok(ok_with_message(found(row, NOT_FOUND)?, "Статус заявки обновлён"))
}

pub async fn update_notes(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
    Json(body): Json<NotesUpdate>,
) -> Result<Reply<ContactRequest>, AppError> {
    claims.require(STAFF)?;
    let row = ContactService::update_notes(&state.pool, parse_id(&id)?, body.notes.as_deref()).await?;
    Ok(ok_with_message(found(row, NOT_FOUND)?, "Заметка сохранена"))
}

pub async fn delete(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Option<()>>, AppError> {
    claims.require(STAFF)?;
    if !ContactService::delete(&state.pool, parse_id(&id)?).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    Ok(done("Заявка удалена"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_parse() {
        assert_eq!(parse_source("order").unwrap(), ContactSource::Order);
        assert_eq!(parse_source("contact").unwrap(), ContactSource::Contact);
        assert!(matches!(parse_source("email"), Err(AppError::BadRequest(_))));
    }
}
