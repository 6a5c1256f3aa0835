//! Staff accounts. Every endpoint here is ADMIN only.

use super::{found, parse_flag, parse_id};
use crate::auth::ADMIN_ONLY;
use crate::error::AppError;
use crate::extractors::Session;
use crate::models::{Role, UserInput, UserView};
use crate::pagination::{PageQuery, Pagination};
use crate::response::{created, done, ok, ok_with_message, paginated, Reply};
use crate::service::validation::validate_user;
use crate::service::{UserFilter, UserService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

const NOT_FOUND: &str = "Пользователь не найден";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserQuery {
    #[serde(flatten)]
    page: PageQuery,
    search: Option<String>,
    role: Option<String>,
    active: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

fn parse_role(s: &str) -> Result<Role, AppError> {
    match s.trim().to_ascii_uppercase().as_str() {
        "ADMIN" => Ok(Role::Admin),
        "MODERATOR" => Ok(Role::Moderator),
        other => Err(AppError::BadRequest(format!("unknown role '{}'", other))),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Session(claims): Session,
    Query(q): Query<AdminUserQuery>,
) -> Result<Reply<Vec<UserView>>, AppError> {
    claims.require(ADMIN_ONLY)?;
    let page = q.page.normalize();
    let role = match q.role.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(r) => Some(parse_role(r)?),
        None => None,
    };
    let filter = UserFilter {
        search: q.search,
        role,
        active: parse_flag(q.active.as_deref()),
        sort_by: q.sort_by,
        sort_order: q.sort_order,
    };
    let (items, total) = UserService::list(&state.pool, &filter, page).await?;
    Ok(paginated(items, Pagination::new(page, total)))
}

pub async fn get(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<UserView>, AppError> {
    claims.require(ADMIN_ONLY)?;
    let user = found(UserService::get(&state.pool, parse_id(&id)?).await?, NOT_FOUND)?;
    Ok(ok(user.into()))
}

pub async fn create(
    State(state): State<AppState>,
    Session(claims): Session,
    Json(input): Json<UserInput>,
) -> Result<Reply<UserView>, AppError> {
    claims.require(ADMIN_ONLY)?;
    validate_user(&input, false)?;
    let user = UserService::create(&state.pool, &input).await?;
    Ok(created(user, "Пользователь создан"))
}

pub async fn update(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
    Json(input): Json<UserInput>,
) -> Result<Reply<UserView>, AppError> {
    claims.require(ADMIN_ONLY)?;
    validate_user(&input, true)?;
    let user = UserService::update(&state.pool, parse_id(&id)?, &input, claims.sub).await?;
    Ok(ok_with_message(found(user, NOT_FOUND)?, "Пользователь обновлён"))
}

pub async fn toggle(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<UserView>, AppError> {
    claims.require(ADMIN_ONLY)?;
    let user = found(UserService::toggle(&state.pool, parse_id(&id)?, claims.sub).await?, NOT_FOUND)?;
    let message = if user.is_active { "Пользователь активирован" } else { "Пользователь деактивирован" };
    Ok(ok_with_message(user, message))
}

pub async fn delete(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Option<()>>, AppError> {
    claims.require(ADMIN_ONLY)?;
    if !UserService::delete(&state.pool, parse_id(&id)?, claims.sub).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    Ok(done("Пользователь удалён"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!(parse_role("admin").unwrap(), Role::Admin);
        assert_eq!(parse_role(" MODERATOR ").unwrap(), Role::Moderator);
        assert!(parse_role("owner").is_err());
    }
}
