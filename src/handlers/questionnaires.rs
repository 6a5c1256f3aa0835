use super::{found, parse_flag, parse_id};
use crate::auth::STAFF;
use crate::error::AppError;
use crate::extractors::Session;
use crate::models::{Questionnaire, QuestionnaireGroup, QuestionnaireInput};
use crate::response::{created, done, ok, ok_with_message, Reply};
use crate::service::validation::validate_questionnaire;
use crate::service::QuestionnaireService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

const NOT_FOUND: &str = "Анкета не найдена";

#[derive(Debug, Default, Deserialize)]
pub struct PublicQuestionnaireQuery {
    category: Option<String>,
    grouped: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminQuestionnaireQuery {
    category: Option<String>,
    search: Option<String>,
    active: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum QuestionnaireList {
    Flat(Vec<Questionnaire>),
    Grouped(Vec<QuestionnaireGroup>),
}

pub async fn list_public(
    State(state): State<AppState>,
    Query(q): Query<PublicQuestionnaireQuery>,
) -> Result<Reply<QuestionnaireList>, AppError> {
    let items = QuestionnaireService::list(&state.pool, q.category.as_deref(), Some(true), None).await?;
    let data = if parse_flag(q.grouped.as_deref()) == Some(true) {
        QuestionnaireList::Grouped(QuestionnaireService::group(items))
    } else {
        QuestionnaireList::Flat(items)
    };
    Ok(ok(data))
}

pub async fn list(
    State(state): State<AppState>,
    Session(claims): Session,
    Query(q): Query<AdminQuestionnaireQuery>,
) -> Result<Reply<Vec<Questionnaire>>, AppError> {
    claims.require(STAFF)?;
    let items = QuestionnaireService::list(
        &state.pool,
        q.category.as_deref(),
        parse_flag(q.active.as_deref()),
        q.search.as_deref(),
    )
    .await?;
    Ok(ok(items))
}

pub async fn get(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Questionnaire>, AppError> {
    claims.require(STAFF)?;
    let item = QuestionnaireService::get(&state.pool, parse_id(&id)?).await?;
    Ok(ok(found(item, NOT_FOUND)?))
}

pub async fn create(
    State(state): State<AppState>,
    Session(claims): Session,
    Json(input): Json<QuestionnaireInput>,
) -> Result<Reply<Questionnaire>, AppError> {
    claims.require(STAFF)?;
    validate_questionnaire(&input, false)?;
    let item = QuestionnaireService::create(&state.pool, &input).await?;
    Ok(created(item, "Анкета добавлена"))
}

pub async fn update(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
    Json(input): Json<QuestionnaireInput>,
) -> Result<Reply<Questionnaire>, AppError> {
    claims.require(STAFF)?;
    validate_questionnaire(&input, true)?;
    let item = QuestionnaireService::update(&state.pool, parse_id(&id)?, &input).await?;
    Ok(ok_with_message(found(item, NOT_FOUND)?, "Анкета обновлена"))
}

pub async fn toggle(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Questionnaire>, AppError> {
    claims.require(STAFF)?;
    let item = found(QuestionnaireService::toggle(&state.pool, parse_id(&id)?).await?, NOT_FOUND)?;
    let message = if item.is_active { "Анкета опубликована" } else { "Анкета скрыта" };
    Ok(ok_with_message(item, message))
}

pub async fn delete(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<String>,
) -> Result<Reply<Option<()>>, AppError> {
    claims.require(STAFF)?;
    if !QuestionnaireService::delete(&state.pool, parse_id(&id)?).await? {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    Ok(done("Анкета удалена"))
}
