use crate::auth::STAFF;
use crate::error::AppError;
use crate::extractors::Session;
use crate::models::DashboardStats;
use crate::response::{ok, Reply};
use crate::service::StatsService;
use crate::state::AppState;
use axum::extract::State;

pub async fn dashboard(State(state): State<AppState>, Session(claims): Session) -> Result<Reply<DashboardStats>, AppError> {
    claims.require(STAFF)?;
    let stats = StatsService::dashboard(&state.pool).await?;
    Ok(ok(stats))
}
