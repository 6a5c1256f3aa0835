//! Router assembly.

mod admin;
mod auth;
mod common;
mod pages;
mod public;

pub use admin::admin_routes;
pub use auth::auth_routes;
pub use common::common_routes;
pub use pages::{admin_page_guard, page_routes};
pub use public::public_routes;

use crate::error::AppError;
use crate::state::AppState;
use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

async fn api_not_found() -> AppError {
    AppError::NotFound("Маршрут не найден".into())
}

/// The whole application: health endpoints, `/api`, and browser pages.
pub fn app(state: AppState) -> Router {
    let body_limit = state.settings.body_limit_bytes;
    let api = Router::new()
        .merge(public_routes(state.clone()))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/admin", admin_routes(state.clone()))
        .fallback(api_not_found);
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", api)
        .merge(page_routes(&state))
        .layer(middleware::from_fn_with_state(state, admin_page_guard))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
}
