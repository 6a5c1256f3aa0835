//! Back-office API. Every handler checks the session role itself.

use crate::handlers::{categories, certificates, contacts, products, questionnaires, stats, users};
use crate::state::AppState;
use axum::{
    routing::{get, patch},
    Router,
};

pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/stats", get(stats::dashboard))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::get).put(products::update).delete(products::delete),
        )
        .route("/products/:id/toggle", patch(products::toggle))
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::get).put(categories::update).delete(categories::delete),
        )
        .route("/categories/:id/toggle", patch(categories::toggle))
        .route("/certificates", get(certificates::list).post(certificates::create))
        .route(
            "/certificates/:id",
            get(certificates::get).put(certificates::update).delete(certificates::delete),
        )
        .route("/certificates/:id/toggle", patch(certificates::toggle))
        .route("/questionnaires", get(questionnaires::list).post(questionnaires::create))
        .route(
            "/questionnaires/:id",
            get(questionnaires::get)
                .put(questionnaires::update)
                .delete(questionnaires::delete),
        )
        .route("/questionnaires/:id/toggle", patch(questionnaires::toggle))
        .route("/contacts", get(contacts::list))
        .route(
            "/contacts/:id",
            get(contacts::get).put(contacts::update_notes).delete(contacts::delete),
        )
        .route("/contacts/:id/status", patch(contacts::set_status))
        .route("/users", get(users::list).post(users::create))
        .route("/users/:id", get(users::get).put(users::update).delete(users::delete))
        .route("/users/:id/toggle", patch(users::toggle))
        .with_state(state)
}
