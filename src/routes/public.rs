//! Unauthenticated site API: catalog reads and the two public forms.

use crate::handlers::{categories, certificates, contacts, products, questionnaires, site};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn public_routes(state: AppState) -> Router {
    Router::new()
        .route("/site", get(site::site_info))
        .route("/categories", get(categories::list_public))
        .route("/categories/:slug", get(categories::get_public))
        .route("/products", get(products::list_public))
        .route("/products/:slug", get(products::get_public))
        .route("/certificates", get(certificates::list_public))
        .route("/questionnaires", get(questionnaires::list_public))
        .route("/orders", post(contacts::submit_order))
        .route("/contacts", post(contacts::submit_contact))
        .with_state(state)
}
