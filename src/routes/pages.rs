//! Browser pages: the static bundle with SPA fallback, and the `/admin` session guard.

use crate::auth::STAFF;
use crate::error::AppError;
use crate::extractors::session_token;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

/// `/admin` itself and anything below it, with or without a trailing slash.
fn is_admin_page(path: &str) -> bool {
    path == "/admin" || path.starts_with("/admin/")
}

/// Where an `/admin` page request should go instead, if anywhere.
fn guard_redirect(state: &AppState, req: &Request) -> Option<String> {
    if !is_admin_page(req.uri().path()) {
        return None;
    }
    let claims = session_token(req.headers()).and_then(|t| state.keys.verify(&t).ok());
    match claims {
        Some(c) if STAFF.contains(&c.role) => None,
        Some(c) => {
            tracing::warn!(user = %c.sub, role = c.role.as_str(), "admin page forbidden");
            Some("/login?error=forbidden".to_string())
        }
        None => {
            let target = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/admin");
            Some(format!("/login?callbackUrl={}", urlencoding::encode(target)))
        }
    }
}

/// Applied to the whole application; requests outside `/admin` pass straight through.
pub async fn admin_page_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match guard_redirect(&state, &req) {
        Some(to) => Redirect::to(&to).into_response(),
        None => next.run(req).await,
    }
}

async fn no_bundle() -> AppError {
    AppError::NotFound("Страница не найдена".into())
}

/// Unmatched paths are served from the bundle; client-side routes get `index.html` with 200.
pub fn page_routes(state: &AppState) -> Router {
    match &state.settings.static_dir {
        Some(dir) => {
            let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            Router::new().fallback_service(spa)
        }
        None => Router::new().fallback(no_bundle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_paths() {
        assert!(is_admin_page("/admin"));
        assert!(is_admin_page("/admin/"));
        assert!(is_admin_page("/admin/users"));
        assert!(!is_admin_page("/administrator"));
        assert!(!is_admin_page("/api/admin/stats"));
        assert!(!is_admin_page("/"));
    }
}
