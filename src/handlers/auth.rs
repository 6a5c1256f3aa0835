//! Login, logout and the current-user endpoint.

use crate::auth::SESSION_COOKIE;
use crate::error::AppError;
use crate::extractors::Session;
use crate::models::{LoginRequest, UserView};
use crate::response::{done, ok, ok_with_message, Reply};
use crate::service::UserService;
use crate::state::AppState;
use axum::{extract::State, http::header, response::IntoResponse, Json};

/// `Set-Cookie` value for the session. `max_age_secs == 0` clears it.
pub(crate) fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Result<impl IntoResponse, AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Введите email и пароль"));
    }
    let user = UserService::authenticate(&state.pool, &req.email, &req.password).await?;
    let claims = state.keys.claims_for(&user);
    let token = state.keys.issue(&claims)?;
    let cookie = session_cookie(
        &token,
        state.keys.ttl().num_seconds(),
        state.settings.session.cookie_secure,
    );
    tracing::info!(user = %user.id, role = user.role.as_str(), "login");
    Ok((
        [(header::SET_COOKIE, cookie)],
        ok_with_message(UserView::from(user), "Вход выполнен"),
    ))
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = session_cookie("", 0, state.settings.session.cookie_secure);
    ([(header::SET_COOKIE, cookie)], done("Выход выполнен"))
}

/// The account behind the session, re-read so deactivation takes effect at once.
pub async fn me(State(state): State<AppState>, Session(claims): Session) -> Result<Reply<UserView>, AppError> {
    match UserService::get(&state.pool, claims.sub).await? {
        Some(user) if user.is_active => Ok(ok(user.into())),
        _ => Err(AppError::Unauthorized("Сессия недействительна или истекла".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_attributes() {
        let c = session_cookie("tok", 86400, false);
        assert_eq!(c, format!("{}=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400", SESSION_COOKIE));
        assert!(session_cookie("tok", 60, true).ends_with("; Secure"));
    }

    #[test]
    fn clearing_cookie_expires_now() {
        let c = session_cookie("", 0, false);
        assert!(c.starts_with(&format!("{}=;", SESSION_COOKIE)));
        assert!(c.contains("Max-Age=0"));
    }
}
