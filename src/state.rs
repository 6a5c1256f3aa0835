//! Shared application state for all routes.

use crate::auth::SessionKeys;
use crate::config::Settings;
use crate::rate_limit::RateLimiter;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub settings: Arc<Settings>,
    pub keys: SessionKeys,
    /// Public form submissions, per client address.
    pub form_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        AppState {
            pool,
            keys: SessionKeys::new(&settings.session),
            form_limiter: Arc::new(RateLimiter::new(settings.rate_limit)),
            settings: Arc::new(settings),
        }
    }
}
