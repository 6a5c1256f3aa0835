//! Runtime settings, loaded once at process start.

use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub session: SessionSettings,
    pub rate_limit: RateLimitSettings,
    /// Take the client address from `X-Real-IP`/`X-Forwarded-For`. Only for deployments
    /// behind a reverse proxy that sets those headers itself.
    pub trust_proxy_headers: bool,
    /// Built frontend bundle (public pages and admin UI). Not served when unset.
    pub static_dir: Option<PathBuf>,
    pub body_limit_bytes: usize,
    pub site: SiteInfo,
    pub bootstrap_admin: Option<AdminBootstrap>,
}

#[derive(Clone)]
pub struct SessionSettings {
    /// HS256 signing key for session tokens.
    pub secret: String,
    pub ttl_hours: i64,
    pub cookie_secure: bool,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        RateLimitSettings {
            max_requests: 3,
            window_secs: 24 * 60 * 60,
        }
    }
}

/// Public site metadata, exposed as-is by `GET /api/site`.
#[derive(Clone, Debug, Serialize)]
pub struct SiteInfo {
    pub name: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
