//! Load settings from the process environment (after `.env`) or any key lookup.

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/equipment_site";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

impl Settings {
    /// Read `.env` if present, then load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("no .env loaded: {}", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build and validate settings from a key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| {
            tracing::info!("DATABASE_URL not set, using default: {}", DEFAULT_DATABASE_URL);
            DEFAULT_DATABASE_URL.into()
        });
        let bind_addr = parse_or("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR.parse().ok())?;
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), Some(5))?;

        let session = SessionSettings {
            secret: get("SESSION_SECRET").ok_or(ConfigError::Missing("SESSION_SECRET"))?,
            ttl_hours: parse_or("SESSION_TTL_HOURS", get("SESSION_TTL_HOURS"), Some(24))?,
            cookie_secure: parse_bool("COOKIE_SECURE", get("COOKIE_SECURE"), false)?,
        };

        let defaults = RateLimitSettings::default();
        let rate_limit = RateLimitSettings {
            max_requests: parse_or("RATE_LIMIT_MAX", get("RATE_LIMIT_MAX"), Some(defaults.max_requests))?,
            window_secs: parse_or("RATE_LIMIT_WINDOW_SECS", get("RATE_LIMIT_WINDOW_SECS"), Some(defaults.window_secs))?,
        };

        let site = SiteInfo {
            name: get("SITE_NAME").unwrap_or_else(|| "Завод промышленного оборудования".into()),
            description: get("SITE_DESCRIPTION")
                .unwrap_or_else(|| "Производство и поставка промышленного оборудования".into()),
            phone: get("SITE_PHONE").unwrap_or_default(),
            email: get("SITE_EMAIL").unwrap_or_default(),
            address: get("SITE_ADDRESS").unwrap_or_default(),
        };

        let bootstrap_admin = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "ADMIN_EMAIL",
                    reason: "ADMIN_EMAIL and ADMIN_PASSWORD must be set together".into(),
                })
            }
        };

        let settings = Settings {
            database_url,
            bind_addr,
            db_max_connections,
            session,
            rate_limit,
            trust_proxy_headers: parse_bool("TRUST_PROXY_HEADERS", get("TRUST_PROXY_HEADERS"), false)?,
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            body_limit_bytes: parse_or("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), Some(1024 * 1024))?,
            site,
            bootstrap_admin,
        };
        validate(&settings)?;
        Ok(settings)
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: Option<T>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(s) => s.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => default.ok_or(ConfigError::Missing(key)),
    }
}

fn parse_bool(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::to_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            key,
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}
