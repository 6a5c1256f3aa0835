//! Settings validation: bounds and cross-field consistency.

use crate::config::Settings;
use crate::error::ConfigError;

pub const MIN_SECRET_LEN: usize = 32;
pub const MIN_PASSWORD_LEN: usize = 8;
/// One year; also keeps the window well inside chrono's `Duration` range.
pub const MAX_RATE_LIMIT_WINDOW_SECS: u64 = 366 * 24 * 60 * 60;

pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.session.secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::Invalid {
            key: "SESSION_SECRET",
            reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
        });
    }
    if settings.session.ttl_hours <= 0 {
        return Err(ConfigError::Invalid {
            key: "SESSION_TTL_HOURS",
            reason: "must be positive".into(),
        });
    }
    if settings.db_max_connections == 0 {
        return Err(ConfigError::Invalid {
            key: "DB_MAX_CONNECTIONS",
            reason: "must be positive".into(),
        });
    }
    if settings.rate_limit.max_requests == 0 {
        return Err(ConfigError::Invalid {
            key: "RATE_LIMIT_MAX",
            reason: "must be positive".into(),
        });
    }
    if settings.rate_limit.window_secs == 0 {
        return Err(ConfigError::Invalid {
            key: "RATE_LIMIT_WINDOW_SECS",
            reason: "must be positive".into(),
        });
    }
    if settings.rate_limit.window_secs > MAX_RATE_LIMIT_WINDOW_SECS {
        return Err(ConfigError::Invalid {
            key: "RATE_LIMIT_WINDOW_SECS",
            reason: format!("must be at most {} seconds", MAX_RATE_LIMIT_WINDOW_SECS),
        });
    }
    if settings.body_limit_bytes == 0 {
        return Err(ConfigError::Invalid {
            key: "BODY_LIMIT_BYTES",
            reason: "must be positive".into(),
        });
    }
    if let Some(admin) = &settings.bootstrap_admin {
        if !admin.email.contains('@') {
            return Err(ConfigError::Invalid {
                key: "ADMIN_EMAIL",
                reason: "must be an email address".into(),
            });
        }
        if admin.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ConfigError::Invalid {
                key: "ADMIN_PASSWORD",
                reason: format!("must be at least {} characters", MIN_PASSWORD_LEN),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        Settings::from_lookup(|k| map.get(k).map(|v| v.to_string()))
    }

    #[test]
    fn short_secret_rejected() {
        let err = settings(&[("SESSION_SECRET", "short")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SESSION_SECRET", .. }));
    }

    #[test]
    fn zero_window_rejected() {
        let err = settings(&[
            ("SESSION_SECRET", "0123456789abcdef0123456789abcdef"),
            ("RATE_LIMIT_WINDOW_SECS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "RATE_LIMIT_WINDOW_SECS", .. }));
    }

    #[test]
    fn huge_window_rejected() {
        let err = settings(&[
            ("SESSION_SECRET", "0123456789abcdef0123456789abcdef"),
            ("RATE_LIMIT_WINDOW_SECS", "18446744073709551615"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "RATE_LIMIT_WINDOW_SECS", .. }));

        let ok = settings(&[
            ("SESSION_SECRET", "0123456789abcdef0123456789abcdef"),
            ("RATE_LIMIT_WINDOW_SECS", "31622400"),
        ]);
        assert!(ok.is_ok());
    }

    #[test]
    fn weak_admin_password_rejected() {
        let err = settings(&[
            ("SESSION_SECRET", "0123456789abcdef0123456789abcdef"),
            ("ADMIN_EMAIL", "admin@example.com"),
            ("ADMIN_PASSWORD", "123"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ADMIN_PASSWORD", .. }));
    }
}
