use crate::config::SessionSettings;
use crate::error::AppError;
use crate::models::{Role, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "site_session";

pub const STAFF: &[Role] = &[Role::Admin, Role::Moderator];
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Verified session claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// 403 unless the session's role is one of `allowed`.
    pub fn require(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            tracing::warn!(user = %self.sub, role = self.role.as_str(), "role not permitted");
            Err(AppError::Forbidden("Недостаточно прав".into()))
        }
    }
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(settings: &SessionSettings) -> Self {
        SessionKeys {
            encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            ttl: Duration::hours(settings.ttl_hours),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn claims_for(&self, user: &User) -> Claims {
        let now = Utc::now();
        Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            department: user.department.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        }
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign session: {}", e)))
    }

    /// Signature and expiry are checked; any failure is a 401.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("session rejected: {}", e);
                AppError::Unauthorized("Сессия недействительна или истекла".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> SessionKeys {
        SessionKeys::new(&SessionSettings {
            secret: secret.into(),
            ttl_hours: 24,
            cookie_secure: false,
        })
    }

    fn claims(role: Role, exp_offset: Duration) -> Claims {
        let now = Utc::now();
        Claims {
            sub: Uuid::new_v4(),
            email: "moderator@example.com".into(),
            name: "Мария".into(),
            role,
            department: Some("Продажи".into()),
            iat: now.timestamp(),
            exp: (now + exp_offset).timestamp(),
        }
    }

    #[test]
    fn issued_token_verifies() {
        let k = keys("0123456789abcdef0123456789abcdef");
        let c = claims(Role::Moderator, Duration::hours(1));
        let token = k.issue(&c).unwrap();
        assert_eq!(k.verify(&token).unwrap(), c);
    }

    #[test]
    fn foreign_signature_rejected() {
        let token = keys("0123456789abcdef0123456789abcdef")
            .issue(&claims(Role::Admin, Duration::hours(1)))
            .unwrap();
        let other = keys("fedcba9876543210fedcba9876543210");
        assert!(matches!(other.verify(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn expired_token_rejected() {
        let k = keys("0123456789abcdef0123456789abcdef");
        let token = k.issue(&claims(Role::Admin, Duration::hours(-2))).unwrap();
        assert!(matches!(k.verify(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn role_sets() {
        let moderator = claims(Role::Moderator, Duration::hours(1));
        assert!(moderator.require(STAFF).is_ok());
        assert!(matches!(moderator.require(ADMIN_ONLY), Err(AppError::Forbidden(_))));
        let admin = claims(Role::Admin, Duration::hours(1));
        assert!(admin.require(ADMIN_ONLY).is_ok());
    }
}
