use super::{clean, clearable, fetch_page};
use crate::auth::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{Role, User, UserInput, UserView};
use crate::pagination::PageParams;
use crate::sql::{order_clause, ListQuery};
use crate::util::normalize_phone;
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, email, name, phone, department, role, is_active, password_hash, last_login_at, created_at, updated_at";
const DEFAULT_ORDER: &str = "created_at DESC";
const SORTABLE: &[(&str, &str)] = &[
    ("name", "name"),
    ("email", "email"),
    ("role", "role"),
    ("created_at", "created_at"),
    ("last_login_at", "last_login_at"),
];

#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

pub struct UserService;

fn phone_value(raw: &Option<String>) -> Option<String> {
    clearable(raw).map(|p| if p.is_empty() { p } else { normalize_phone(&p).unwrap_or(p) })
}

impl UserService {
    /// Credential check for login. Unknown email and wrong password read the same.
    pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<User, AppError> {
        let invalid = || AppError::Unauthorized("Неверный email или пароль".into());
        let sql = format!("SELECT {} FROM users WHERE email = $1", COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.trim().to_lowercase())
            .fetch_optional(pool)
            .await?
            .ok_or_else(invalid)?;
        if !verify_password(password, &user.password_hash) {
            tracing::warn!(user = %user.id, "failed login");
            return Err(invalid());
        }
        if !user.is_active {
            tracing::warn!(user = %user.id, "login to deactivated account");
            return Err(AppError::Unauthorized("Учётная запись отключена".into()));
        }
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(user.id)
            .execute(pool)
            .await?;
        Ok(user)
    }

    pub async fn list(pool: &PgPool, filter: &UserFilter, page: PageParams) -> Result<(Vec<UserView>, i64), AppError> {
        let mut q = ListQuery::new("users");
        if let Some(role) = filter.role {
            q.eq_cast("role", role.as_str(), "user_role");
        }
        if let Some(active) = filter.active {
            q.eq("is_active", active);
        }
        if let Some(term) = &filter.search {
            q.search(&["name", "email", "department"], term);
        }
        q.order_by(&order_clause(
            filter.sort_by.as_deref(),
            filter.sort_order.as_deref(),
            SORTABLE,
            DEFAULT_ORDER,
        ));
        let (rows, total) = fetch_page::<User>(pool, &q, COLUMNS, page).await?;
        Ok((rows.into_iter().map(UserView::from).collect(), total))
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn create(pool: &PgPool, input: &UserInput) -> Result<UserView, AppError> {
        let email = clean(&input.email)
            .map(|e| e.to_lowercase())
            .ok_or_else(|| AppError::validation("email is required"))?;
        let name = clean(&input.name).ok_or_else(|| AppError::validation("name is required"))?;
        let password = clean(&input.password).ok_or_else(|| AppError::validation("password is required"))?;
        let role = input.role.ok_or_else(|| AppError::validation("role is required"))?;
        let hash = hash_password(&password)?;
        let sql = format!(
            "INSERT INTO users (email, name, phone, department, role, is_active, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&email)
            .bind(&name)
            .bind(phone_value(&input.phone).filter(|p| !p.is_empty()))
            .bind(clean(&input.department))
            .bind(role)
            .bind(input.is_active.unwrap_or(true))
            .bind(&hash)
            .fetch_one(pool)
            .await?;
        tracing::info!(user = %user.id, role = role.as_str(), "user created");
        Ok(user.into())
    }

    /// `acting` is the admin making the change; they cannot deactivate their own account.
    pub async fn update(pool: &PgPool, id: Uuid, input: &UserInput, acting: Uuid) -> Result<Option<UserView>, AppError> {
        if id == acting && input.is_active == Some(false) {
            return Err(AppError::BadRequest("Нельзя деактивировать собственную учётную запись".into()));
        }
        let hash = match clean(&input.password) {
            Some(p) => Some(hash_password(&p)?),
            None => None,
        };
        let sql = format!(
            r#"UPDATE users SET
                email = COALESCE($2, email),
                name = COALESCE($3, name),
                phone = CASE WHEN $4::text IS NULL THEN phone ELSE NULLIF($4, '') END,
                department = CASE WHEN $5::text IS NULL THEN department ELSE NULLIF($5, '') END,
                role = COALESCE($6, role),
                is_active = COALESCE($7, is_active),
                password_hash = COALESCE($8, password_hash),
                updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(clean(&input.email).map(|e| e.to_lowercase()))
            .bind(clean(&input.name))
            .bind(phone_value(&input.phone))
            .bind(clearable(&input.department))
            .bind(input.role)
            .bind(input.is_active)
            .bind(hash)
            .fetch_optional(pool)
            .await?;
        Ok(user.map(UserView::from))
    }

    pub async fn toggle(pool: &PgPool, id: Uuid, acting: Uuid) -> Result<Option<UserView>, AppError> {
        if id == acting {
            return Err(AppError::BadRequest("Нельзя деактивировать собственную учётную запись".into()));
        }
        let sql = format!(
            "UPDATE users SET is_active = NOT is_active, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(pool).await?;
        if let Some(u) = &user {
            tracing::info!(user = %u.id, active = u.is_active, "user toggled");
        }
        Ok(user.map(UserView::from))
    }

    pub async fn delete(pool: &PgPool, id: Uuid, acting: Uuid) -> Result<bool, AppError> {
        if id == acting {
            return Err(AppError::BadRequest("Нельзя удалить собственную учётную запись".into()));
        }
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() > 0 {
            tracing::info!(user = %id, "user deleted");
        }
        Ok(result.rows_affected() > 0)
    }
}
