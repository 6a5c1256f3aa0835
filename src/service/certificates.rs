use super::{clean, clearable, fetch_all, fetch_page};
use crate::error::AppError;
use crate::models::{Certificate, CertificateInput};
use crate::pagination::PageParams;
use crate::service::validation::check_certificate_dates;
use crate::sql::{order_clause, ListQuery};
use crate::util::format_date;
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, title, description, issue_date, expiry_date, image_url, is_active, sort_order, created_at, updated_at";
const DEFAULT_ORDER: &str = "sort_order ASC, issue_date DESC NULLS LAST";
const SORTABLE: &[(&str, &str)] = &[
    ("title", "title"),
    ("sort_order", "sort_order"),
    ("issue_date", "issue_date"),
    ("expiry_date", "expiry_date"),
    ("created_at", "created_at"),
];

#[derive(Debug, Default, Clone)]
pub struct CertificateFilter {
    pub search: Option<String>,
    pub active: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

pub struct CertificateService;

impl CertificateService {
    pub async fn list_public(pool: &PgPool) -> Result<Vec<Certificate>, AppError> {
        let mut q = ListQuery::new("certificates");
        q.eq("is_active", true).order_by(DEFAULT_ORDER);
        fetch_all(pool, &q, COLUMNS).await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &CertificateFilter,
        page: PageParams,
    ) -> Result<(Vec<Certificate>, i64), AppError> {
        let mut q = ListQuery::new("certificates");
        if let Some(active) = filter.active {
            q.eq("is_active", active);
        }
        if let Some(term) = &filter.search {
            q.search(&["title", "description"], term);
        }
        q.order_by(&order_clause(
            filter.sort_by.as_deref(),
            filter.sort_order.as_deref(),
            SORTABLE,
            DEFAULT_ORDER,
        ));
        fetch_page(pool, &q, COLUMNS, page).await
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Certificate>, AppError> {
        let sql = format!("SELECT {} FROM certificates WHERE id = $1", COLUMNS);
        Ok(sqlx::query_as::<_, Certificate>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn create(pool: &PgPool, input: &CertificateInput) -> Result<Certificate, AppError> {
        let title = clean(&input.title).ok_or_else(|| AppError::validation("title is required"))?;
        let image_url = clean(&input.image_url).ok_or_else(|| AppError::validation("imageUrl is required"))?;
        check_certificate_dates(input.issue_date, input.expiry_date)?;
        let sql = format!(
            "INSERT INTO certificates (title, description, issue_date, expiry_date, image_url, is_active, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            COLUMNS
        );
        let cert = sqlx::query_as::<_, Certificate>(&sql)
            .bind(&title)
            .bind(clean(&input.description))
            .bind(input.issue_date)
            .bind(input.expiry_date)
            .bind(&image_url)
            .bind(input.is_active.unwrap_or(true))
            .bind(input.sort_order.unwrap_or(0))
            .fetch_one(pool)
            .await?;
        tracing::info!(
            certificate = %cert.id,
            issued = %cert.issue_date.map(format_date).unwrap_or_default(),
            expires = %cert.expiry_date.map(format_date).unwrap_or_default(),
            "certificate created"
        );
        Ok(cert)
    }

    /// Dates are checked against the stored ones, so changing only the expiry still
    /// has to land after the existing issue date.
    pub async fn update(pool: &PgPool, id: Uuid, input: &CertificateInput) -> Result<Option<Certificate>, AppError> {
        let Some(current) = Self::get(pool, id).await? else {
            return Ok(None);
        };
        check_certificate_dates(
            input.issue_date.or(current.issue_date),
            input.expiry_date.or(current.expiry_date),
        )?;
        let sql = format!(
            r#"UPDATE certificates SET
                title = COALESCE($2, title),
                description = CASE WHEN $3::text IS NULL THEN description ELSE NULLIF($3, '') END,
                issue_date = COALESCE($4, issue_date),
                expiry_date = COALESCE($5, expiry_date),
                image_url = COALESCE($6, image_url),
                is_active = COALESCE($7, is_active),
                sort_order = COALESCE($8, sort_order),
                updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            COLUMNS
        );
        let cert = sqlx::query_as::<_, Certificate>(&sql)
            .bind(id)
            .bind(clean(&input.title))
            .bind(clearable(&input.description))
            .bind(input.issue_date)
            .bind(input.expiry_date)
            .bind(clean(&input.image_url))
            .bind(input.is_active)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await?;
        Ok(cert)
    }

    pub async fn toggle(pool: &PgPool, id: Uuid) -> Result<Option<Certificate>, AppError> {
        let sql = format!(
            "UPDATE certificates SET is_active = NOT is_active, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        Ok(sqlx::query_as::<_, Certificate>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM certificates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
