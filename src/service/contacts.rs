use super::fetch_page;
use crate::error::AppError;
use crate::models::{ContactRequest, ContactSource, ContactStatus, NewContactRequest};
use crate::pagination::PageParams;
use crate::sql::{order_clause, ListQuery};
use crate::util::{format_date_time, sanitize_input, truncate_text};
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, name, phone, email, company, message, product_id, product_name, source, status, \
    notes, contacted_at, created_at, updated_at";
const DEFAULT_ORDER: &str = "created_at DESC";
const SORTABLE: &[(&str, &str)] = &[
    ("created_at", "created_at"),
    ("updated_at", "updated_at"),
    ("name", "name"),
    ("status", "status"),
];

#[derive(Debug, Default, Clone)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
    pub source: Option<ContactSource>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

pub struct ContactService;

impl ContactService {
    pub async fn create(pool: &PgPool, req: &NewContactRequest) -> Result<ContactRequest, AppError> {
        let sql = format!(
            "INSERT INTO contact_requests (name, phone, email, company, message, product_id, product_name, source) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, ContactRequest>(&sql)
            .bind(&req.name)
            .bind(&req.phone)
            .bind(&req.email)
            .bind(&req.company)
            .bind(&req.message)
            .bind(req.product_id)
            .bind(&req.product_name)
            .bind(req.source)
            .fetch_one(pool)
            .await?;
        tracing::info!(
            contact = %row.id,
            source = ?row.source,
            product = ?row.product_id,
            received = %format_date_time(row.created_at),
            preview = %truncate_text(row.message.as_deref().unwrap_or(""), 60),
            "contact request received"
        );
        Ok(row)
    }

    pub async fn list(
        pool: &PgPool,
        filter: &ContactFilter,
        page: PageParams,
    ) -> Result<(Vec<ContactRequest>, i64), AppError> {
        let mut q = ListQuery::new("contact_requests");
        if let Some(status) = filter.status {
            q.eq_cast("status", status.as_str(), "contact_status");
        }
        if let Some(source) = filter.source {
            let source = match source {
                ContactSource::Contact => "contact",
                ContactSource::Order => "order",
            };
            q.eq_cast("source", source, "contact_source");
        }
        if let Some(term) = &filter.search {
            q.search(&["name", "phone", "email", "company", "product_name"], term);
        }
        q.order_by(&order_clause(
            filter.sort_by.as_deref(),
            filter.sort_order.as_deref(),
            SORTABLE,
            DEFAULT_ORDER,
        ));
        fetch_page(pool, &q, COLUMNS, page).await
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<ContactRequest>, AppError> {
        let sql = format!("SELECT {} FROM contact_requests WHERE id = $1", COLUMNS);
        Ok(sqlx::query_as::<_, ContactRequest>(&sql).bind(id).fetch_optional(pool).await?)
    }

    /// The first move out of `new` stamps `contacted_at`; later changes keep it.
    pub async fn set_status(pool: &PgPool, id: Uuid, status: ContactStatus) -> Result<Option<ContactRequest>, AppError> {
        let sql = format!(
            r#"UPDATE contact_requests SET
                status = $2,
                contacted_at = CASE WHEN $2 <> 'new'::contact_status AND contacted_at IS NULL THEN NOW() ELSE contacted_at END,
                updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            COLUMNS
        );
        let row = sqlx::query_as::<_, ContactRequest>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await?;
        if let Some(r) = &row {
            tracing::info!(contact = %r.id, status = status.as_str(), "contact status changed");
        }
        Ok(row)
    }

    /// Blank notes clear the field.
    pub async fn update_notes(pool: &PgPool, id: Uuid, notes: Option<&str>) -> Result<Option<ContactRequest>, AppError> {
        let notes = notes.map(sanitize_input).filter(|n| !n.is_empty());
        if notes.as_ref().is_some_and(|n| n.chars().count() > 2000) {
            return Err(AppError::validation("Заметка не должна превышать 2000 символов"));
        }
        let sql = format!(
            "UPDATE contact_requests SET notes = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        Ok(sqlx::query_as::<_, ContactRequest>(&sql)
            .bind(id)
            .bind(notes)
            .fetch_optional(pool)
            .await?)
    }

    /// Unprocessed (`new`) requests cannot be deleted. The status check is part of the
    /// DELETE itself; the follow-up read only tells a missing row from a `new` one.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contact_requests WHERE id = $1 AND status <> 'new'")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() > 0 {
            tracing::info!(contact = %id, "contact request deleted");
            return Ok(true);
        }
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM contact_requests WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        if exists {
            Err(AppError::Conflict(
                "Нельзя удалить необработанную заявку: сначала смените её статус".into(),
            ))
        } else {
            Ok(false)
        }
    }
}
