//! Data access per resource, plus payload validation.

mod categories;
mod certificates;
mod contacts;
mod products;
mod questionnaires;
mod stats;
mod users;
pub mod validation;

pub use categories::CategoryService;
pub use certificates::{CertificateFilter, CertificateService};
pub use contacts::{ContactFilter, ContactService};
pub use products::{ProductFilter, ProductService};
pub use questionnaires::QuestionnaireService;
pub use stats::StatsService;
pub use users::{UserFilter, UserService};

use crate::error::AppError;
use crate::pagination::PageParams;
use crate::sql::{bind_all, ListQuery};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

/// One page of rows plus the total matching the same filters.
pub(crate) async fn fetch_page<T>(
    pool: &PgPool,
    query: &ListQuery,
    columns: &str,
    page: PageParams,
) -> Result<(Vec<T>, i64), AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let count = query.count();
    tracing::debug!(sql = %count.sql, params = ?count.params, "query");
    let (total,): (i64,) = bind_all(sqlx::query_as(&count.sql), &count.params)
        .fetch_one(pool)
        .await?;
    let select = query.select(columns, page);
    tracing::debug!(sql = %select.sql, params = ?select.params, "query");
    let rows = bind_all(sqlx::query_as::<_, T>(&select.sql), &select.params)
        .fetch_all(pool)
        .await?;
    Ok((rows, total))
}

/// Every row matching the filters, for short unpaginated lists.
pub(crate) async fn fetch_all<T>(pool: &PgPool, query: &ListQuery, columns: &str) -> Result<Vec<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let select = query.select_all(columns);
    tracing::debug!(sql = %select.sql, params = ?select.params, "query");
    let rows = bind_all(sqlx::query_as::<_, T>(&select.sql), &select.params)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Trimmed text, `None` when absent or blank.
pub(crate) fn clean(v: &Option<String>) -> Option<String> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// For nullable columns on update: absent stays `None` (keep), blank becomes `Some("")` (clear).
pub(crate) fn clearable(v: &Option<String>) -> Option<String> {
    v.as_deref().map(|s| s.trim().to_string())
}
