use crate::error::AppError;
use crate::models::DashboardStats;
use sqlx::PgPool;

const STATS_SQL: &str = r#"SELECT
    (SELECT COUNT(*) FROM products) AS products_total,
    (SELECT COUNT(*) FROM products WHERE is_active) AS products_active,
    (SELECT COUNT(*) FROM product_categories) AS categories_total,
    (SELECT COUNT(*) FROM certificates) AS certificates_total,
    (SELECT COUNT(*) FROM questionnaires) AS questionnaires_total,
    (SELECT COUNT(*) FROM contact_requests WHERE status = 'new') AS contacts_new,
    (SELECT COUNT(*) FROM contact_requests WHERE status = 'in_progress') AS contacts_in_progress,
    (SELECT COUNT(*) FROM contact_requests WHERE status = 'completed') AS contacts_completed,
    (SELECT COUNT(*) FROM users) AS users_total"#;

pub struct StatsService;

impl StatsService {
    pub async fn dashboard(pool: &PgPool) -> Result<DashboardStats, AppError> {
        Ok(sqlx::query_as::<_, DashboardStats>(STATS_SQL).fetch_one(pool).await?)
    }
}
