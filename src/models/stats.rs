use serde::Serialize;
use sqlx::FromRow;

/// Counters for the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub products_total: i64,
    pub products_active: i64,
    pub categories_total: i64,
    pub certificates_total: i64,
    pub questionnaires_total: i64,
    pub contacts_new: i64,
    pub contacts_in_progress: i64,
    pub contacts_completed: i64,
    pub users_total: i64,
}
