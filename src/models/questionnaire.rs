use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub id: Uuid,
    pub title: String,
    /// Category tag, e.g. `pumps`.
    pub category: String,
    pub file_url: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionnaireGroup {
    pub category: String,
    pub items: Vec<Questionnaire>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireInput {
    pub title: Option<String>,
    pub category: Option<String>,
    pub file_url: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}
