use super::{clean, fetch_all};
use crate::error::AppError;
use crate::models::{Questionnaire, QuestionnaireGroup, QuestionnaireInput};
use crate::sql::ListQuery;
use crate::util::group_by;
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, title, category, file_url, is_active, sort_order, created_at, updated_at";
const ORDER: &str = "category ASC, sort_order ASC, title ASC";

pub struct QuestionnaireService;

impl QuestionnaireService {
    /// `active: Some(true)` for the public site, `None` for the admin list.
    pub async fn list(
        pool: &PgPool,
        category: Option<&str>,
        active: Option<bool>,
        search: Option<&str>,
    ) -> Result<Vec<Questionnaire>, AppError> {
        let mut q = ListQuery::new("questionnaires");
        if let Some(active) = active {
            q.eq("is_active", active);
        }
        if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
            q.eq("category", category);
        }
        if let Some(term) = search {
            q.search(&["title", "category"], term);
        }
        q.order_by(ORDER);
        fetch_all(pool, &q, COLUMNS).await
    }

    /// Group an ordered list by category tag, keeping the order categories first appear in.
    pub fn group(items: Vec<Questionnaire>) -> Vec<QuestionnaireGroup> {
        group_by(items, |q| q.category.clone())
            .into_iter()
            .map(|(category, items)| QuestionnaireGroup { category, items })
            .collect()
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Questionnaire>, AppError> {
        let sql = format!("SELECT {} FROM questionnaires WHERE id = $1", COLUMNS);
        Ok(sqlx::query_as::<_, Questionnaire>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn create(pool: &PgPool, input: &QuestionnaireInput) -> Result<Questionnaire, AppError> {
        let title = clean(&input.title).ok_or_else(|| AppError::validation("title is required"))?;
        let category = clean(&input.category).ok_or_else(|| AppError::validation("category is required"))?;
        let file_url = clean(&input.file_url).ok_or_else(|| AppError::validation("fileUrl is required"))?;
        let sql = format!(
            "INSERT INTO questionnaires (title, category, file_url, is_active, sort_order) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLUMNS
        );
        let item = sqlx::query_as::<_, Questionnaire>(&sql)
            .bind(&title)
            .bind(&category)
            .bind(&file_url)
            .bind(input.is_active.unwrap_or(true))
            .bind(input.sort_order.unwrap_or(0))
            .fetch_one(pool)
            .await?;
        tracing::info!(questionnaire = %item.id, category = %item.category, "questionnaire created");
        Ok(item)
    }

    pub async fn update(pool: &PgPool, id: Uuid, input: &QuestionnaireInput) -> Result<Option<Questionnaire>, AppError> {
        let sql = format!(
            r#"UPDATE questionnaires SET
                title = COALESCE($2, title),
                category = COALESCE($3, category),
                file_url = COALESCE($4, file_url),
                is_active = COALESCE($5, is_active),
                sort_order = COALESCE($6, sort_order),
                updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            COLUMNS
        );
        Ok(sqlx::query_as::<_, Questionnaire>(&sql)
            .bind(id)
            .bind(clean(&input.title))
            .bind(clean(&input.category))
            .bind(clean(&input.file_url))
            .bind(input.is_active)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn toggle(pool: &PgPool, id: Uuid) -> Result<Option<Questionnaire>, AppError> {
        let sql = format!(
            "UPDATE questionnaires SET is_active = NOT is_active, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        Ok(sqlx::query_as::<_, Questionnaire>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM questionnaires WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(title: &str, category: &str) -> Questionnaire {
        Questionnaire {
            id: Uuid::new_v4(),
            title: title.into(),
            category: category.into(),
            file_url: format!("/files/{}.pdf", title),
            is_active: true,
            sort_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let groups = QuestionnaireService::group(vec![
            item("a", "pumps"),
            item("b", "pumps"),
            item("c", "valves"),
            item("d", "pumps"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "pumps");
        assert_eq!(groups[0].items.len(), 3);
        assert_eq!(groups[1].category, "valves");
        assert_eq!(groups[1].items[0].title, "c");
    }

    #[test]
    fn empty_list_has_no_groups() {
        assert!(QuestionnaireService::group(Vec::new()).is_empty());
    }
}
