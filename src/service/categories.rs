use super::{clean, clearable, fetch_all};
use crate::error::AppError;
use crate::models::{Category, CategoryInput};
use crate::service::validation::FieldErrors;
use crate::sql::ListQuery;
use crate::util::slugify;
use sqlx::PgPool;
use uuid::Uuid;

/// Admin view counts every product in the category.
const COLUMNS: &str = "c.id, c.name, c.slug, c.description, c.sort_order, c.is_active, \
    (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count, \
    c.created_at, c.updated_at";
/// Public view counts only products shown in the catalog.
const PUBLIC_COLUMNS: &str = "c.id, c.name, c.slug, c.description, c.sort_order, c.is_active, \
    (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id AND p.is_active) AS product_count, \
    c.created_at, c.updated_at";
const ORDER: &str = "c.sort_order ASC, c.name ASC";

pub struct CategoryService;

impl CategoryService {
    pub async fn list_public(pool: &PgPool) -> Result<Vec<Category>, AppError> {
        let mut q = ListQuery::new("product_categories c");
        q.eq("c.is_active", true).order_by(ORDER);
        fetch_all(pool, &q, PUBLIC_COLUMNS).await
    }

    pub async fn list(pool: &PgPool, search: Option<&str>, active: Option<bool>) -> Result<Vec<Category>, AppError> {
        let mut q = ListQuery::new("product_categories c");
        if let Some(active) = active {
            q.eq("c.is_active", active);
        }
        if let Some(term) = search {
            q.search(&["c.name", "c.slug"], term);
        }
        q.order_by(ORDER);
        fetch_all(pool, &q, COLUMNS).await
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Category>, AppError> {
        let sql = format!("SELECT {} FROM product_categories c WHERE c.id = $1", COLUMNS);
        Ok(sqlx::query_as::<_, Category>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn get_public_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, AppError> {
        let sql = format!(
            "SELECT {} FROM product_categories c WHERE c.slug = $1 AND c.is_active",
            PUBLIC_COLUMNS
        );
        Ok(sqlx::query_as::<_, Category>(&sql).bind(slug).fetch_optional(pool).await?)
    }

    pub async fn create(pool: &PgPool, input: &CategoryInput) -> Result<Category, AppError> {
        let name = clean(&input.name).ok_or_else(|| AppError::validation("name is required"))?;
        let slug = clean(&input.slug).unwrap_or_else(|| slugify(&name));
        if slug.is_empty() {
            let mut errors = FieldErrors::default();
            errors.add("slug", "Не удалось сформировать адрес из названия, укажите его вручную");
            errors.into_result()?;
        }
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO product_categories (name, slug, description, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&name)
        .bind(&slug)
        .bind(clean(&input.description))
        .bind(input.sort_order.unwrap_or(0))
        .bind(input.is_active.unwrap_or(true))
        .fetch_one(pool)
        .await?;
        tracing::info!(category = %id, slug = %slug, "category created");
        Self::get(pool, id).await?.ok_or_else(|| AppError::Internal("created category vanished".into()))
    }

    pub async fn update(pool: &PgPool, id: Uuid, input: &CategoryInput) -> Result<Option<Category>, AppError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"UPDATE product_categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = CASE WHEN $4::text IS NULL THEN description ELSE NULLIF($4, '') END,
                sort_order = COALESCE($5, sort_order),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
               WHERE id = $1
               RETURNING id"#,
        )
        .bind(id)
        .bind(clean(&input.name))
        .bind(clean(&input.slug))
        .bind(clearable(&input.description))
        .bind(input.sort_order)
        .bind(input.is_active)
        .fetch_optional(pool)
        .await?;
        match row {
            Some(_) => Self::get(pool, id).await,
            None => Ok(None),
        }
    }

    pub async fn toggle(pool: &PgPool, id: Uuid) -> Result<Option<Category>, AppError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "UPDATE product_categories SET is_active = NOT is_active, updated_at = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        match row {
            Some(_) => Self::get(pool, id).await,
            None => Ok(None),
        }
    }

    /// Categories that still own products cannot be deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        let Some(category) = Self::get(pool, id).await? else {
            return Ok(false);
        };
        if category.product_count > 0 {
            return Err(AppError::Conflict(format!(
                "Нельзя удалить категорию «{}»: в ней {} товар(ов)",
                category.name, category.product_count
            )));
        }
        let result = sqlx::query("DELETE FROM product_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        tracing::info!(category = %id, "category deleted");
        Ok(result.rows_affected() > 0)
    }
}
