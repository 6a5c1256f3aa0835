use super::{clean, clearable, fetch_page};
use crate::error::AppError;
use crate::models::{Product, ProductInput, ProductRow};
use crate::pagination::PageParams;
use crate::service::validation::FieldErrors;
use crate::sql::{order_clause, ListQuery};
use crate::util::slugify;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "p.id, p.name, p.slug, p.short_description, p.description, p.specifications, p.images, \
    p.is_active, p.sort_order, p.category_id, c.name AS category_name, c.slug AS category_slug, \
    p.created_at, p.updated_at";
const FROM: &str = "products p JOIN product_categories c ON c.id = p.category_id";
const DEFAULT_ORDER: &str = "p.sort_order ASC, p.name ASC";
const SORTABLE: &[(&str, &str)] = &[
    ("name", "p.name"),
    ("sort_order", "p.sort_order"),
    ("created_at", "p.created_at"),
    ("updated_at", "p.updated_at"),
    ("category", "c.name"),
];

#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category_slug: Option<String>,
    pub category_id: Option<Uuid>,
    pub active: Option<bool>,
    /// Hide products whose category is switched off (public catalog).
    pub only_visible_categories: bool,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

pub struct ProductService;

impl ProductService {
    pub async fn list(pool: &PgPool, filter: &ProductFilter, page: PageParams) -> Result<(Vec<Product>, i64), AppError> {
        let mut q = ListQuery::new(FROM);
        if let Some(active) = filter.active {
            q.eq("p.is_active", active);
        }
        if filter.only_visible_categories {
            q.eq("c.is_active", true);
        }
        if let Some(slug) = &filter.category_slug {
            q.eq("c.slug", slug.as_str());
        }
        if let Some(id) = filter.category_id {
            q.eq("p.category_id", id);
        }
        if let Some(term) = &filter.search {
            q.search(&["p.name", "p.short_description", "p.description"], term);
        }
        q.order_by(&order_clause(
            filter.sort_by.as_deref(),
            filter.sort_order.as_deref(),
            SORTABLE,
            DEFAULT_ORDER,
        ));
        let (rows, total) = fetch_page::<ProductRow>(pool, &q, COLUMNS, page).await?;
        Ok((rows.into_iter().map(Product::from).collect(), total))
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Product>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE p.id = $1", COLUMNS, FROM);
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Product::from))
    }

    /// Catalog page lookup: the product and its category must both be active.
    pub async fn get_public_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE p.slug = $1 AND p.is_active AND c.is_active",
            COLUMNS, FROM
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(slug)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn ensure_category(pool: &PgPool, category_id: Uuid) -> Result<(), AppError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM product_categories WHERE id = $1)")
            .bind(category_id)
            .fetch_one(pool)
            .await?;
        if exists {
            Ok(())
        } else {
            let mut errors = FieldErrors::default();
            errors.add("category_id", "Категория не найдена");
            errors.into_result()
        }
    }

    pub async fn create(pool: &PgPool, input: &ProductInput) -> Result<Product, AppError> {
        let name = clean(&input.name).ok_or_else(|| AppError::validation("name is required"))?;
        let category_id = input
            .category_id
            .ok_or_else(|| AppError::validation("categoryId is required"))?;
        Self::ensure_category(pool, category_id).await?;
        let slug = clean(&input.slug).unwrap_or_else(|| slugify(&name));
        if slug.is_empty() {
            let mut errors = FieldErrors::default();
            errors.add("slug", "Не удалось сформировать адрес из названия, укажите его вручную");
            errors.into_result()?;
        }
        let (id,): (Uuid,) = sqlx::query_as(
            r#"INSERT INTO products
                (name, slug, short_description, description, specifications, images, is_active, sort_order, category_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING id"#,
        )
        .bind(&name)
        .bind(&slug)
        .bind(clean(&input.short_description))
        .bind(clean(&input.description))
        .bind(input.specifications.clone().unwrap_or_else(|| Value::Object(Default::default())))
        .bind(input.images.clone().unwrap_or_default())
        .bind(input.is_active.unwrap_or(true))
        .bind(input.sort_order.unwrap_or(0))
        .bind(category_id)
        .fetch_one(pool)
        .await?;
        tracing::info!(product = %id, slug = %slug, "product created");
        Self::get(pool, id).await?.ok_or_else(|| AppError::Internal("created product vanished".into()))
    }

    pub async fn update(pool: &PgPool, id: Uuid, input: &ProductInput) -> Result<Option<Product>, AppError> {
        if let Some(category_id) = input.category_id {
            Self::ensure_category(pool, category_id).await?;
        }
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"UPDATE products SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                short_description = CASE WHEN $4::text IS NULL THEN short_description ELSE NULLIF($4, '') END,
                description = CASE WHEN $5::text IS NULL THEN description ELSE NULLIF($5, '') END,
                specifications = COALESCE($6, specifications),
                images = COALESCE($7, images),
                is_active = COALESCE($8, is_active),
                sort_order = COALESCE($9, sort_order),
                category_id = COALESCE($10, category_id),
                updated_at = NOW()
               WHERE id = $1
               RETURNING id"#,
        )
        .bind(id)
        .bind(clean(&input.name))
        .bind(clean(&input.slug))
        .bind(clearable(&input.short_description))
        .bind(clearable(&input.description))
        .bind(input.specifications.clone())
        .bind(input.images.clone())
        .bind(input.is_active)
        .bind(input.sort_order)
        .bind(input.category_id)
        .fetch_optional(pool)
        .await?;
        match row {
            Some(_) => Self::get(pool, id).await,
            None => Ok(None),
        }
    }

    pub async fn toggle(pool: &PgPool, id: Uuid) -> Result<Option<Product>, AppError> {
        let row: Option<(bool,)> = sqlx::query_as(
            "UPDATE products SET is_active = NOT is_active, updated_at = NOW() WHERE id = $1 RETURNING is_active",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        match row {
            Some((active,)) => {
                tracing::info!(product = %id, active, "product toggled");
                Self::get(pool, id).await
            }
            None => Ok(None),
        }
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
