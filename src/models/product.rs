use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Product row joined with its category.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub specifications: Value,
    pub images: Vec<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub specifications: Value,
    pub images: Vec<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub category_id: Uuid,
    pub category: CategoryRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            name: r.name,
            slug: r.slug,
            short_description: r.short_description,
            description: r.description,
            specifications: r.specifications,
            images: r.images,
            is_active: r.is_active,
            sort_order: r.sort_order,
            category_id: r.category_id,
            category: CategoryRef {
                id: r.category_id,
                name: r.category_name,
                slug: r.category_slug,
            },
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub specifications: Option<Value>,
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
    pub category_id: Option<Uuid>,
}
