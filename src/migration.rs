//! Schema DDL for the site tables. Every statement is idempotent, so this runs on each start.

use crate::auth::hash_password;
use crate::config::AdminBootstrap;
use crate::error::AppError;
use sqlx::PgPool;

/// Types first, then tables in foreign-key order, then indexes.
const SCHEMA: &[&str] = &[
    r#"DO $$ BEGIN
        CREATE TYPE user_role AS ENUM ('ADMIN', 'MODERATOR');
    EXCEPTION WHEN duplicate_object THEN NULL; END $$"#,
    r#"DO $$ BEGIN
        CREATE TYPE contact_status AS ENUM ('new', 'in_progress', 'completed');
    EXCEPTION WHEN duplicate_object THEN NULL; END $$"#,
    r#"DO $$ BEGIN
        CREATE TYPE contact_source AS ENUM ('contact', 'order');
    EXCEPTION WHEN duplicate_object THEN NULL; END $$"#,
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        phone TEXT,
        department TEXT,
        role user_role NOT NULL DEFAULT 'MODERATOR',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        password_hash TEXT NOT NULL,
        last_login_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS product_categories (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        description TEXT,
        sort_order INTEGER NOT NULL DEFAULT 0,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        short_description TEXT,
        description TEXT,
        specifications JSONB NOT NULL DEFAULT '{}'::jsonb,
        images TEXT[] NOT NULL DEFAULT '{}',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        sort_order INTEGER NOT NULL DEFAULT 0,
        category_id UUID NOT NULL REFERENCES product_categories(id) ON DELETE RESTRICT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS certificates (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        title TEXT NOT NULL,
        description TEXT,
        issue_date DATE,
        expiry_date DATE,
        image_url TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS contact_requests (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL,
        phone TEXT NOT NULL,
        email TEXT,
        company TEXT,
        message TEXT,
        product_id UUID REFERENCES products(id) ON DELETE SET NULL,
        product_name TEXT,
        source contact_source NOT NULL DEFAULT 'contact',
        status contact_status NOT NULL DEFAULT 'new',
        notes TEXT,
        contacted_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS questionnaires (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        title TEXT NOT NULL,
        category TEXT NOT NULL,
        file_url TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "CREATE INDEX IF NOT EXISTS products_category_idx ON products (category_id)",
    "CREATE INDEX IF NOT EXISTS products_active_order_idx ON products (is_active, sort_order)",
    "CREATE INDEX IF NOT EXISTS contact_requests_status_idx ON contact_requests (status, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS questionnaires_category_idx ON questionnaires (category)",
];

pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!(statements = SCHEMA.len(), "schema up to date");
    Ok(())
}

/// Create the configured admin account when the users table is empty.
/// Returns whether a user was created.
pub async fn ensure_admin_user(pool: &PgPool, admin: &AdminBootstrap) -> Result<bool, AppError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users").fetch_one(pool).await?;
    if count > 0 {
        return Ok(false);
    }
    let hash = hash_password(&admin.password)?;
    sqlx::query(
        "INSERT INTO users (email, name, role, password_hash) VALUES ($1, $2, 'ADMIN', $3) ON CONFLICT (email) DO NOTHING",
    )
    .bind(admin.email.trim().to_lowercase())
    .bind("Администратор")
    .bind(&hash)
    .execute(pool)
    .await?;
    tracing::info!(email = %admin.email, "bootstrap admin created");
    Ok(true)
}
