//! Equipment site server.
//!
//! Run from repo root: `cargo run -p site-server`
//! Reads settings from the environment (and `.env`), prepares the database, then serves.

use equipment_site::{
    app, apply_migrations, connect_pool, ensure_admin_user, ensure_database_exists, AppState, Settings,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("equipment_site=info,site_server=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    ensure_database_exists(&settings.database_url).await?;
    let pool = connect_pool(&settings).await?;
    apply_migrations(&pool).await?;
    match &settings.bootstrap_admin {
        Some(admin) => {
            if ensure_admin_user(&pool, admin).await? {
                tracing::info!("first start: admin account seeded");
            }
        }
        None => tracing::debug!("no bootstrap admin configured"),
    }

    let bind_addr = settings.bind_addr;
    let state = AppState::new(pool, settings);
    let router = app(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
