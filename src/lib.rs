//! Equipment site: catalog API, public request forms and the admin back-office.

pub mod auth;
pub mod case;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod pagination;
pub mod rate_limit;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod util;

pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use migration::{apply_migrations, ensure_admin_user};
pub use routes::app;
pub use state::AppState;
pub use store::{connect_pool, ensure_database_exists};
