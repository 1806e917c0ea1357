// cart_service/src/lib.rs

//! HTTP + WebSocket transport for the `zcart` cart core, backed by SQLite.

pub mod config;
pub mod errors;
pub mod models;
pub mod repository;
pub mod state;
pub mod web;

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tokio_util::sync::CancellationToken;
use zcart::{CartService, NotificationHub};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::repository::{SqliteCartStore, SqliteProductCatalog};
use crate::state::AppState;

/// Connects to the database, applies the schema, optionally seeds the
/// catalog, and wires the cart service.
pub async fn init_state(config: &AppConfig) -> Result<AppState> {
  let mut pool_options = SqlitePoolOptions::new().max_connections(5);
  if config.database_url.contains(":memory:") {
    // Each connection to an in-memory database sees its own database, and
    // closing the last one discards it.
    pool_options = pool_options.max_connections(1).idle_timeout(None).max_lifetime(None);
  }
  let db_pool = pool_options.connect(&config.database_url).await?;
  tracing::info!("Successfully connected to the database.");

  repository::migrate(&db_pool).await?;
  if config.seed_db {
    repository::upsert_products(&db_pool, &repository::sample_products()).await?;
  }

  let hub = NotificationHub::with_capacity(config.notify_queue_capacity);
  let cart_service = CartService::new(
    Arc::new(SqliteCartStore::new(db_pool.clone())),
    Arc::new(SqliteProductCatalog::new(db_pool)),
    hub,
  );

  Ok(AppState {
    cart_service: Arc::new(cart_service),
    shutdown: CancellationToken::new(),
  })
}
