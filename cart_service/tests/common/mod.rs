// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use cart_service::config::AppConfig;
use cart_service::state::AppState;
use once_cell::sync::Lazy;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::Level;

/// In-memory database with the schema applied. One connection, so every
/// query sees the same database.
pub async fn memory_pool() -> SqlitePool {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("failed to open in-memory sqlite");
  cart_service::repository::migrate(&pool).await.expect("migration failed");
  pool
}

pub fn memory_config() -> AppConfig {
  AppConfig {
    database_url: "sqlite::memory:".to_string(),
    seed_db: true,
    ..AppConfig::default()
  }
}

/// Fully wired state over a seeded in-memory database (products "1" to "4").
pub async fn seeded_state() -> AppState {
  cart_service::init_state(&memory_config())
    .await
    .expect("failed to build app state")
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
