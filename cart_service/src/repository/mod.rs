// cart_service/src/repository/mod.rs

//! SQLite-backed implementations of the cart core's storage and catalog ports.

pub mod cart_store;
pub mod product_catalog;

pub use cart_store::SqliteCartStore;
pub use product_catalog::SqliteProductCatalog;

use sqlx::SqlitePool;
use tracing::info;
use zcart::Product;

const SCHEMA: &[&str] = &[
  r#"
  CREATE TABLE IF NOT EXISTS products (
    id          TEXT PRIMARY KEY NOT NULL,
    name        TEXT NOT NULL,
    price_cents INTEGER NOT NULL,
    description TEXT,
    image_url   TEXT
  )
  "#,
  r#"
  CREATE TABLE IF NOT EXISTS cart_products (
    cart_id    TEXT NOT NULL,
    product_id TEXT NOT NULL,
    quantity   INTEGER NOT NULL CHECK (quantity > 0),
    revision   INTEGER NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (cart_id, product_id)
  )
  "#,
  "CREATE INDEX IF NOT EXISTS idx_cart_products_revision ON cart_products (cart_id, revision)",
];

/// Creates the tables if they do not exist yet.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
  for statement in SCHEMA {
    sqlx::query(*statement).execute(pool).await?;
  }
  info!("Database schema is up to date.");
  Ok(())
}

pub fn sample_products() -> Vec<Product> {
  vec![
    Product::new("1", "Calzone", 599).with_description("Folded pizza with ham and cheese"),
    Product::new("2", "Pao de Batata", 299).with_image_url("https://example.com/pao-de-batata.png"),
    Product::new("3", "Coxinha", 450),
    Product::new("4", "Guarana", 350).with_description("Soda, 350ml can"),
  ]
}

/// Inserts or refreshes catalog products.
pub async fn upsert_products(pool: &SqlitePool, products: &[Product]) -> Result<(), sqlx::Error> {
  for product in products {
    sqlx::query(
      r#"
      INSERT INTO products (id, name, price_cents, description, image_url)
      VALUES (?1, ?2, ?3, ?4, ?5)
      ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        price_cents = excluded.price_cents,
        description = excluded.description,
        image_url = excluded.image_url
      "#,
    )
    .bind(&product.id)
    .bind(&product.name)
    .bind(product.price_cents)
    .bind(&product.description)
    .bind(&product.image_url)
    .execute(pool)
    .await?;
  }
  info!("Upserted {} catalog products.", products.len());
  Ok(())
}
