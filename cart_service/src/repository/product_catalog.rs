// cart_service/src/repository/product_catalog.rs

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::warn;
use zcart::{CartError, CartResult, Product, ProductCatalog};

use crate::models::ProductRecord;

#[derive(Debug, Clone)]
pub struct SqliteProductCatalog {
  pool: SqlitePool,
}

impl SqliteProductCatalog {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProductCatalog for SqliteProductCatalog {
  async fn get_product(&self, product_id: &str) -> CartResult<Product> {
    let record: Option<ProductRecord> =
      sqlx::query_as("SELECT id, name, price_cents, description, image_url FROM products WHERE id = ?1")
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CartError::storage)?;

    match record {
      Some(record) => Ok(record.into()),
      None => {
        warn!("Product with ID {} not found.", product_id);
        Err(CartError::ProductNotFound {
          product_id: product_id.to_string(),
        })
      }
    }
  }
}
