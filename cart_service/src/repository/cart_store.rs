// cart_service/src/repository/cart_store.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, instrument};
use zcart::{CartError, CartProductRow, CartResult, CartStore};

use crate::models::CartProductRecord;

/// [`CartStore`] over the `cart_products` table.
///
/// Modification order is tracked by a `revision` column that every upsert
/// sets to one past the table maximum, so listing is stable even when two
/// writes share a timestamp.
#[derive(Debug, Clone)]
pub struct SqliteCartStore {
  pool: SqlitePool,
}

impl SqliteCartStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CartStore for SqliteCartStore {
  async fn get_row(&self, cart_id: &str, product_id: &str) -> CartResult<Option<CartProductRow>> {
    let record: Option<CartProductRecord> = sqlx::query_as(
      "SELECT cart_id, product_id, quantity, updated_at FROM cart_products WHERE cart_id = ?1 AND product_id = ?2",
    )
    .bind(cart_id)
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(CartError::storage)?;

    record.map(CartProductRow::try_from).transpose()
  }

  #[instrument(skip(self), err(Display))]
  async fn set_quantity(&self, cart_id: &str, product_id: &str, quantity: u32) -> CartResult<()> {
    if quantity == 0 {
      return self.delete_row(cart_id, product_id).await;
    }

    // Docs: https://sqlite.org/lang_upsert.html
    sqlx::query(
      r#"
      INSERT INTO cart_products (cart_id, product_id, quantity, revision, updated_at)
      VALUES (?1, ?2, ?3, (SELECT COALESCE(MAX(revision), 0) + 1 FROM cart_products), ?4)
      ON CONFLICT(cart_id, product_id) DO UPDATE SET
        quantity = excluded.quantity,
        revision = excluded.revision,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(cart_id)
    .bind(product_id)
    .bind(i64::from(quantity))
    .bind(Utc::now())
    .execute(&self.pool)
    .await
    .map_err(CartError::storage)?;

    debug!("Cart row upserted.");
    Ok(())
  }

  async fn delete_row(&self, cart_id: &str, product_id: &str) -> CartResult<()> {
    sqlx::query("DELETE FROM cart_products WHERE cart_id = ?1 AND product_id = ?2")
      .bind(cart_id)
      .bind(product_id)
      .execute(&self.pool)
      .await
      .map_err(CartError::storage)?;
    Ok(())
  }

  async fn list_rows(&self, cart_id: &str) -> CartResult<Vec<CartProductRow>> {
    let records: Vec<CartProductRecord> = sqlx::query_as(
      "SELECT cart_id, product_id, quantity, updated_at FROM cart_products WHERE cart_id = ?1 ORDER BY revision ASC",
    )
    .bind(cart_id)
    .fetch_all(&self.pool)
    .await
    .map_err(CartError::storage)?;

    records.into_iter().map(CartProductRow::try_from).collect()
  }

  #[instrument(skip(self), err(Display))]
  async fn delete_cart(&self, cart_id: &str) -> CartResult<()> {
    let result = sqlx::query("DELETE FROM cart_products WHERE cart_id = ?1")
      .bind(cart_id)
      .execute(&self.pool)
      .await
      .map_err(CartError::storage)?;
    debug!(rows = result.rows_affected(), "Cart rows deleted.");
    Ok(())
  }
}
