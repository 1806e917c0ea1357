// cart_service/src/models/cart_product.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use zcart::{CartError, CartProductRow};

#[derive(Debug, Clone, FromRow)]
pub struct CartProductRecord {
  pub cart_id: String,
  pub product_id: String,
  pub quantity: i64,
  pub updated_at: DateTime<Utc>,
}

impl TryFrom<CartProductRecord> for CartProductRow {
  type Error = CartError;

  fn try_from(record: CartProductRecord) -> Result<Self, Self::Error> {
    let quantity = u32::try_from(record.quantity).map_err(|_| {
      CartError::storage(anyhow::anyhow!(
        "stored quantity {} for product '{}' in cart '{}' is out of range",
        record.quantity,
        record.product_id,
        record.cart_id
      ))
    })?;
    Ok(CartProductRow {
      cart_id: record.cart_id,
      product_id: record.product_id,
      quantity,
      updated_at: record.updated_at,
    })
  }
}
