// zcart/src/model/cart.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::product::Product;

/// One stored ledger fact. A row never carries a zero quantity: reaching zero
/// deletes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartProductRow {
  pub cart_id: String,
  pub product_id: String,
  pub quantity: u32,
  pub updated_at: DateTime<Utc>,
}

/// A ledger row joined with its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
  pub cart_id: String,
  pub product_id: String,
  pub quantity: u32,
  pub product: Product,
}

/// Read-only projection of a cart, computed on every read. Lines are ordered
/// by last modification, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cart {
  pub id: String,
  pub products: Vec<CartLine>,
}

impl Cart {
  pub fn is_empty(&self) -> bool {
    self.products.is_empty()
  }

  pub fn quantity_of(&self, product_id: &str) -> Option<u32> {
    self
      .products
      .iter()
      .find(|line| line.product_id == product_id)
      .map(|line| line.quantity)
  }
}
