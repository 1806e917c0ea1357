// zcart/src/ledger/store.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::CartResult;
use crate::model::CartProductRow;

/// Durable storage for cart rows, keyed by `(cart_id, product_id)`.
///
/// Stores are not expected to serialize concurrent writers themselves;
/// [`super::CartLedger`] holds a per-key lock around every read-compute-write.
/// Every method reports backend failures as [`crate::CartError::Storage`].
#[async_trait]
pub trait CartStore: Send + Sync {
  async fn get_row(&self, cart_id: &str, product_id: &str) -> CartResult<Option<CartProductRow>>;

  /// Insert-or-update the row to exactly `quantity`, bumping its
  /// modification order. A `quantity` of zero deletes the row instead.
  async fn set_quantity(&self, cart_id: &str, product_id: &str, quantity: u32) -> CartResult<()>;

  /// Idempotent: deleting a missing row succeeds.
  async fn delete_row(&self, cart_id: &str, product_id: &str) -> CartResult<()>;

  /// All rows of a cart, least recently modified first.
  async fn list_rows(&self, cart_id: &str) -> CartResult<Vec<CartProductRow>>;

  /// Idempotent: emptying an empty cart succeeds.
  async fn delete_cart(&self, cart_id: &str) -> CartResult<()>;
}

#[derive(Debug, Clone)]
struct StoredRow {
  quantity: u32,
  updated_at: DateTime<Utc>,
  revision: u64,
}

/// Process-local [`CartStore`]. Reads never create entries.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
  carts: RwLock<HashMap<String, HashMap<String, StoredRow>>>,
  revision: AtomicU64,
}

impl InMemoryCartStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Total number of stored rows across all carts.
  pub fn row_count(&self) -> usize {
    self.carts.read().values().map(HashMap::len).sum()
  }

  fn remove(&self, cart_id: &str, product_id: &str) {
    let mut carts = self.carts.write();
    if let Some(rows) = carts.get_mut(cart_id) {
      rows.remove(product_id);
      if rows.is_empty() {
        carts.remove(cart_id);
      }
    }
  }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
  async fn get_row(&self, cart_id: &str, product_id: &str) -> CartResult<Option<CartProductRow>> {
    let carts = self.carts.read();
    Ok(carts.get(cart_id).and_then(|rows| rows.get(product_id)).map(|row| CartProductRow {
      cart_id: cart_id.to_string(),
      product_id: product_id.to_string(),
      quantity: row.quantity,
      updated_at: row.updated_at,
    }))
  }

  async fn set_quantity(&self, cart_id: &str, product_id: &str, quantity: u32) -> CartResult<()> {
    if quantity == 0 {
      self.remove(cart_id, product_id);
      return Ok(());
    }
    let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
    self.carts.write().entry(cart_id.to_string()).or_default().insert(
      product_id.to_string(),
      StoredRow {
        quantity,
        updated_at: Utc::now(),
        revision,
      },
    );
    Ok(())
  }

  async fn delete_row(&self, cart_id: &str, product_id: &str) -> CartResult<()> {
    self.remove(cart_id, product_id);
    Ok(())
  }

  async fn list_rows(&self, cart_id: &str) -> CartResult<Vec<CartProductRow>> {
    let carts = self.carts.read();
    let Some(rows) = carts.get(cart_id) else {
      return Ok(Vec::new());
    };
    let mut ordered: Vec<(&String, &StoredRow)> = rows.iter().collect();
    ordered.sort_by_key(|(_, row)| row.revision);
    Ok(
      ordered
        .into_iter()
        .map(|(product_id, row)| CartProductRow {
          cart_id: cart_id.to_string(),
          product_id: product_id.clone(),
          quantity: row.quantity,
          updated_at: row.updated_at,
        })
        .collect(),
    )
  }

  async fn delete_cart(&self, cart_id: &str) -> CartResult<()> {
    self.carts.write().remove(cart_id);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn reads_do_not_create_carts() {
    let store = InMemoryCartStore::new();
    assert!(store.get_row("9", "p1").await.unwrap().is_none());
    assert!(store.list_rows("9").await.unwrap().is_empty());
    assert_eq!(store.row_count(), 0);
    assert!(store.carts.read().is_empty());
  }

  #[tokio::test]
  async fn zero_quantity_deletes() {
    let store = InMemoryCartStore::new();
    store.set_quantity("9", "p1", 4).await.unwrap();
    store.set_quantity("9", "p1", 0).await.unwrap();
    assert!(store.get_row("9", "p1").await.unwrap().is_none());
    assert_eq!(store.row_count(), 0);
  }

  #[tokio::test]
  async fn rows_listed_by_modification_order() {
    let store = InMemoryCartStore::new();
    store.set_quantity("9", "a", 1).await.unwrap();
    store.set_quantity("9", "b", 1).await.unwrap();
    store.set_quantity("9", "a", 2).await.unwrap();

    let ids: Vec<String> = store.list_rows("9").await.unwrap().into_iter().map(|r| r.product_id).collect();
    assert_eq!(ids, vec!["b".to_string(), "a".to_string()]);
  }
}
