// zcart/src/ledger/mod.rs

//! The quantity ledger: per-(cart, product) quantities with clamp-to-zero
//! delta application and insert/update/delete row lifecycle.

mod locks;
pub mod store;

use std::sync::Arc;

use tracing::{event, instrument, Level};

use crate::catalog::ProductCatalog;
use crate::error::{CartError, CartResult};
use crate::model::{Cart, CartLine};

use self::locks::KeyLocks;
pub use self::store::{CartStore, InMemoryCartStore};

/// `max(0, current + delta)`, or `None` when the result does not fit a `u32`.
pub fn clamp_quantity(current: u32, delta: i64) -> Option<u32> {
  let next = i64::from(current).saturating_add(delta).max(0);
  u32::try_from(next).ok()
}

/// Quantity before and after one applied delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityChange {
  pub previous: u32,
  pub quantity: u32,
}

impl QuantityChange {
  /// False when the delta left the row as it was, e.g. a removal from a missing row.
  pub fn is_changed(&self) -> bool {
    self.previous != self.quantity
  }
}

/// Owns the per-(cart, product) quantity rows.
///
/// Concurrent [`CartLedger::apply_delta`] calls on the same key serialize on a
/// per-key lock; calls on different keys proceed independently. The lock is
/// held only across the store read and write, never across catalog lookups.
pub struct CartLedger {
  store: Arc<dyn CartStore>,
  catalog: Arc<dyn ProductCatalog>,
  locks: KeyLocks,
}

impl CartLedger {
  pub fn new(store: Arc<dyn CartStore>, catalog: Arc<dyn ProductCatalog>) -> Self {
    Self {
      store,
      catalog,
      locks: KeyLocks::default(),
    }
  }

  /// Current quantity, or `None` when no row exists.
  pub async fn get_quantity(&self, cart_id: &str, product_id: &str) -> CartResult<Option<u32>> {
    Ok(self.store.get_row(cart_id, product_id).await?.map(|row| row.quantity))
  }

  /// Applies a signed delta and returns the resulting quantity.
  pub async fn apply_delta(&self, cart_id: &str, product_id: &str, delta: i64) -> CartResult<u32> {
    Ok(self.apply_change(cart_id, product_id, delta).await?.quantity)
  }

  /// Applies a signed delta and reports the quantity on both sides of it.
  ///
  /// Removing more than is present clamps to zero and deletes the row. A
  /// result larger than `u32::MAX` is rejected and leaves the row untouched.
  #[instrument(name = "CartLedger::apply_delta", skip(self), err(Display))]
  pub async fn apply_change(&self, cart_id: &str, product_id: &str, delta: i64) -> CartResult<QuantityChange> {
    let _key = self.locks.lock(cart_id, product_id).await;

    let current = self.get_quantity(cart_id, product_id).await?.unwrap_or(0);
    let next = clamp_quantity(current, delta).ok_or_else(|| CartError::QuantityOverflow {
      cart_id: cart_id.to_string(),
      product_id: product_id.to_string(),
    })?;

    if next == current {
      event!(Level::TRACE, current, "Delta leaves quantity unchanged; skipping write.");
      return Ok(QuantityChange {
        previous: current,
        quantity: current,
      });
    }

    if next == 0 {
      self.store.delete_row(cart_id, product_id).await?;
      event!(Level::DEBUG, current, "Quantity reached zero; row deleted.");
    } else {
      self.store.set_quantity(cart_id, product_id, next).await?;
      event!(Level::DEBUG, current, next, "Quantity updated.");
    }
    Ok(QuantityChange {
      previous: current,
      quantity: next,
    })
  }

  /// Joins the cart's rows with catalog data, least recently modified first.
  /// A cart without rows is a valid, empty cart.
  #[instrument(name = "CartLedger::get_cart", skip(self), err(Display))]
  pub async fn get_cart(&self, cart_id: &str) -> CartResult<Cart> {
    let rows = self.store.list_rows(cart_id).await?;
    let mut products = Vec::with_capacity(rows.len());
    for row in rows {
      let product = self.catalog.get_product(&row.product_id).await?;
      products.push(CartLine {
        cart_id: row.cart_id,
        product_id: row.product_id,
        quantity: row.quantity,
        product,
      });
    }
    event!(Level::DEBUG, lines = products.len(), "Cart loaded.");
    Ok(Cart {
      id: cart_id.to_string(),
      products,
    })
  }

  /// Deletes every row of the cart. Idempotent.
  ///
  /// Waits for deltas already in flight on the cart and holds off new ones,
  /// so no write can restore a row it removed.
  #[instrument(name = "CartLedger::empty_cart", skip(self), err(Display))]
  pub async fn empty_cart(&self, cart_id: &str) -> CartResult<()> {
    let _cart = self.locks.lock_cart(cart_id).await;
    self.store.delete_cart(cart_id).await
  }
}
