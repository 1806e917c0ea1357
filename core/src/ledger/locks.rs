// zcart/src/ledger/locks.rs

//! Async lock tables for the ledger.
//!
//! Every read-compute-write on one `(cart_id, product_id)` holds that key's
//! mutex plus a shared lock on its cart. Emptying a cart takes the cart lock
//! exclusively, so it never lands between another writer's read and write.
//! Entries are dropped from the tables once nobody holds or awaits them.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

type LedgerKey = (String, String);

struct SlotTable<K, L> {
  slots: Mutex<HashMap<K, Arc<L>>>,
}

impl<K: Eq + Hash + Clone, L> SlotTable<K, L> {
  fn new() -> Self {
    Self {
      slots: Mutex::new(HashMap::new()),
    }
  }

  fn slot(&self, key: &K, make: fn() -> L) -> Arc<L> {
    let mut slots = self.slots.lock();
    Arc::clone(slots.entry(key.clone()).or_insert_with(|| Arc::new(make())))
  }

  /// Drops `guard` under the table lock so no new waiter can clone the slot in between.
  fn release<G>(&self, key: &K, guard: G) {
    let mut slots = self.slots.lock();
    drop(guard);
    if let Some(slot) = slots.get(key) {
      if Arc::strong_count(slot) == 1 {
        slots.remove(key);
      }
    }
  }

  #[cfg(test)]
  fn len(&self) -> usize {
    self.slots.lock().len()
  }
}

struct Tables {
  carts: SlotTable<String, RwLock<()>>,
  keys: SlotTable<LedgerKey, AsyncMutex<()>>,
}

pub(crate) struct KeyLocks {
  tables: Arc<Tables>,
}

impl Default for KeyLocks {
  fn default() -> Self {
    Self {
      tables: Arc::new(Tables {
        carts: SlotTable::new(),
        keys: SlotTable::new(),
      }),
    }
  }
}

/// Held for the duration of one read-compute-write.
pub(crate) struct KeyGuard {
  tables: Arc<Tables>,
  key: LedgerKey,
  cart: Option<OwnedRwLockReadGuard<()>>,
  entry: Option<OwnedMutexGuard<()>>,
}

/// Exclusive hold on a whole cart.
pub(crate) struct CartGuard {
  tables: Arc<Tables>,
  cart_id: String,
  guard: Option<OwnedRwLockWriteGuard<()>>,
}

impl KeyLocks {
  pub(crate) async fn lock(&self, cart_id: &str, product_id: &str) -> KeyGuard {
    let key = (cart_id.to_string(), product_id.to_string());
    let cart_slot = self.tables.carts.slot(&key.0, || RwLock::new(()));
    let key_slot = self.tables.keys.slot(&key, || AsyncMutex::new(()));

    // Built before the second await so a cancelled caller still releases the cart entry.
    let mut guard = KeyGuard {
      tables: Arc::clone(&self.tables),
      key,
      cart: None,
      entry: None,
    };
    guard.cart = Some(cart_slot.read_owned().await);
    guard.entry = Some(key_slot.lock_owned().await);
    guard
  }

  /// Waits for in-flight writes on the cart to finish and holds off new ones.
  pub(crate) async fn lock_cart(&self, cart_id: &str) -> CartGuard {
    let slot = self.tables.carts.slot(&cart_id.to_string(), || RwLock::new(()));
    let mut guard = CartGuard {
      tables: Arc::clone(&self.tables),
      cart_id: cart_id.to_string(),
      guard: None,
    };
    guard.guard = Some(slot.write_owned().await);
    guard
  }

  #[cfg(test)]
  fn active_keys(&self) -> usize {
    self.tables.keys.len()
  }

  #[cfg(test)]
  fn active_carts(&self) -> usize {
    self.tables.carts.len()
  }
}

impl Drop for KeyGuard {
  fn drop(&mut self) {
    // Key first, then cart: the reverse of acquisition.
    let entry = self.entry.take();
    self.tables.keys.release(&self.key, entry);
    let cart = self.cart.take();
    self.tables.carts.release(&self.key.0, cart);
  }
}

impl Drop for CartGuard {
  fn drop(&mut self) {
    let guard = self.guard.take();
    self.tables.carts.release(&self.cart_id, guard);
  }
}
