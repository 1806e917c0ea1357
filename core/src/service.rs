// zcart/src/service.rs

//! Orchestrates catalog, ledger and hub behind the five calls a transport
//! needs: update quantity, get cart, checkout, attach and detach observers.

use std::sync::Arc;

use tracing::{event, instrument, Level};

use crate::catalog::ProductCatalog;
use crate::error::{CartError, CartResult};
use crate::hub::{NotificationHub, ObserverHandle, PublishOutcome};
use crate::ledger::{CartLedger, CartStore};
use crate::model::{Cart, CartAction, ChangeEvent, ChangeKind};

/// Outcome of a successful [`CartService::update_quantity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityUpdate {
  /// The event that was offered to the hub.
  pub event: ChangeEvent,
  /// What the hub did with it; `None` when the quantity did not change and
  /// nothing was published. Never affects success.
  pub delivery: Option<PublishOutcome>,
}

impl QuantityUpdate {
  pub fn quantity(&self) -> u32 {
    self.event.quantity
  }
}

pub struct CartService {
  catalog: Arc<dyn ProductCatalog>,
  ledger: CartLedger,
  hub: NotificationHub,
}

fn require_id(kind: &str, value: &str) -> CartResult<()> {
  if value.trim().is_empty() {
    return Err(CartError::invalid_input(format!("{} must not be empty", kind)));
  }
  Ok(())
}

impl CartService {
  pub fn new(store: Arc<dyn CartStore>, catalog: Arc<dyn ProductCatalog>, hub: NotificationHub) -> Self {
    Self {
      ledger: CartLedger::new(store, Arc::clone(&catalog)),
      catalog,
      hub,
    }
  }

  pub fn ledger(&self) -> &CartLedger {
    &self.ledger
  }

  pub fn hub(&self) -> &NotificationHub {
    &self.hub
  }

  /// Adds or removes `quantity` units of a product and notifies the cart's observer.
  ///
  /// The product is resolved before the ledger is touched, so an unknown id
  /// never leaves a row behind. Publication happens after the write and
  /// cannot fail the call. A removal from a line the cart does not hold
  /// changes nothing and publishes nothing.
  #[instrument(name = "CartService::update_quantity", skip(self), err(Display))]
  pub async fn update_quantity(
    &self,
    cart_id: &str,
    product_id: &str,
    quantity: u32,
    action: CartAction,
  ) -> CartResult<QuantityUpdate> {
    require_id("cart id", cart_id)?;
    require_id("product id", product_id)?;
    if quantity == 0 {
      return Err(CartError::invalid_input("quantity must be greater than zero"));
    }

    let product = self.catalog.get_product(product_id).await?;
    let applied = self.ledger.apply_change(cart_id, product_id, action.delta(quantity)).await?;
    let resulting = applied.quantity;

    let change = ChangeEvent::new(cart_id, product, resulting, ChangeKind::from(action));
    let delivery = if applied.is_changed() {
      Some(self.hub.publish(cart_id, change.clone()))
    } else {
      None
    };
    event!(Level::INFO, resulting, ?delivery, "Cart quantity updated.");

    Ok(QuantityUpdate {
      event: change,
      delivery,
    })
  }

  /// The cart's lines joined with catalog data. An unknown cart is empty, not missing.
  #[instrument(name = "CartService::get_cart", skip(self), err(Display))]
  pub async fn get_cart(&self, cart_id: &str) -> CartResult<Cart> {
    require_id("cart id", cart_id)?;
    self.ledger.get_cart(cart_id).await
  }

  /// Empties the cart. Terminal for the cart's line items; publishes nothing.
  #[instrument(name = "CartService::checkout", skip(self), err(Display))]
  pub async fn checkout(&self, cart_id: &str) -> CartResult<()> {
    require_id("cart id", cart_id)?;
    self.ledger.empty_cart(cart_id).await?;
    event!(Level::INFO, "Cart checked out and emptied.");
    Ok(())
  }

  pub fn attach_observer(&self, cart_id: &str) -> CartResult<ObserverHandle> {
    require_id("cart id", cart_id)?;
    Ok(self.hub.attach(cart_id))
  }

  pub fn detach_observer(&self, handle: ObserverHandle) {
    self.hub.detach(handle);
  }
}
