// zcart/src/model/event.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::product::Product;
use crate::error::CartError;

/// What a quantity update does to a line item. Parsed once at the boundary;
/// nothing past the transport compares action strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
  Add,
  Remove,
}

impl CartAction {
  /// Signed delta applied to the ledger for `quantity` units of this action.
  pub fn delta(self, quantity: u32) -> i64 {
    match self {
      CartAction::Add => i64::from(quantity),
      CartAction::Remove => -i64::from(quantity),
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      CartAction::Add => "add",
      CartAction::Remove => "remove",
    }
  }
}

impl fmt::Display for CartAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for CartAction {
  type Err = CartError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "add" => Ok(CartAction::Add),
      "remove" => Ok(CartAction::Remove),
      other => Err(CartError::invalid_input(format!("unknown action '{}'", other))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
  #[serde(rename = "product_added")]
  Added,
  #[serde(rename = "product_removed")]
  Removed,
}

impl From<CartAction> for ChangeKind {
  fn from(action: CartAction) -> Self {
    match action {
      CartAction::Add => ChangeKind::Added,
      CartAction::Remove => ChangeKind::Removed,
    }
  }
}

/// Ephemeral notification for one line-item change. Never persisted.
///
/// Serializes to `{ cart_id, product_id, quantity, product, event }` where
/// `event` is `"product_added"` or `"product_removed"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
  pub cart_id: String,
  pub product_id: String,
  /// Resulting quantity after the change; 0 means the line was removed.
  pub quantity: u32,
  pub product: Product,
  #[serde(rename = "event")]
  pub kind: ChangeKind,
}

impl ChangeEvent {
  pub fn new(cart_id: impl Into<String>, product: Product, quantity: u32, kind: ChangeKind) -> Self {
    Self {
      cart_id: cart_id.into(),
      product_id: product.id.clone(),
      quantity,
      product,
      kind,
    }
  }

  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string(self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn action_parses_case_insensitively() {
    assert_eq!("add".parse::<CartAction>().unwrap(), CartAction::Add);
    assert_eq!(" Remove ".parse::<CartAction>().unwrap(), CartAction::Remove);
    assert!(matches!("toss".parse::<CartAction>(), Err(CartError::InvalidInput(_))));
  }

  #[test]
  fn action_maps_to_signed_delta() {
    assert_eq!(CartAction::Add.delta(3), 3);
    assert_eq!(CartAction::Remove.delta(3), -3);
    assert_eq!(CartAction::Remove.delta(u32::MAX), -(u32::MAX as i64));
  }

  #[test]
  fn change_event_wire_shape() {
    let event = ChangeEvent::new("5", Product::new("p2", "Calzone", 599), 1, ChangeKind::Added);
    let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();

    assert_eq!(value["cart_id"], "5");
    assert_eq!(value["product_id"], "p2");
    assert_eq!(value["quantity"], 1);
    assert_eq!(value["event"], "product_added");
    assert_eq!(value["product"]["name"], "Calzone");
    assert!(value["product"]["description"].is_null());
  }

  #[test]
  fn removed_kind_serializes_as_product_removed() {
    let json = serde_json::to_string(&ChangeKind::from(CartAction::Remove)).unwrap();
    assert_eq!(json, "\"product_removed\"");
  }
}
