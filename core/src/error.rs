// zcart/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Errors surfaced by the cart core.
///
/// Notification drops are deliberately absent: a dropped event is an expected
/// outcome reported through [`crate::hub::PublishOutcome`], never an error.
#[derive(Debug, Error)]
pub enum CartError {
  /// Rejected before the ledger is touched (empty ids, zero quantity, unknown action).
  #[error("Invalid input: {0}")]
  InvalidInput(String),

  #[error("Product not found: {product_id}")]
  ProductNotFound { product_id: String },

  /// Applying the delta would push the quantity past `u32::MAX`. The row is left unchanged.
  #[error("Quantity overflow for product '{product_id}' in cart '{cart_id}'")]
  QuantityOverflow { cart_id: String, product_id: String },

  /// Ledger or catalog backend failure, propagated unchanged as the source.
  #[error("Storage error. Source: {source}")]
  Storage {
    #[source]
    source: AnyhowError,
  },
}

impl CartError {
  pub fn storage(err: impl Into<AnyhowError>) -> Self {
    CartError::Storage { source: err.into() }
  }

  pub fn invalid_input(msg: impl Into<String>) -> Self {
    CartError::InvalidInput(msg.into())
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, CartError::ProductNotFound { .. })
  }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;
