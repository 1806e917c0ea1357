// zcart/src/model/product.rs

use serde::{Deserialize, Serialize};

/// Catalog entry. Owned by the [`crate::catalog::ProductCatalog`]; the cart
/// core only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub id: String,
  pub name: String,
  pub price_cents: i64,
  pub description: Option<String>,
  pub image_url: Option<String>,
}

impl Product {
  pub fn new(id: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      price_cents,
      description: None,
      image_url: None,
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
    self.image_url = Some(image_url.into());
    self
  }
}
