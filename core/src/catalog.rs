// zcart/src/catalog.rs

//! Product lookup port. The cart core never writes to the catalog.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{event, Level};

use crate::error::{CartError, CartResult};
use crate::model::Product;

/// Resolves a product identifier to its display data.
///
/// Implementations return [`CartError::ProductNotFound`] for unknown ids and
/// [`CartError::Storage`] for backend failures. Lookups have no side effects.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
  async fn get_product(&self, product_id: &str) -> CartResult<Product>;
}

/// Catalog held entirely in memory. Used by tests and by deployments that load
/// the catalog up front.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
  products: RwLock<HashMap<String, Product>>,
}

impl InMemoryCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
    let catalog = Self::new();
    for product in products {
      catalog.insert(product);
    }
    catalog
  }

  /// Inserts or replaces a product, returning the previous entry if any.
  pub fn insert(&self, product: Product) -> Option<Product> {
    self.products.write().insert(product.id.clone(), product)
  }

  pub fn remove(&self, product_id: &str) -> Option<Product> {
    self.products.write().remove(product_id)
  }

  pub fn len(&self) -> usize {
    self.products.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.products.read().is_empty()
  }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
  async fn get_product(&self, product_id: &str) -> CartResult<Product> {
    match self.products.read().get(product_id) {
      Some(product) => Ok(product.clone()),
      None => {
        event!(Level::DEBUG, product_id, "Product lookup missed.");
        Err(CartError::ProductNotFound {
          product_id: product_id.to_string(),
        })
      }
    }
  }
}
