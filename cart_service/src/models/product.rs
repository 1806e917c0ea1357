// cart_service/src/models/product.rs

use sqlx::FromRow;
use zcart::Product;

#[derive(Debug, Clone, FromRow)]
pub struct ProductRecord {
  pub id: String,
  pub name: String,
  pub price_cents: i64,
  pub description: Option<String>, // Description can be optional
  pub image_url: Option<String>,
}

impl From<ProductRecord> for Product {
  fn from(record: ProductRecord) -> Self {
    Product {
      id: record.id,
      name: record.name,
      price_cents: record.price_cents,
      description: record.description,
      image_url: record.image_url,
    }
  }
}
