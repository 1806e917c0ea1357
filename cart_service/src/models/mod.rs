// cart_service/src/models/mod.rs

//! Row shapes as stored in SQLite. Converted to `zcart` types at the repository boundary.

pub mod cart_product;
pub mod product;

pub use cart_product::CartProductRecord;
pub use product::ProductRecord;
