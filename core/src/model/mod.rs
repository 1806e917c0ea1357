// zcart/src/model/mod.rs

//! Plain data carried between the ledger, the hub and the transport.

pub mod cart;
pub mod event;
pub mod product;

pub use cart::{Cart, CartLine, CartProductRow};
pub use event::{CartAction, ChangeEvent, ChangeKind};
pub use product::Product;
