// src/lib.rs

//! zcart: the quantity ledger and live notification hub behind a shopping cart.
//!
//! - [`ledger::CartLedger`] keeps one non-negative quantity per
//!   `(cart_id, product_id)`, applying signed deltas atomically per key and
//!   deleting rows that reach zero.
//! - [`hub::NotificationHub`] keeps one bounded channel per observed cart and
//!   publishes change events without ever blocking the writer.
//! - [`service::CartService`] ties both to a [`catalog::ProductCatalog`] and is
//!   the whole surface a transport needs.
//! - [`session::run_observer`] drives one live observer connection.

pub mod catalog;
pub mod error;
pub mod hub;
pub mod ledger;
pub mod model;
pub mod service;
pub mod session;

pub use crate::catalog::{InMemoryCatalog, ProductCatalog};
pub use crate::error::{CartError, CartResult};
pub use crate::hub::{HubStats, NotificationHub, ObserverHandle, PublishOutcome, DEFAULT_QUEUE_CAPACITY};
pub use crate::ledger::{CartLedger, CartStore, InMemoryCartStore, QuantityChange};
pub use crate::model::{Cart, CartAction, CartLine, CartProductRow, ChangeEvent, ChangeKind, Product};
pub use crate::service::{CartService, QuantityUpdate};
pub use crate::session::{run_observer, EventSink, InboundFrame, SessionEnd, SinkError};
